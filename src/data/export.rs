use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use crate::data::types::{ExportFormat, Wave};
use crate::error::{PortalError, Result};

/// Flat row written for each wave in both export formats.
#[derive(Debug, Serialize)]
struct WaveRecord {
    address: String,
    timestamp: i64,
    time: String,
    message: String,
}

impl From<&Wave> for WaveRecord {
    fn from(wave: &Wave) -> Self {
        Self {
            address: format!("{:#x}", wave.address),
            timestamp: wave.timestamp.timestamp(),
            time: wave.timestamp.to_rfc3339(),
            message: wave.message.clone(),
        }
    }
}

/// `<dir>/waves-<utc timestamp>.<ext>`
pub fn default_path(dir: &Path, format: ExportFormat) -> PathBuf {
    let stamp = Utc::now().format("%Y%m%d-%H%M%S");
    dir.join(format!("waves-{stamp}.{}", format.extension()))
}

/// Export waves to CSV, one row per wave in display order.
///
/// Columns: address, timestamp, time, message
pub fn export_waves_csv(waves: &[Wave], path: &Path) -> Result<String> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| PortalError::Export(format!("Failed to create file: {e}")))?;

    if waves.is_empty() {
        wtr.write_record(["address", "timestamp", "time", "message"])
            .map_err(|e| PortalError::Export(format!("Failed to write CSV header: {e}")))?;
    }

    for wave in waves {
        wtr.serialize(WaveRecord::from(wave))
            .map_err(|e| PortalError::Export(format!("Failed to write CSV row: {e}")))?;
    }

    wtr.flush()
        .map_err(|e| PortalError::Export(format!("Failed to flush CSV: {e}")))?;

    Ok(format!("Exported {} waves to {}", waves.len(), path.display()))
}

/// Export waves to a pretty-printed JSON array.
pub fn export_waves_json(waves: &[Wave], path: &Path) -> Result<String> {
    let records: Vec<WaveRecord> = waves.iter().map(WaveRecord::from).collect();
    let json = serde_json::to_string_pretty(&records)
        .map_err(|e| PortalError::Export(format!("Failed to serialize: {e}")))?;

    fs::write(path, json).map_err(|e| PortalError::Export(format!("Failed to write file: {e}")))?;

    Ok(format!("Exported {} waves to {}", waves.len(), path.display()))
}
