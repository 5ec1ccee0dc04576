use alloy::primitives::{Address, B256};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wave {
    pub address: Address,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl Wave {
    /// Build a wave from the contract's seconds-since-epoch timestamp.
    /// Timestamps past what chrono can represent pin to the latest representable instant.
    pub fn from_unix(address: Address, seconds: u64, message: String) -> Self {
        let timestamp = i64::try_from(seconds)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or_else(|| {
                tracing::warn!("wave timestamp {seconds} out of range");
                DateTime::<Utc>::MAX_UTC
            });
        Self {
            address,
            timestamp,
            message,
        }
    }
}

/// Waves in display order: most recent first.
#[derive(Debug, Clone, Default)]
pub struct WaveLog {
    waves: Vec<Wave>,
}

impl WaveLog {
    pub fn new() -> Self {
        Self { waves: Vec::new() }
    }

    /// Replace the log with a freshly fetched list, already in display order.
    pub fn replace(&mut self, waves: Vec<Wave>) {
        self.waves = waves;
    }

    /// Insert a live event at the front. Returns false if the wave is already shown.
    pub fn push_front(&mut self, wave: Wave) -> bool {
        if self.waves.contains(&wave) {
            return false;
        }
        self.waves.insert(0, wave);
        true
    }

    pub fn clear(&mut self) {
        self.waves.clear();
    }

    pub fn as_slice(&self) -> &[Wave] {
        &self.waves
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub name: String,
    pub chain_id: u64,
    pub rpc_url: String,
}

/// Outcome of a mined wave transaction.
#[derive(Debug, Clone)]
pub struct WaveReceipt {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave(byte: u8, seconds: u64, message: &str) -> Wave {
        Wave::from_unix(Address::repeat_byte(byte), seconds, message.to_string())
    }

    #[test]
    fn test_from_unix() {
        let w = wave(0x01, 1_640_000_000, "gm");
        assert_eq!(w.timestamp.timestamp(), 1_640_000_000);
        assert_eq!(w.message, "gm");
    }

    #[test]
    fn test_from_unix_out_of_range_does_not_wrap() {
        let w = wave(0x01, u64::MAX, "far future");
        assert_eq!(w.timestamp, DateTime::<Utc>::MAX_UTC);
        assert!(w.timestamp.timestamp() > 0);

        let w = wave(0x01, i64::MAX as u64, "still too far");
        assert_eq!(w.timestamp, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_push_front_orders_most_recent_first() {
        let mut log = WaveLog::new();
        log.replace(vec![wave(0x02, 200, "second"), wave(0x01, 100, "first")]);
        assert!(log.push_front(wave(0x03, 300, "third")));
        let messages: Vec<_> = log.as_slice().iter().map(|w| w.message.as_str()).collect();
        assert_eq!(messages, ["third", "second", "first"]);
    }

    #[test]
    fn test_push_front_skips_duplicate() {
        let mut log = WaveLog::new();
        log.replace(vec![wave(0x01, 100, "hello")]);
        assert!(!log.push_front(wave(0x01, 100, "hello")));
        assert_eq!(log.as_slice().len(), 1);
    }

    #[test]
    fn test_same_message_different_time_is_kept() {
        let mut log = WaveLog::new();
        log.replace(vec![wave(0x01, 100, "hello")]);
        assert!(log.push_front(wave(0x01, 101, "hello")));
        assert_eq!(log.as_slice().len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut log = WaveLog::new();
        log.replace(vec![wave(0x01, 100, "hello")]);
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_export_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
    }
}
