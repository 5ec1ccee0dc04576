use alloy::primitives::{Address, B256};
use chrono::{DateTime, Utc};

/// Truncate a B256 hash to "0xabcd...ef12" format
pub fn truncate_hash(hash: &B256) -> String {
    let s = format!("{hash}");
    if s.len() > 14 {
        format!("{}...{}", &s[..8], &s[s.len() - 4..])
    } else {
        s
    }
}

/// Truncate an address to "0xabcd...ef12" format
pub fn truncate_address(addr: &Address) -> String {
    let s = format!("{addr}");
    if s.len() > 14 {
        format!("{}...{}", &s[..8], &s[s.len() - 4..])
    } else {
        s
    }
}

/// Format a number with comma separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a wave time as "Xm ago", "Xh ago", etc., relative to `now`.
pub fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - timestamp).num_seconds();
    if diff < 0 {
        return "just now".to_string();
    }
    if diff < 60 {
        format!("{diff}s ago")
    } else if diff < 3600 {
        format!("{}m ago", diff / 60)
    } else if diff < 86400 {
        format!("{}h ago", diff / 3600)
    } else {
        format!("{}d ago", diff / 86400)
    }
}

/// Format a wave time as a datetime string
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%b %d, %Y %H:%M:%S UTC").to_string()
}

/// Cut a message to `max` characters for table cells, marking the cut with an ellipsis.
pub fn truncate_message(message: &str, max: usize) -> String {
    let single_line = message.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= max {
        return single_line;
    }
    let kept: String = single_line.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}\u{2026}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_address() {
        let addr: Address = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".parse().unwrap();
        assert_eq!(truncate_address(&addr), "0xd8dA6B...6045");
    }

    #[test]
    fn test_truncate_hash() {
        assert_eq!(truncate_hash(&B256::ZERO), "0x000000...0000");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_time_ago() {
        let now = DateTime::from_timestamp(1_000_000, 0).unwrap();
        let at = |secs: i64| DateTime::from_timestamp(1_000_000 - secs, 0).unwrap();
        assert_eq!(format_time_ago(at(30), now), "30s ago");
        assert_eq!(format_time_ago(at(120), now), "2m ago");
        assert_eq!(format_time_ago(at(7200), now), "2h ago");
        assert_eq!(format_time_ago(at(172800), now), "2d ago");
        assert_eq!(format_time_ago(at(-10), now), "just now");
    }

    #[test]
    fn test_format_timestamp() {
        let ts = DateTime::from_timestamp(1_650_000_000, 0).unwrap();
        assert_eq!(format_timestamp(ts), "Apr 15, 2022 05:20:00 UTC");
    }

    #[test]
    fn test_truncate_message() {
        assert_eq!(truncate_message("short", 10), "short");
        assert_eq!(truncate_message("line one\nline two", 40), "line one line two");
        assert_eq!(truncate_message("abcdefghij", 5), "abcd\u{2026}");
    }
}
