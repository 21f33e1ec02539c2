//! Human-readable file metadata.
//!
//! Timestamps are rendered in the local time zone of the process and carry
//! no offset, so two panels on differently configured hosts can show
//! different strings for the same file.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Local, TimeZone};

const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

/// Format a byte count with two decimals in the largest unit up to GB.
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;

    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.2} {}", size, UNITS[unit])
}

/// Format seconds since the epoch as `YYYY-MM-DD HH:MM:SS` in local time.
pub fn format_mtime(epoch_seconds: i64) -> String {
    match Local.timestamp_opt(epoch_seconds, 0).earliest() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => String::from("-"),
    }
}

pub fn format_system_time(time: SystemTime) -> String {
    let seconds = match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        // Pre-epoch mtimes exist on some restored archives
        Err(e) => -(e.duration().as_secs() as i64),
    };
    format_mtime(seconds)
}
