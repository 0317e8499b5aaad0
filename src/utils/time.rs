//! Time parsing and formatting utilities

use std::time::Duration;

use crate::error::{GifferError, GifferResult};

/// Parses user-entered timestamps
pub struct TimeParser;

impl TimeParser {
    /// Parse `HH:MM:SS.ms`, `MM:SS.ms` or plain seconds
    pub fn parse(time_str: &str) -> GifferResult<Duration> {
        let time_str = time_str.trim();
        let invalid = || GifferError::InvalidTimeFormat {
            time: time_str.to_string(),
        };

        let parts: Vec<&str> = time_str.split(':').collect();
        if parts.len() > 3 || parts.iter().any(|p| p.trim().is_empty()) {
            return Err(invalid());
        }

        let mut seconds = 0.0;
        for (index, part) in parts.iter().enumerate() {
            let value: f64 = part.trim().parse().map_err(|_| invalid())?;
            // Only the last component may carry a fraction
            let is_last = index + 1 == parts.len();
            if !value.is_finite() || value < 0.0 || (!is_last && value.fract() != 0.0) {
                return Err(invalid());
            }
            seconds = seconds * 60.0 + value;
        }

        Duration::try_from_secs_f64(seconds).map_err(|_| invalid())
    }
}

/// Seconds with millisecond precision, the form the tools receive
pub fn format_seconds(duration: Duration) -> String {
    format!("{:.3}", duration.as_secs_f64())
}

/// `MM:SS.mmm`, or `HH:MM:SS.mmm` past the hour
pub fn format_clock(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    let milliseconds = duration.subsec_millis();

    if hours > 0 {
        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, milliseconds)
    } else {
        format!("{:02}:{:02}.{:03}", minutes, seconds, milliseconds)
    }
}
