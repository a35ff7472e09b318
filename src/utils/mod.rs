//! Common utilities and helpers

pub mod logging;
pub mod path;
pub mod time;

/// Formatting helpers shared by model summaries and CLI output
pub struct Utils;

impl Utils {
    /// Format file size for display
    pub fn format_file_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Format bits per second as whole kilobits
    pub fn format_bitrate(bitrate: u64) -> String {
        format!("{} kb/s", bitrate / 1000)
    }

    /// Round a floating percentage and bound it to 0..=100
    pub fn bound_percent(value: f64) -> u8 {
        if value.is_nan() {
            return 0;
        }
        value.round().clamp(0.0, 100.0) as u8
    }
}
