//! Clock-style timestamp parsing

/// Parser for the `HH:MM:SS.ss` timestamps ffmpeg prints in its status line
pub struct TimeParser;

impl TimeParser {
    /// Create a new time parser
    pub fn new() -> Self {
        Self
    }
}

impl Default for TimeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeParser {
    /// Parse `HH:MM:SS(.ss)` into seconds
    pub fn parse_clock(&self, time_str: &str) -> Option<f64> {
        let parts: Vec<&str> = time_str.trim().split(':').collect();
        if parts.len() != 3 {
            return None;
        }

        let hours: f64 = parts[0].parse().ok()?;
        let minutes: f64 = parts[1].parse().ok()?;
        let seconds: f64 = parts[2].parse().ok()?;

        if hours < 0.0 || !(0.0..60.0).contains(&minutes) || !(0.0..60.0).contains(&seconds) {
            return None;
        }

        Some(hours * 3600.0 + minutes * 60.0 + seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clock() {
        let parser = TimeParser::new();
        assert_eq!(parser.parse_clock("00:01:00.00"), Some(60.0));
        assert_eq!(parser.parse_clock("01:02:03.5"), Some(3723.5));
        assert_eq!(parser.parse_clock("N/A"), None);
        assert_eq!(parser.parse_clock("00:61:00.00"), None);
        assert_eq!(parser.parse_clock("01:00"), None);
    }
}
