//! Path helpers for source, destination and config lookups

use std::path::{Path, PathBuf};

/// Path utilities
pub struct PathUtils;

impl PathUtils {
    /// Create a new path utils instance
    pub fn new() -> Self {
        Self
    }
}

impl Default for PathUtils {
    fn default() -> Self {
        Self::new()
    }
}

impl PathUtils {
    /// Get file extension from path, lower-cased
    pub fn get_extension(&self, path: &str) -> Option<String> {
        Path::new(path)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }

    /// Get file stem (name without extension) from path
    pub fn get_stem(&self, path: &str) -> Option<String> {
        Path::new(path)
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
    }

    /// Final path component, or the whole string when there is none
    pub fn file_name(&self, path: &str) -> String {
        Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string())
    }

    /// Case-insensitive check of the file name against a set of markers
    pub fn name_contains_any(&self, path: &str, markers: &[&str]) -> Option<String> {
        let name = self.file_name(path).to_lowercase();
        markers
            .iter()
            .find(|marker| name.contains(&marker.to_lowercase()))
            .map(|marker| marker.to_string())
    }

    /// Per-user configuration directory for the application
    pub fn user_config_dir(&self, app: &str) -> Option<PathBuf> {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
            return Some(PathBuf::from(xdg).join(app));
        }
        std::env::var_os("HOME")
            .filter(|v| !v.is_empty())
            .map(|home| PathBuf::from(home).join(".config").join(app))
    }
}
