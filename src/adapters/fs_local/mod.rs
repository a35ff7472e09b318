// Local filesystem adapter - std::fs and walkdir behind FsPort

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{ReencodeError, ReencodeResult};
use crate::ports::FsPort;

/// Local filesystem adapter
#[derive(Debug, Default)]
pub struct FsLocalAdapter;

impl FsLocalAdapter {
    /// Create new filesystem adapter
    pub fn new() -> Self {
        Self
    }
}

impl FsPort for FsLocalAdapter {
    fn file_exists(&self, file_path: &str) -> bool {
        Path::new(file_path).exists()
    }

    fn file_size(&self, file_path: &str) -> ReencodeResult<u64> {
        Ok(fs::metadata(file_path)?.len())
    }

    fn list_files(&self, dir_path: &str, max_depth: usize) -> ReencodeResult<Vec<String>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir_path).min_depth(1).max_depth(max_depth) {
            let entry = entry.map_err(|e| {
                ReencodeError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("cannot list {}: {}", dir_path, e),
                ))
            })?;
            if entry.file_type().is_file() {
                files.push(entry.path().to_string_lossy().to_string());
            }
        }
        files.sort();
        Ok(files)
    }

    fn read_bytes(&self, file_path: &str) -> ReencodeResult<Vec<u8>> {
        Ok(fs::read(file_path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_files_respects_depth() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.srt"), "1").unwrap();
        fs::write(dir.path().join("a.mkv"), "1").unwrap();
        fs::create_dir(dir.path().join("Subs")).unwrap();
        fs::write(dir.path().join("Subs").join("c.srt"), "1").unwrap();

        let adapter = FsLocalAdapter::new();
        let root = dir.path().to_string_lossy().to_string();

        let shallow = adapter.list_files(&root, 1).unwrap();
        assert_eq!(shallow.len(), 2);
        assert!(shallow[0].ends_with("a.mkv"));
        assert!(shallow[1].ends_with("b.srt"));

        assert_eq!(adapter.list_files(&root, 2).unwrap().len(), 3);
        assert!(adapter.file_exists(&root));
        assert_eq!(adapter.file_size(&shallow[0]).unwrap(), 1);
    }
}
