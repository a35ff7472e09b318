//! Subtitle stream selection and external subtitle discovery

use std::path::Path;
use std::sync::Arc;

use crate::domain::model::{MediaFile, SubtitleFile, SubtitleStream};
use crate::error::ReencodeResult;
use crate::ports::{FsPort, LogPort};
use crate::streams::{ProcessingMode, SubtitleSource, SubtitleStreamMapping};
use crate::utils::path::PathUtils;

/// Subtitle codecs matroska can carry as a straight copy
pub const SUBTITLE_COPY_CODECS: &[&str] = &[
    "subrip",
    "ass",
    "dvd_subtitle",
    "dvb_subtitle",
    "pgssub",
    "hdmv_pgs_subtitle",
];

/// Directory names searched for loose subtitle files
const SUBTITLE_DIRS: &[&str] = &["Subs", "subs"];

/// Subtitle stream processor
pub struct SubtitleProcessor;

impl SubtitleProcessor {
    pub fn is_copyable(codec: &str) -> bool {
        SUBTITLE_COPY_CODECS.contains(&codec)
    }

    /// Internal streams on the allow-list, then each auxiliary file.
    /// Output indices count mapped entries only.
    pub fn map_streams(streams: &[SubtitleStream], files: &[SubtitleFile]) -> Vec<SubtitleStreamMapping> {
        let internal = streams
            .iter()
            .filter(|s| Self::is_copyable(&s.codec))
            .map(|s| SubtitleSource::Stream(s.index));

        let external = files.iter().enumerate().map(|(i, f)| SubtitleSource::File {
            input: i + 1,
            path: f.name().to_string(),
            encoding: f.encoding.clone(),
        });

        internal
            .chain(external)
            .enumerate()
            .map(|(output_index, source)| SubtitleStreamMapping {
                source,
                output_index,
                mode: ProcessingMode::Copy,
            })
            .collect()
    }

    /// Text encoding of a subtitle file's bytes
    pub fn classify_encoding(bytes: &[u8]) -> &'static str {
        if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) || std::str::from_utf8(bytes).is_ok() {
            "UTF-8"
        } else {
            "CP1252"
        }
    }
}

/// Finds `.srt` files that belong to a media file
pub struct SubtitleDiscovery {
    fs: Arc<dyn FsPort>,
    log: Arc<dyn LogPort>,
}

impl SubtitleDiscovery {
    /// Create new subtitle discovery
    pub fn new(fs: Arc<dyn FsPort>, log: Arc<dyn LogPort>) -> Self {
        Self { fs, log }
    }

    /// Candidate files: siblings whose stem starts with the source stem, plus
    /// everything in the first `Subs/` or `subs/` directory next to the
    /// source. Sorted by path.
    pub fn find(&self, source: &str) -> ReencodeResult<Vec<String>> {
        let utils = PathUtils::new();
        let stem = utils.get_stem(source).unwrap_or_default();
        let dir = Path::new(source)
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| ".".to_string());

        let is_srt = |path: &String| utils.get_extension(path).as_deref() == Some("srt");

        let mut found: Vec<String> = self
            .fs
            .list_files(&dir, 1)?
            .into_iter()
            .filter(|p| is_srt(p))
            .filter(|p| utils.get_stem(p).map(|s| s.starts_with(&stem)).unwrap_or(false))
            .collect();

        for sub_dir in SUBTITLE_DIRS {
            let sub_path = Path::new(&dir).join(sub_dir).to_string_lossy().to_string();
            if !self.fs.file_exists(&sub_path) {
                continue;
            }
            found.extend(self.fs.list_files(&sub_path, 1)?.into_iter().filter(|p| is_srt(p)));
            // Both names can resolve to one directory on case-insensitive filesystems
            break;
        }

        found.sort();
        found.dedup();
        Ok(found)
    }

    /// Attach every discovered subtitle file to `media`, with its encoding
    pub fn attach(&self, media: &mut MediaFile) -> ReencodeResult<usize> {
        let candidates = self.find(media.name())?;
        let mut attached = 0;

        for path in candidates {
            let bytes = match self.fs.read_bytes(&path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    self.log.warn(&format!("{}: cannot read subtitle file: {}", path, e));
                    continue;
                }
            };

            let encoding = SubtitleProcessor::classify_encoding(&bytes);
            let mut file = SubtitleFile::new(path.as_str(), "subrip").with_encoding(encoding);
            file.file.size = bytes.len() as u64;

            self.log.debug(&format!("{}: attaching {} ({})", media.name(), path, encoding));
            media.append_subtitle_file(file);
            attached += 1;
        }

        Ok(attached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_list() {
        assert!(SubtitleProcessor::is_copyable("subrip"));
        assert!(SubtitleProcessor::is_copyable("hdmv_pgs_subtitle"));
        assert!(!SubtitleProcessor::is_copyable("mov_text"));
        assert!(!SubtitleProcessor::is_copyable("eia_608"));
    }

    #[test]
    fn test_output_index_counts_mapped_streams_only() {
        let streams = vec![
            SubtitleStream::new(2, "mov_text", None).unwrap(),
            SubtitleStream::new(3, "subrip", Some("eng")).unwrap(),
        ];
        let files = vec![SubtitleFile::new("/tv/show.en.srt", "subrip").with_encoding("UTF-8")];

        let mapped = SubtitleProcessor::map_streams(&streams, &files);
        assert_eq!(mapped.len(), 2);
        assert_eq!(mapped[0].source, SubtitleSource::Stream(3));
        assert_eq!(mapped[0].output_index, 0);
        assert_eq!(
            mapped[1].source,
            SubtitleSource::File {
                input: 1,
                path: "/tv/show.en.srt".into(),
                encoding: "UTF-8".into()
            }
        );
        assert_eq!(mapped[1].output_index, 1);
    }

    #[test]
    fn test_classify_encoding() {
        assert_eq!(SubtitleProcessor::classify_encoding(b"1\n00:00:01,000 --> 00:00:02,000\nHi\n"), "UTF-8");
        assert_eq!(SubtitleProcessor::classify_encoding(&[0xEF, 0xBB, 0xBF, b'1']), "UTF-8");
        assert_eq!(SubtitleProcessor::classify_encoding("Hallå".as_bytes()), "UTF-8");
        assert_eq!(SubtitleProcessor::classify_encoding(&[b'H', b'a', b'l', b'l', 0xE5]), "CP1252");
    }
}
