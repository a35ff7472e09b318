// Unit tests for domain models

use super::*;

fn sample_info() -> MediaInfo {
    MediaInfo {
        length: 1420.5,
        overall_bitrate: Some(5_000_000),
        video_streams: vec![VideoStream::new(0, "h264", 4_000_000, 1920, 1080)],
        audio_streams: vec![AudioStream::new(1, "ac3", 384_000, 6, "5.1(side)").unwrap()],
        subtitle_streams: vec![SubtitleStream::new(2, "subrip", Some("eng")).unwrap()],
    }
}

#[test]
fn test_subtitle_language_defaults_to_unknown() {
    let stream = SubtitleStream::new(3, "ass", None).unwrap();
    assert_eq!(stream.language(), UNKNOWN_LANGUAGE);
}

#[test]
fn test_subtitle_language_must_be_three_letters() {
    assert!(SubtitleStream::new(3, "ass", Some("en")).is_err());
    assert!(SubtitleStream::new(3, "ass", Some("english")).is_err());

    let mut stream = SubtitleStream::new(3, "ass", Some("ger")).unwrap();
    let err = stream.set_language("de").unwrap_err();
    assert!(matches!(err, DomainError::ValidationFailed(_)));
    assert_eq!(stream.language(), "ger");

    stream.set_language("fre").unwrap();
    assert_eq!(stream.language(), "fre");
}

#[test]
fn test_audio_stream_rejects_zero_channels() {
    assert!(AudioStream::new(1, "aac", 128_000, 0, "stereo").is_err());
    assert!(AudioStream::new(1, "aac", 128_000, 2, " ").is_err());
}

#[test]
fn test_unpopulated_media_file_is_empty() {
    let media = MediaFile::new("/library/show/episode.mkv");
    assert!(!media.is_populated());
    assert_eq!(media.length(), 0.0);
    assert!(media.video_streams().is_empty());
    assert!(media.require_info().is_err());
}

#[test]
fn test_populate_is_one_shot() {
    let mut media = MediaFile::new("/library/show/episode.mkv");
    assert!(media.populate(1024, sample_info()));

    let mut other = sample_info();
    other.length = 1.0;
    assert!(!media.populate(2048, other));

    assert_eq!(media.size(), 1024);
    assert_eq!(media.length(), 1420.5);
    assert_eq!(media.require_info().unwrap().total_streams(), 3);
}

#[test]
fn test_vob_marker_is_case_insensitive() {
    assert!(MediaFile::new("/dvd/VTS_01_1.VOB").is_vob());
    assert!(MediaFile::new("/dvd/title.vob.mkv").is_vob());
    assert!(!MediaFile::new("/movies/vobiscum.mkv").is_vob());
}

#[test]
fn test_file_entry_path_is_parent_directory() {
    let entry = FileEntry::new("/library/show/episode.mkv");
    assert_eq!(entry.path(), Path::new("/library/show"));
}

#[test]
fn test_summary_lists_streams_in_order() {
    let mut media = MediaFile::new("/library/show/episode.mkv");
    media.populate(1024, sample_info());
    media.append_subtitle_file(
        SubtitleFile::new("/library/show/episode.srt", "subrip").with_encoding("UTF-8"),
    );

    let summary = media.summary();
    assert!(summary.starts_with("File: /library/show/episode.mkv, Size: 1.00 KB, Length: 1420.5"));

    let video = summary.find("Codec: h264").unwrap();
    let audio = summary.find("Codec: ac3").unwrap();
    let subtitle = summary.find("Language: eng").unwrap();
    let external = summary.find("episode.srt").unwrap();
    assert!(video < audio && audio < subtitle && subtitle < external);

    assert_eq!(summary.matches("Index: ").count(), 4);
    assert!(summary.contains("Channels: 6, Channel Layout: 5.1(side)"));
    assert!(summary.contains("Encoding: UTF-8"));
    assert_eq!(media.to_string(), summary);
}

#[test]
fn test_transcode_result_helpers() {
    let accepted = TranscodeResult::accept("ready");
    assert!(accepted.status);
    assert_eq!(accepted.to_string(), "accepted: ready");

    let rejected = TranscodeResult::reject("already hevc");
    assert!(!rejected.status);
    assert_eq!(rejected.message, "already hevc");
}

#[test]
fn test_new_job_starts_empty_and_accepted() {
    let job = TranscodeJob::new(MediaFile::new("/media/a.mkv"), MediaFile::new("/media/out/a.mkv"));
    assert_eq!(job.source.name(), "/media/a.mkv");
    assert_eq!(job.destination.name(), "/media/out/a.mkv");
    assert!(job.args.is_empty());
    assert!(job.result.status);
}
