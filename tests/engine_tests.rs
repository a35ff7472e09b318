//! Command synthesis and progress parsing tests

mod common;

use std::sync::Arc;

use serde_json::json;

use common::*;
use reencoder::domain::model::{MediaFile, SubtitleFile, TranscodeJob};
use reencoder::engine::command::{CommandSynthesizer, ToolPaths};
use reencoder::engine::policy::{ProgressKind, Variant};
use reencoder::engine::progress::{PassProgressParser, ProgressParser};
use reencoder::error::ReencodeError;
use reencoder::ports::LogPort;
use reencoder::probe::Normalizer;

fn log() -> Arc<dyn LogPort> {
    Arc::new(RecordingLog::new())
}

fn movie_job(source: &str, raw: &str) -> TranscodeJob {
    let media = Normalizer::new(log()).normalize(source, raw, source.to_lowercase().contains(".vob")).unwrap();
    TranscodeJob::new(media, MediaFile::new(MOVIE_OUT))
}

fn build(job: &TranscodeJob, variant: Variant) -> Vec<String> {
    CommandSynthesizer::new(ToolPaths::default(), log())
        .build_command(job, &variant.policy())
        .unwrap()
}

const HEVC_VIDEO: &[&str] = &[
    "-preset", "slow", "-rc", "vbr", "-rc-lookahead", "32", "-cq", "28", "-g", "250", "-qmin", "0", "-qmax", "34",
    "-b:v:0", "0", "-maxrate", "8948000", "-bufsize", "17896000", "-spatial_aq", "1", "-aq-strength", "15",
];

#[test]
fn test_hevc_nvenc_command() {
    let job = movie_job(MOVIE, &movie_probe());
    let mut expected = strings(&[
        "ffmpeg", "-hide_banner", "-loglevel", "info", "-vsync", "0",
        "-analyzeduration", "250M", "-probesize", "250M",
        "-hwaccel", "cuda", "-hwaccel_output_format", "cuda",
        "-i", MOVIE,
        "-map", "0:0", "-map", "0:1", "-map", "0:2",
        "-c:v:0", "hevc_nvenc",
    ]);
    expected.extend(strings(HEVC_VIDEO));
    expected.extend(strings(&["-c:a:0", "copy", "-c:s:0", "copy", "-f", "matroska", MOVIE_OUT]));

    assert_eq!(build(&job, Variant::HevcNvenc), expected);
}

#[test]
fn test_hevc_nvenc_opus_command() {
    let job = movie_job(MOVIE, &movie_probe());
    let args = build(&job, Variant::HevcNvencOpus);

    let input = args.iter().position(|a| a == "-i").unwrap();
    assert_eq!(args[input - 4..input], strings(&["-hwaccel", "cuvid", "-c:v:0", "h264_cuvid"]));
    assert!(!args.contains(&"cuda".to_string()));

    let rc = args.iter().position(|a| a == "-rc").unwrap();
    assert_eq!(args[rc + 1], "vbr_hq");

    let audio = args.iter().position(|a| a == "-c:a:0").unwrap();
    assert_eq!(
        args[audio..audio + 8],
        strings(&[
            "-c:a:0", "libopus",
            "-filter:a:0", "channelmap=channel_layout=5.1",
            "-compression_level", "10",
            "-b:a:0", "320000",
        ])
    );
}

#[test]
fn test_opus_copies_video_and_non_pcm_audio() {
    let job = movie_job(MOVIE, &movie_probe());
    let args = build(&job, Variant::Opus);

    assert!(!args.contains(&"-hwaccel".to_string()));
    assert!(args.windows(2).any(|w| w == ["-c:v:0", "copy"]));
    assert!(args.windows(2).any(|w| w == ["-c:a:0", "copy"]));
    assert!(!args.contains(&"libopus".to_string()));

    let job = movie_job("/media/Concert.mkv", &hevc_pcm_probe());
    let args = build(&job, Variant::Opus);
    assert!(args.windows(2).any(|w| w == ["-c:a:0", "libopus"]));
    assert!(args.windows(2).any(|w| w == ["-filter:a:0", "channelmap=channel_layout=stereo"]));
    assert!(args.windows(2).any(|w| w == ["-b:a:0", "128000"]));
}

#[test]
fn test_vob_source_widens_probe_window() {
    let raw = probe_json(
        json!({"size": "1000", "duration": "60", "bit_rate": "6000000"}),
        vec![
            json!({"index": 1, "codec_type": "video", "codec_name": "mpeg2video", "width": 720, "bit_rate": "5000000"}),
            json!({"index": 2, "codec_type": "audio", "codec_name": "ac3", "channels": 2, "bit_rate": "192000"}),
            json!({"index": 3, "codec_type": "subtitle", "codec_name": "dvd_subtitle"}),
        ],
    );
    let job = movie_job("/dvd/VTS_01_1.VOB", &raw);
    let args = build(&job, Variant::HevcNvencOpus);

    assert!(args.windows(4).any(|w| w == ["-analyzeduration", "500M", "-probesize", "500M"]));
    assert!(args.windows(4).any(|w| w == ["-hwaccel", "cuvid", "-c:v:0", "mpeg2_cuvid"]));
    assert!(args.windows(2).any(|w| w == ["-map", "0:3"]));
    assert!(args.windows(2).any(|w| w == ["-maxrate", "1789000"]));
}

#[test]
fn test_subtitle_files_follow_primary_input() {
    let mut job = movie_job(MOVIE, &movie_probe());
    job.source
        .append_subtitle_file(SubtitleFile::new("/media/Movie.en.srt", "subrip").with_encoding("UTF-8"));
    job.source
        .append_subtitle_file(SubtitleFile::new("/media/Movie.de.srt", "subrip").with_encoding(""));
    let args = build(&job, Variant::HevcNvenc);

    let input = args.iter().position(|a| a == MOVIE).unwrap();
    assert_eq!(
        args[input + 1..input + 7],
        strings(&["-sub_charenc", "UTF-8", "-i", "/media/Movie.en.srt", "-i", "/media/Movie.de.srt"])
    );
    assert!(args.windows(2).any(|w| w == ["-map", "1"]));
    assert!(args.windows(2).any(|w| w == ["-map", "2"]));
    assert!(args.windows(2).any(|w| w == ["-c:s:1", "copy"]));
    assert!(args.windows(2).any(|w| w == ["-c:s:2", "copy"]));
}

#[test]
fn test_normalize_commands() {
    let job = TranscodeJob::new(MediaFile::new(MOVIE), MediaFile::new(MOVIE_OUT));

    assert_eq!(
        build(&job, Variant::Normalize),
        strings(&["ffmpeg-normalize", MOVIE, "-o", MOVIE_OUT, "-v", "-pr"])
    );
    assert_eq!(
        build(&job, Variant::OpusNormalize),
        strings(&[
            "ffmpeg-normalize", MOVIE, "-o", MOVIE_OUT, "-v", "-nt", "ebu", "-c:a", "libopus", "-b:a", "320k", "-ar",
            "48000",
        ])
    );
}

#[test]
fn test_ffmpeg_variant_needs_populated_source() {
    let job = TranscodeJob::new(MediaFile::new(MOVIE), MediaFile::new(MOVIE_OUT));
    let err = CommandSynthesizer::new(ToolPaths::default(), log())
        .build_command(&job, &Variant::Opus.policy())
        .unwrap_err();
    assert!(matches!(err, ReencodeError::Validation(_)));
}

#[test]
fn test_command_is_deterministic() {
    let job = movie_job(MOVIE, &movie_probe());
    for variant in Variant::ALL {
        assert_eq!(build(&job, variant), build(&job, variant));
    }
}

#[test]
fn test_tool_paths_are_configurable() {
    let job = movie_job(MOVIE, &movie_probe());
    let tools = ToolPaths {
        ffmpeg: "/opt/ffmpeg/bin/ffmpeg".to_string(),
        ffmpeg_normalize: "ffmpeg-normalize".to_string(),
    };
    let args = CommandSynthesizer::new(tools, log())
        .build_command(&job, &Variant::HevcNvenc.policy())
        .unwrap();
    assert_eq!(args[0], "/opt/ffmpeg/bin/ffmpeg");
}

#[test]
fn test_elapsed_progress() {
    let mut parser = ProgressKind::Elapsed.parser(200.0, log());
    let seen: Vec<u8> = [
        "Press [q] to stop, [?] for help",
        "frame=   10 fps=0.0 q=0.0 size=       0kB time=00:00:20.00 bitrate=N/A",
        "frame=   90 fps= 45 q=27.0 size=    5120kB time=00:02:30.50 bitrate=278.7kbits/s",
        "frame=  120 fps= 45 q=27.0 size=    5120kB time=00:05:00.00 bitrate=278.7kbits/s",
    ]
    .iter()
    .map(|line| parser.parse(line))
    .collect();

    assert_eq!(seen, vec![0, 10, 75, 100]);
}

#[test]
fn test_pass_progress_weighting() {
    let mut parser = PassProgressParser::new(log());
    let seen: Vec<u8> = [
        "INFO: Running first pass loudnorm filter for stream 1",
        "Stream 1/2:  60%|######    | 60/100",
        "Stream 2/2:  30%|###       | 30/100",
        "INFO: Running second pass for all streams",
        "Second Pass     : 100%|##########| 100/100",
    ]
    .iter()
    .map(|line| parser.parse(line))
    .collect();

    assert_eq!(seen, vec![0, 20, 43, 43, 67]);
    assert_eq!(parser.total_streams(), Some(2));
}

#[test]
fn test_pass_progress_without_percent_stays_put() {
    let mut parser = PassProgressParser::new(log());
    assert_eq!(parser.parse("ffmpeg-normalize 1.28.3"), 0);
    assert_eq!(parser.parse("50%"), 0);
    assert_eq!(parser.percent(), 0);
}
