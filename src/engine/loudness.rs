//! ffmpeg-normalize invocation for the loudness variants

/// Argument list for `ffmpeg-normalize <in> -o <out> <flags...>`
pub fn normalize_args(program: &str, source: &str, destination: &str, flags: &[&str]) -> Vec<String> {
    let mut args = vec![
        program.to_string(),
        source.to_string(),
        "-o".to_string(),
        destination.to_string(),
    ];
    args.extend(flags.iter().map(|f| f.to_string()));
    args
}
