//! Assertion helpers for tests.

use image::GenericImageView;
use pretty_assertions::assert_eq;
use std::path::Path;

/// Assert `dir` holds exactly `result_iteration_1.png ..= result_iteration_<count>.png`
pub fn assert_snapshot_sequence(dir: &Path, count: usize) {
    for k in 1..=count {
        let path = dir.join(format!("result_iteration_{k}.png"));
        assert!(path.is_file(), "Missing snapshot {}", path.display());
    }
    let next = dir.join(format!("result_iteration_{}.png", count + 1));
    assert!(!next.exists(), "Unexpected snapshot {}", next.display());
}

/// Decode a PNG and check its color type and dimensions, returning the samples.
pub fn assert_png_file(
    path: &Path,
    color: image::ColorType,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let decoded = image::open(path)
        .unwrap_or_else(|e| panic!("{} is not a readable image: {e}", path.display()));
    assert_eq!(decoded.color(), color, "color type of {}", path.display());
    assert_eq!(
        (decoded.width(), decoded.height()),
        (width, height),
        "dimensions of {}",
        path.display()
    );
    decoded.into_bytes()
}

/// Assert the config echo holds exactly `line` plus a newline.
pub fn assert_config_echo(dir: &Path, line: &str) {
    let echo = std::fs::read_to_string(dir.join("config.txt")).expect("config.txt missing");
    assert_eq!(echo, format!("{line}\n"));
}
