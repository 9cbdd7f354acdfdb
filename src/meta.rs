//! Per-entry annotations: human-readable sizes and MIME labels.

use crate::style::{RESET, Style, cube_256, grey_256, rgb_from_hsv};
use std::path::Path;

const UNITS: [&str; 5] = ["  B", "KiB", "MiB", "GiB", "TiB"];

/// Formats a byte count, scaling by 1024 while the value exceeds 9999.
/// Zero renders as a grey `empty` unless `empty_label` is false.
pub fn human_size(bytes: u64, empty_label: bool) -> String {
    if bytes == 0 && empty_label {
        return Style::fg(grey_256(4)).paint("empty");
    }
    let mut value = bytes;
    let mut unit = 0;
    while value > 9999 && unit < UNITS.len() - 1 {
        value /= 1024;
        unit += 1;
    }
    let hue = 270.0 + unit as f64 * 65.0;
    let color = cube_256(rgb_from_hsv(hue, 0.3, 0.9));
    format!("{value} {}{}{RESET}", Style::fg(color).render(), UNITS[unit])
}

/// MIME type guessed from the file name, or `unknown`.
pub fn mime_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .map_or_else(|| "unknown".to_string(), str::to_string)
}

/// Decorates the top-level MIME type with a symbol.
pub fn mime_label(mime: &str) -> String {
    mime.replace("video/", "🎞️ /")
        .replace("image/", "🖼️ /")
        .replace("text/", "🗎 /")
        .replace("application/", "🗗 /")
}

/// Whether content of this MIME type is worth previewing.
pub fn is_previewable(mime: &str) -> bool {
    !mime.starts_with("audio")
}
