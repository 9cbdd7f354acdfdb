//! ANSI styling primitives.
//!
//! Colours and attributes are small value types; a [`Style`] renders to a
//! single SGR escape sequence. Every styled span is closed with [`RESET`]
//! so nothing bleeds into the next span or line.
//!
//! The module also owns the escape-sequence stripping used for width
//! measurement ([`strip_ansi`], [`visible_width`]) and the HSV helper the
//! binary renderer uses to pick hues.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Resets all graphics attributes.
pub const RESET: &str = "\x1b[0m";

/// Columns a tab occupies when measuring visible width.
pub const TAB_WIDTH: usize = 6;

static CSI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x01?\x1b\[[0-9;]*[a-zA-Z]\x02?").expect("valid CSI regex"));
static OSC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x01?\x1b\][^\x07]*\x07\x02?").expect("valid OSC regex"));

/// The eight basic terminal colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color8 {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
}

/// A foreground or background colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Basic(Color8),
    Bright(Color8),
    /// Index into the 256-colour palette.
    Ansi256(u8),
    Rgb(u8, u8, u8),
}

impl Color {
    fn sgr(self, background: bool) -> String {
        let base = if background { 40 } else { 30 };
        match self {
            Color::Basic(c) => (base + c as u8).to_string(),
            Color::Bright(c) => (base + 60 + c as u8).to_string(),
            Color::Ansi256(i) => format!("{};5;{i}", base + 8),
            Color::Rgb(r, g, b) => format!("{};2;{r};{g};{b}", base + 8),
        }
    }
}

/// Text attributes that can be combined on a [`Style`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Attributes {
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
    pub reverse: bool,
    pub strike: bool,
}

impl Attributes {
    fn codes(self) -> impl Iterator<Item = &'static str> {
        [
            (self.bold, "1"),
            (self.dim, "2"),
            (self.italic, "3"),
            (self.underline, "4"),
            (self.reverse, "7"),
            (self.strike, "9"),
        ]
        .into_iter()
        .filter_map(|(on, code)| on.then_some(code))
    }
}

/// Foreground, background and attributes rendered as one SGR sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub attrs: Attributes,
}

impl Style {
    pub const fn plain() -> Self {
        Self {
            fg: None,
            bg: None,
            attrs: Attributes {
                bold: false,
                dim: false,
                italic: false,
                underline: false,
                reverse: false,
                strike: false,
            },
        }
    }

    pub const fn fg(color: Color) -> Self {
        let mut style = Self::plain();
        style.fg = Some(color);
        style
    }

    pub const fn bg(color: Color) -> Self {
        let mut style = Self::plain();
        style.bg = Some(color);
        style
    }

    pub const fn on(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub const fn with_fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub const fn bold(mut self) -> Self {
        self.attrs.bold = true;
        self
    }

    pub const fn dim(mut self) -> Self {
        self.attrs.dim = true;
        self
    }

    /// Renders the style as a single escape sequence, or an empty string
    /// for the plain style.
    pub fn render(&self) -> String {
        let mut params: Vec<String> = self.attrs.codes().map(str::to_owned).collect();
        if let Some(fg) = self.fg {
            params.push(fg.sgr(false));
        }
        if let Some(bg) = self.bg {
            params.push(bg.sgr(true));
        }
        if params.is_empty() {
            return String::new();
        }
        format!("\x1b[{}m", params.join(";"))
    }

    /// Wraps `text` in this style followed by a reset.
    pub fn paint(&self, text: &str) -> String {
        format!("{}{text}{RESET}", self.render())
    }
}

/// Style used for annotations and markers.
pub fn meta(text: &str) -> String {
    format!("{RESET}{}", Style::fg(Color::Basic(Color8::Black)).bold().paint(text))
}

/// Maps a 0..=1 RGB triple onto the 6x6x6 cube of the 256-colour palette.
pub fn cube_256((r, g, b): (f64, f64, f64)) -> Color {
    let level = |v: f64| (v.clamp(0.0, 1.0) * 5.0) as u8;
    Color::Ansi256(16 + 36 * level(r) + 6 * level(g) + level(b))
}

/// One of the 24 greyscale steps of the 256-colour palette.
pub fn grey_256(step: u8) -> Color {
    Color::Ansi256(232 + step.min(23))
}

/// Converts hue (degrees), saturation and value to RGB channels in 0..=1.
///
/// Hues outside 0..360 wrap around.
pub fn rgb_from_hsv(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    let c = s * v;
    let m = v - c;
    let h = h / 60.0;
    let x = c * (1.0 - ((h.rem_euclid(2.0)) - 1.0).abs());
    let (r, g, b) = match (h.trunc() as i64).rem_euclid(6) {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    (r + m, g + m, b + m)
}

/// Removes CSI and OSC escape sequences.
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains('\x1b') {
        return Cow::Borrowed(s);
    }
    let without_csi = CSI_RE.replace_all(s, "");
    Cow::Owned(OSC_RE.replace_all(&without_csi, "").into_owned())
}

/// Byte ranges of every escape sequence in `s`, in order.
pub(crate) fn escape_ranges(s: &str) -> Vec<(usize, usize)> {
    let mut ranges: Vec<(usize, usize)> = CSI_RE
        .find_iter(s)
        .chain(OSC_RE.find_iter(s))
        .map(|m| (m.start(), m.end()))
        .collect();
    ranges.sort_unstable();
    ranges
}

/// Character count after stripping escapes, with tabs as [`TAB_WIDTH`].
pub fn visible_width(s: &str) -> usize {
    strip_ansi(s)
        .chars()
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_combines_codes() {
        let style = Style::fg(Color::Basic(Color8::Yellow)).on(Color::Ansi256(234)).bold();
        assert_eq!(style.render(), "\x1b[1;33;48;5;234m");
        assert_eq!(Style::plain().render(), "");
        assert_eq!(Style::fg(Color::Rgb(1, 2, 3)).render(), "\x1b[38;2;1;2;3m");
        assert_eq!(Style::bg(Color::Bright(Color8::Red)).render(), "\x1b[101m");
    }

    #[test]
    fn strip_handles_guards_and_osc() {
        assert_eq!(strip_ansi("x"), "x");
        assert_eq!(strip_ansi("\x01\x1b[1;31m\x02red\x1b[0m"), "red");
        assert_eq!(strip_ansi("\x1b]0;title\x07body"), "body");
    }

    #[test]
    fn cube_levels_truncate() {
        assert_eq!(cube_256((0.0, 0.0, 0.0)), Color::Ansi256(16));
        assert_eq!(cube_256((1.0, 1.0, 1.0)), Color::Ansi256(231));
        assert_eq!(cube_256((0.75, 0.75, 0.0)), Color::Ansi256(16 + 36 * 3 + 6 * 3));
    }

    #[test]
    fn hsv_wraps_negative_and_large_hues() {
        let (r, g, b) = rgb_from_hsv(420.0, 1.0, 1.0);
        let (r2, g2, b2) = rgb_from_hsv(60.0, 1.0, 1.0);
        assert!((r - r2).abs() < 1e-9 && (g - g2).abs() < 1e-9 && (b - b2).abs() < 1e-9);
        let (r, _, _) = rgb_from_hsv(-3.0, 0.8, 1.0);
        assert!(r > 0.9);
    }
}
