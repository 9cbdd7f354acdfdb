//! Optional syntax highlighting.
//!
//! The formatter only depends on the [`Highlighter`] trait. A failing
//! highlighter never aborts rendering; the caller logs the error and falls
//! back to the text as read.

use crate::error::TreecatError;
use crate::meta::mime_type;
use crate::style::{Color, Color8, RESET, Style, cube_256, rgb_from_hsv};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Theme used by [`SyntaxHighlighter::new`].
pub const DEFAULT_THEME: &str = "Solarized (dark)";

static SYNTAXES: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEMES: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

static INTEGER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([+-]?)([0-9]+)(\s*)$").expect("valid integer regex"));

/// Adds styling to decoded text before it is split into lines.
pub trait Highlighter {
    /// Returns styled text. `path` is a hint for picking a grammar and is
    /// absent for stdin.
    fn highlight(&self, path: Option<&Path>, text: &str) -> Result<String, TreecatError>;
}

/// Leaves text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl Highlighter for PlainText {
    fn highlight(&self, _path: Option<&Path>, text: &str) -> Result<String, TreecatError> {
        Ok(text.to_owned())
    }
}

/// Colours a file holding a single decimal integer by groups of three
/// digits, so the magnitude can be read at a glance.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerHighlighter;

impl IntegerHighlighter {
    /// Whether `text` is a single decimal integer this highlighter colours.
    pub fn matches(text: &str) -> bool {
        text.len() <= 30 && INTEGER_RE.is_match(text)
    }
}

impl Highlighter for IntegerHighlighter {
    fn highlight(&self, _path: Option<&Path>, text: &str) -> Result<String, TreecatError> {
        if text.len() > 30 {
            return Ok(text.to_owned());
        }
        let Some(caps) = INTEGER_RE.captures(text) else {
            return Ok(text.to_owned());
        };
        let (sign, digits, suffix) = (&caps[1], &caps[2], &caps[3]);

        let mut out = Style::fg(Color::Basic(Color8::Yellow)).render();
        out.push_str(sign);
        let mut end = digits.len() % 3;
        if end == 0 {
            end = 3;
        }
        let mut start = 0;
        while start < digits.len() {
            let remaining = digits.len() - start;
            let hue = remaining as f64 * 30.0;
            out.push_str(&Style::fg(cube_256(rgb_from_hsv(hue, 0.2, 1.0))).render());
            out.push_str(&digits[start..end]);
            start = end;
            end += 3;
        }
        out.push_str(RESET);
        out.push_str(suffix);
        Ok(out)
    }
}

/// Grammar-based highlighting with 256-colour output.
///
/// The grammar is picked from the MIME type guessed for the path, then the
/// file extension or name, then the first line of the text (shebangs and
/// modelines). Text without a matching grammar is returned unchanged.
/// Files holding a single integer go to [`IntegerHighlighter`] instead.
#[derive(Debug, Clone)]
pub struct SyntaxHighlighter {
    theme: String,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    pub fn new() -> Self {
        Self::with_theme(DEFAULT_THEME)
    }

    /// Uses one of syntect's bundled themes, e.g. `base16-ocean.dark`.
    pub fn with_theme(theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
        }
    }

    fn theme(&self) -> Result<&'static Theme, TreecatError> {
        THEMES
            .themes
            .get(&self.theme)
            .ok_or_else(|| TreecatError::Highlight(format!("unknown theme '{}'", self.theme)))
    }

    fn syntax_for(path: Option<&Path>, text: &str) -> Option<&'static SyntaxReference> {
        let by_path = path.and_then(|path| {
            let mime = mime_type(path);
            let by_mime = mime
                .split_once('/')
                .map(|(_, sub)| sub.trim_start_matches("x-"))
                .and_then(|token| SYNTAXES.find_syntax_by_token(token));
            by_mime
                .or_else(|| {
                    path.extension()
                        .and_then(|ext| SYNTAXES.find_syntax_by_extension(&ext.to_string_lossy()))
                })
                .or_else(|| {
                    path.file_name()
                        .and_then(|name| SYNTAXES.find_syntax_by_extension(&name.to_string_lossy()))
                })
        });
        by_path
            .or_else(|| SYNTAXES.find_syntax_by_first_line(text))
            .filter(|syntax| syntax.name != "Plain Text")
    }
}

impl Highlighter for SyntaxHighlighter {
    fn highlight(&self, path: Option<&Path>, text: &str) -> Result<String, TreecatError> {
        if IntegerHighlighter::matches(text) {
            return IntegerHighlighter.highlight(path, text);
        }
        let Some(syntax) = Self::syntax_for(path, text) else {
            return Ok(text.to_owned());
        };
        tracing::debug!(syntax = %syntax.name, "highlighting");
        let mut lines = HighlightLines::new(syntax, self.theme()?);
        let mut out = String::with_capacity(text.len() * 2);
        for line in LinesWithEndings::from(text) {
            let ranges = lines
                .highlight_line(line, &SYNTAXES)
                .map_err(|e| TreecatError::Highlight(e.to_string()))?;
            for (style, piece) in ranges {
                // Keep the terminator outside the styled span so every line
                // still ends in a bare newline.
                let body = piece.trim_end_matches(['\r', '\n']);
                if !body.is_empty() {
                    let fg = style.foreground;
                    let channels = (
                        f64::from(fg.r) / 255.0,
                        f64::from(fg.g) / 255.0,
                        f64::from(fg.b) / 255.0,
                    );
                    out.push_str(&Style::fg(cube_256(channels)).paint(body));
                }
                out.push_str(&piece[body.len()..]);
            }
        }
        Ok(out)
    }
}
