//! Line-numbered, width-limited text rows.

use crate::style::{Color, Color8, RESET, Style, escape_ranges, meta, visible_width};
use std::borrow::Cow;

/// Number of decimal digits needed to print `n`.
pub fn line_number_digits(n: usize) -> usize {
    n.max(1).to_string().len()
}

/// Number of logical lines in `text`; a trailing terminator does not start
/// a new line.
pub fn count_lines(text: &str) -> usize {
    text.split_inclusive('\n').count()
}

/// Removes one trailing `\n` or `\r\n`.
pub fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Replaces carriage returns and line feeds inside a line body with
/// visible symbols so the line stays on one terminal row.
pub fn escape_line_breaks(body: &str) -> Cow<'_, str> {
    if !body.contains(['\r', '\n']) {
        return Cow::Borrowed(body);
    }
    Cow::Owned(body.replace('\r', "␍").replace('\n', "␊"))
}

/// Byte offsets at which `s` may be cut without splitting a character or
/// an escape sequence, in ascending order, including `0` and `s.len()`.
fn cut_points(s: &str) -> Vec<usize> {
    let escapes = escape_ranges(s);
    let mut next_escape = escapes.iter().peekable();
    let mut points = Vec::with_capacity(s.len() + 1);
    for b in s.char_indices().map(|(i, _)| i).chain(std::iter::once(s.len())) {
        while next_escape.peek().is_some_and(|&&(_, end)| end <= b) {
            next_escape.next();
        }
        let inside = next_escape.peek().is_some_and(|&&(start, end)| start < b && b < end);
        if !inside {
            points.push(b);
        }
    }
    points
}

/// Markers tried in order when a line must be cut, longest first.
fn truncation_markers(body_width: usize) -> [String; 3] {
    [
        format!(" [{body_width} chars]"),
        format!(" [{body_width}]"),
        "…".to_string(),
    ]
}

/// Fits `body` after `lead` into `max_width` visible columns. `lead` is
/// everything printed before the body on the same row, gutter included.
///
/// Returns the body unchanged when it fits. Otherwise the longest prefix of
/// the body is kept such that, followed by a ` [N chars]` marker, the line
/// fits; `N` is the visible width of the whole body. When that marker does
/// not fit next to the lead, a shorter one is used. Visible width is not
/// proportional to byte length once escapes and multi-byte characters are
/// involved, so the cut is found by bisection over valid cut points.
pub fn fit_width<'a>(lead: &str, body: &'a str, max_width: usize) -> Cow<'a, str> {
    if max_width == 0 {
        return Cow::Borrowed(body);
    }
    let lead_width = visible_width(lead);
    let body_width = visible_width(body);
    if lead_width + body_width <= max_width {
        return Cow::Borrowed(body);
    }

    let room = max_width.saturating_sub(lead_width);
    let marker = truncation_markers(body_width)
        .into_iter()
        .find(|m| visible_width(m) <= room)
        .unwrap_or_default();
    let budget = room - visible_width(&marker);
    let points = cut_points(body);
    let fits = points.partition_point(|&b| visible_width(&body[..b]) <= budget);
    let cut = points[fits.saturating_sub(1)];
    tracing::trace!(body_width, budget, cut, "truncating line");

    if marker.is_empty() {
        return Cow::Owned(format!("{}{RESET}", &body[..cut]));
    }
    Cow::Owned(format!("{}{RESET}{}", &body[..cut], meta(&marker)))
}

/// Renders numbered text rows under a fixed prefix.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    prefix: String,
    max_line_width: usize,
    show_line_numbers: bool,
    digits: usize,
}

impl TextRenderer {
    /// `last_number` is the largest line number that will be rendered and
    /// sets the zero-padded width of the gutter.
    pub fn new(
        prefix: impl Into<String>,
        max_line_width: usize,
        show_line_numbers: bool,
        last_number: usize,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            max_line_width,
            show_line_numbers,
            digits: line_number_digits(last_number),
        }
    }

    /// Renders one logical line (terminator optional) as line `number`.
    pub fn render_line(&self, number: usize, line: &str) -> String {
        let body = escape_line_breaks(strip_terminator(line));
        let white = Style::fg(Color::Basic(Color8::White)).render();
        if self.show_line_numbers {
            let gutter = format!("{number:0width$}│ ", width = self.digits);
            let lead = format!("{}{gutter}", self.prefix);
            let body = fit_width(&lead, &body, self.max_line_width);
            let yellow = Style::fg(Color::Basic(Color8::Yellow)).render();
            format!("{}{yellow}{gutter}{white}{body}{RESET}", self.prefix)
        } else {
            let body = fit_width(&self.prefix, &body, self.max_line_width);
            format!("{}{white}{body}{RESET}", self.prefix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::strip_ansi;

    #[test]
    fn cut_points_skip_escape_interiors() {
        let s = "a\x1b[31mb";
        assert_eq!(cut_points(s), vec![0, 1, 6, 7]);
        assert_eq!(cut_points("é!"), vec![0, 2, 3]);
    }

    #[test]
    fn terminators_are_removed_once() {
        assert_eq!(strip_terminator("x\r\n"), "x");
        assert_eq!(strip_terminator("x\n\n"), "x\n");
        assert_eq!(strip_terminator("x"), "x");
    }

    #[test]
    fn short_marker_when_lead_is_wide() {
        let body = "z".repeat(100);
        let fitted = fit_width("│   │   │   ", &body, 20);
        assert_eq!(strip_ansi(&fitted), "zz [100]");
        let fitted = fit_width("│   │   │   ", &body, 13);
        assert_eq!(strip_ansi(&fitted), "…");
        let fitted = fit_width("│   │   │   ", &body, 12);
        assert_eq!(strip_ansi(&fitted), "");
    }

    #[test]
    fn digits_for_counts() {
        assert_eq!(line_number_digits(0), 1);
        assert_eq!(line_number_digits(9), 1);
        assert_eq!(line_number_digits(10), 2);
        assert_eq!(line_number_digits(100), 3);
    }
}
