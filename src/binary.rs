//! Colorized hex and glyph dump of binary data.
//!
//! Each byte gets a fixed style from [`byte_style`] so that neighbouring
//! value ranges (control bytes, punctuation, letters, high bytes) stand
//! apart. Adjacent bytes sharing a style share one escape sequence.

use crate::style::{Color, Color8, RESET, Style, cube_256, grey_256, rgb_from_hsv};
use once_cell::sync::Lazy;

/// Bytes per row when no width limit applies.
pub const DEFAULT_BYTES_PER_ROW: usize = 32;

const REPLACEMENT: char = '\u{FFFD}';
const NULL_GLYPH: char = '\u{2400}';
const ALNUM: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

static TABLE: Lazy<[(Style, char); 256]> = Lazy::new(|| std::array::from_fn(|x| compute_style(x as u8)));

fn hsv_256(h: f64, s: f64, v: f64) -> Color {
    cube_256(rgb_from_hsv(h, s, v))
}

fn glyph(x: u8) -> char {
    let printable = matches!(x, 0x20..=0x7e) || (x >= 0xa1 && x != 0xad);
    if printable { char::from(x) } else { REPLACEMENT }
}

fn compute_style(x: u8) -> (Style, char) {
    let c = glyph(x);
    let xf = f64::from(x);
    match x {
        0x00 => (
            Style::bg(grey_256(2)).with_fg(Color::Basic(Color8::Black)),
            NULL_GLYPH,
        ),
        0xff => (Style::bg(Color::Basic(Color8::Red)), c),
        0x20 => (Style::bg(hsv_256(80.0, 1.0, 0.5)), c),
        0x01..=0x1f => (
            Style::fg(hsv_256(60.0 - xf * 3.0, 0.8, 1.0)).on(hsv_256(60.0, 1.0, 0.2)),
            c,
        ),
        0x21..=0x2f => (Style::fg(hsv_256(210.0 + xf * 1.2, 0.8, 1.0)), c),
        0x3a..=0x40 | 0x5b..=0x60 | 0x7b..=0x7e => {
            (Style::fg(hsv_256(260.0 + xf * 1.2, 0.8, 1.0)), c)
        }
        0x80..=0xfe => (
            Style::fg(hsv_256(260.0 + xf * 1.2, 0.8, 1.0)).on(hsv_256(310.0, 0.5, 0.2)),
            c,
        ),
        _ => match ALNUM.iter().position(|&a| a == x) {
            Some(i) => (Style::fg(hsv_256(80.0 + i as f64 * 2.0, 1.0, 1.0)), c),
            None => (Style::fg(Color::Basic(Color8::Yellow)).bold(), REPLACEMENT),
        },
    }
}

/// The style and display glyph for a byte value.
pub fn byte_style(x: u8) -> (Style, char) {
    TABLE[usize::from(x)]
}

/// Appends `cells` to `out`, emitting a style change only where the style
/// differs from the previous cell.
fn push_runs<I>(out: &mut String, cells: I)
where
    I: IntoIterator<Item = (Style, String)>,
{
    let mut current: Option<Style> = None;
    for (style, cell) in cells {
        if current != Some(style) {
            if current.is_some() {
                out.push_str(RESET);
            }
            out.push_str(&style.render());
            current = Some(style);
        }
        out.push_str(&cell);
    }
    if current.is_some() {
        out.push_str(RESET);
    }
}

/// Width in hex digits of the row offset for a dump whose last row starts
/// at `max_offset`: one byte pair per 256x growth.
pub fn offset_digits(max_offset: usize) -> usize {
    let bytes = 1 + ((max_offset as f64 + 1.0).log2() / 8.0) as usize;
    bytes * 2
}

/// Renders byte buffers as rows of `bytes_per_row` bytes.
#[derive(Debug, Clone, Copy)]
pub struct BinaryRenderer {
    bytes_per_row: usize,
}

impl BinaryRenderer {
    pub fn new(bytes_per_row: usize) -> Self {
        Self {
            bytes_per_row: bytes_per_row.max(1),
        }
    }

    /// Bytes per row fitting `max_line_width` columns after `prefix_width`,
    /// rounded down to a multiple of four once there is room for four.
    ///
    /// A row takes four columns per byte plus at most 16 for the offset
    /// gutter and separator. Below one byte of room the row still shows one
    /// byte.
    pub fn for_width(max_line_width: usize, prefix_width: usize) -> Self {
        if max_line_width == 0 {
            return Self::new(DEFAULT_BYTES_PER_ROW);
        }
        let room = max_line_width.saturating_sub(prefix_width + 16) / 4;
        if room >= 4 {
            Self::new(4 * (room / 4))
        } else {
            Self::new(room.max(1))
        }
    }

    pub fn bytes_per_row(&self) -> usize {
        self.bytes_per_row
    }

    pub fn row_count(&self, len: usize) -> usize {
        len.div_ceil(self.bytes_per_row)
    }

    /// Hex half of a row, padded with blank cells to the full row width.
    pub fn hex_half(&self, span: &[u8]) -> String {
        let mut out = String::with_capacity(span.len() * 16);
        push_runs(
            &mut out,
            span.iter().map(|&x| (byte_style(x).0, format!(" {x:02x}"))),
        );
        for _ in span.len()..self.bytes_per_row {
            out.push_str("   ");
        }
        out
    }

    /// Glyph half of a row, one cell per byte.
    pub fn glyph_half(&self, span: &[u8]) -> String {
        let mut out = String::with_capacity(span.len() * 8);
        push_runs(
            &mut out,
            span.iter().map(|&x| {
                let (style, c) = byte_style(x);
                (style, c.to_string())
            }),
        );
        out
    }

    /// The hex and glyph halves of one row joined by the separator.
    pub fn row(&self, span: &[u8]) -> String {
        let separator = Style::fg(Color::Basic(Color8::Yellow)).paint("│");
        format!("{} {separator} {}", self.hex_half(span), self.glyph_half(span))
    }

    /// Lazily yields `(offset, row)` pairs for `data`.
    pub fn rows<'a>(&self, data: &'a [u8]) -> impl Iterator<Item = (usize, String)> + 'a {
        let renderer = *self;
        data.chunks(self.bytes_per_row)
            .enumerate()
            .map(move |(i, span)| (i * renderer.bytes_per_row, renderer.row(span)))
    }
}

/// Formats a row offset as zero-padded big-endian hex.
pub fn format_offset(offset: usize, digits: usize) -> String {
    format!("{offset:0digits$x}")
}
