use crate::binary::{BinaryRenderer, format_offset, offset_digits};
use crate::classify::classify;
use crate::error::TreecatError;
use crate::highlight::{Highlighter, PlainText};
use crate::options::RenderConfig;
use crate::reader::{read_from, read_with_deadline};
use crate::style::{Color, Color8, RESET, Style, meta, visible_width};
use crate::text::{TextRenderer, count_lines};
use crate::types::{Classification, DisplayLine, LineKind, RawContent, Truncation};
use std::fs;
use std::io::Read;
use std::path::Path;
/// Marker glyph introducing the empty and error lines.
const ARROW: &str = " 🡺  ";
/// Turns a file into a bounded sequence of display lines.
///
/// Reading, classification and highlighting happen up front; each line is
/// styled and width-fitted only when the returned [`FileLines`] is advanced.
pub struct ContentFormatter {
    config: RenderConfig,
    highlighter: Box<dyn Highlighter>,
}
impl ContentFormatter {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            highlighter: Box::new(PlainText),
        }
    }
    pub fn with_highlighter(mut self, highlighter: Box<dyn Highlighter>) -> Self {
        self.highlighter = highlighter;
        self
    }
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }
    /// Formats the file at `path`, each line starting with `prefix`.
    ///
    /// Read failures and timeouts come back as a single error line.
    pub fn format(&self, path: &Path, prefix: &str) -> FileLines {
        let budget = self.config.read_budget();
        tracing::debug!(path = %path.display(), ?budget, "formatting file");
        let known_size = fs::metadata(path).ok().map(|m| m.len());
        match read_with_deadline(path, budget, self.config.read_timeout) {
            Ok(raw) => self.format_content(raw, known_size, Some(path), prefix),
            Err(e) => FileLines::single(error_line(prefix, &e)),
        }
    }
    /// Formats whatever `reader` yields, e.g. standard input.
    pub fn format_reader<R: Read>(&self, reader: R, prefix: &str) -> FileLines {
        match read_from(reader, self.config.read_budget()) {
            Ok(raw) => self.format_content(raw, None, None, prefix),
            Err(e) => FileLines::single(error_line(prefix, &TreecatError::io("<stdin>", e))),
        }
    }
    /// Formats bytes already in memory. `known_size` is the full size of
    /// the source when `raw` may be only its beginning.
    pub fn format_content(
        &self,
        raw: RawContent,
        known_size: Option<u64>,
        path: Option<&Path>,
        prefix: &str,
    ) -> FileLines {
        let RawContent { mut bytes, eof } = raw;
        if !eof {
            trim_partial_char(&mut bytes);
        }
        let cap = self.config.max_lines;
        match classify(&bytes) {
            Classification::Empty => FileLines::single(empty_line(prefix)),
            _ if self.config.as_binary => self.binary_lines(bytes, eof, known_size, prefix),
            Classification::Binary => self.binary_lines(bytes, eof, known_size, prefix),
            Classification::Text(text) => {
                let text = match self.highlighter.highlight(path, &text) {
                    Ok(styled) => styled,
                    Err(e) => {
                        tracing::warn!("highlighting failed, showing plain text: {e}");
                        text
                    }
                };
                let total = count_lines(&text);
                let shown = if cap > 0 { total.min(cap) } else { total };
                tracing::debug!(total, shown, eof, "text content");
                let trailer = if !eof {
                    Some(bytes_truncation(known_size, bytes.len()))
                } else if shown < total {
                    Some(Truncation::Lines { total })
                } else {
                    None
                };
                let renderer = TextRenderer::new(
                    prefix,
                    self.config.max_line_width,
                    self.config.show_line_numbers,
                    shown,
                );
                FileLines {
                    source: Source::Text {
                        text,
                        pos: 0,
                        number: 0,
                        renderer,
                    },
                    remaining: shown,
                    trailer: trailer.map(|t| marker_line(prefix, t)),
                }
            }
        }
    }
    fn binary_lines(
        &self,
        bytes: Vec<u8>,
        eof: bool,
        known_size: Option<u64>,
        prefix: &str,
    ) -> FileLines {
        let renderer = match self.config.bytes_per_row {
            Some(n) => BinaryRenderer::new(n),
            None => BinaryRenderer::for_width(self.config.max_line_width, visible_width(prefix)),
        };
        let cap = self.config.max_lines;
        let total = renderer.row_count(bytes.len());
        let shown = if cap > 0 { total.min(cap) } else { total };
        tracing::debug!(total, shown, eof, bytes = bytes.len(), "binary content");
        let trailer = if !eof || shown < total {
            Some(bytes_truncation(known_size, bytes.len()))
        } else {
            None
        };
        let last_offset = shown.saturating_sub(1) * renderer.bytes_per_row();
        FileLines {
            source: Source::Binary {
                data: bytes,
                row: 0,
                digits: offset_digits(last_offset),
                renderer,
                prefix: prefix.to_owned(),
            },
            remaining: shown,
            trailer: trailer.map(|t| marker_line(prefix, t)),
        }
    }
}
/// Drops a multi-byte character cut in half by the read budget, so a
/// truncated UTF-8 file still decodes.
fn trim_partial_char(bytes: &mut Vec<u8>) {
    if let Err(e) = std::str::from_utf8(bytes) {
        if e.error_len().is_none() && e.valid_up_to() > 0 {
            bytes.truncate(e.valid_up_to());
        }
    }
}
fn bytes_truncation(known_size: Option<u64>, read: usize) -> Truncation {
    match known_size {
        Some(total) if total > read as u64 => Truncation::Bytes { total },
        Some(_) => Truncation::Bytes { total: read as u64 },
        None => Truncation::AtLeastBytes { read: read as u64 },
    }
}
fn empty_line(prefix: &str) -> DisplayLine {
    DisplayLine::new(LineKind::Empty, format!("{prefix}{ARROW}⬔{RESET}"))
}
fn error_line(prefix: &str, err: &TreecatError) -> DisplayLine {
    let style = Style::bg(Color::Basic(Color8::Red)).bold();
    DisplayLine::new(
        LineKind::Error,
        format!("{prefix}{ARROW}{}", style.paint(&err.display_message())),
    )
}
fn marker_line(prefix: &str, truncation: Truncation) -> DisplayLine {
    DisplayLine::new(
        LineKind::Truncated,
        format!("{prefix}{}", meta(&truncation.to_string())),
    )
}
enum Source {
    Text {
        text: String,
        pos: usize,
        number: usize,
        renderer: TextRenderer,
    },
    Binary {
        data: Vec<u8>,
        row: usize,
        digits: usize,
        renderer: BinaryRenderer,
        prefix: String,
    },
    Done,
}
/// Lazily rendered lines of one file, followed by an optional truncation
/// marker. Single pass; format the file again to start over.
pub struct FileLines {
    source: Source,
    remaining: usize,
    trailer: Option<DisplayLine>,
}
impl FileLines {
    fn single(line: DisplayLine) -> Self {
        Self {
            source: Source::Done,
            remaining: 0,
            trailer: Some(line),
        }
    }
    fn next_content(&mut self) -> Option<DisplayLine> {
        match &mut self.source {
            Source::Text {
                text,
                pos,
                number,
                renderer,
            } => {
                if *pos >= text.len() {
                    return None;
                }
                let rest = &text[*pos..];
                let end = rest.find('\n').map_or(rest.len(), |i| i + 1);
                *pos += end;
                *number += 1;
                let line = renderer.render_line(*number, &rest[..end]);
                Some(DisplayLine::new(LineKind::Text { number: *number }, line))
            }
            Source::Binary {
                data,
                row,
                digits,
                renderer,
                prefix,
            } => {
                let offset = *row * renderer.bytes_per_row();
                if offset >= data.len() {
                    return None;
                }
                let end = (offset + renderer.bytes_per_row()).min(data.len());
                *row += 1;
                let yellow = Style::fg(Color::Basic(Color8::Yellow)).render();
                let white = Style::fg(Color::Basic(Color8::White)).render();
                let text = format!(
                    "{prefix}{yellow}{}│{white}{}{RESET}",
                    format_offset(offset, *digits),
                    renderer.row(&data[offset..end])
                );
                Some(DisplayLine::new(LineKind::Binary { offset }, text))
            }
            Source::Done => None,
        }
    }
}
impl Iterator for FileLines {
    type Item = DisplayLine;
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining > 0 {
            self.remaining -= 1;
            if let Some(line) = self.next_content() {
                return Some(line);
            }
            self.remaining = 0;
        }
        self.source = Source::Done;
        self.trailer.take()
    }
}
/// Formats the file at `path` with the default (plain) highlighter.
pub fn format_file(path: &Path, config: &RenderConfig) -> FileLines {
    ContentFormatter::new(config.clone()).format(path, "")
}

/// Formats an in-memory buffer, treated as a complete source.
pub fn format_bytes(bytes: &[u8], config: &RenderConfig) -> FileLines {
    let raw = RawContent {
        bytes: bytes.to_vec(),
        eof: true,
    };
    ContentFormatter::new(config.clone()).format_content(raw, None, None, "")
}
