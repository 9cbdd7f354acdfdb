use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Bytes read from a file, with a flag telling whether the read reached
/// the end of the file or stopped at the byte budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContent {
    pub bytes: Vec<u8>,
    pub eof: bool,
}

/// Outcome of inspecting a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Valid UTF-8 that looks like text, already decoded.
    Text(String),
    Binary,
    Empty,
}

/// What a [`DisplayLine`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineKind {
    /// A line of text, numbered from 1.
    Text { number: usize },
    /// A hex dump row starting at `offset`.
    Binary { offset: usize },
    /// The single marker for a file without content.
    Empty,
    /// Trailing marker after the line cap was applied.
    Truncated,
    /// A read failure rendered in place of the content.
    Error,
}

/// One rendered row of output, styled and ready to print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayLine {
    #[serde(flatten)]
    pub kind: LineKind,
    pub text: String,
}

impl DisplayLine {
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// The line with all escape sequences removed.
    pub fn plain(&self) -> String {
        crate::style::strip_ansi(&self.text).into_owned()
    }
}

impl fmt::Display for DisplayLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// What the trailing marker reports once output has been cut short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Truncation {
    Lines { total: usize },
    Bytes { total: u64 },
    /// Source size unknown; at least `read` bytes exist.
    AtLeastBytes { read: u64 },
}

impl fmt::Display for Truncation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Truncation::Lines { total } => write!(f, "... [{total} lines total]"),
            Truncation::Bytes { total } => write!(f, "... [{total} bytes total]"),
            Truncation::AtLeastBytes { read } => write!(f, "... [more than {read} bytes]"),
        }
    }
}

/// Counts gathered for a directory and everything below it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirStats {
    pub subdirs: u64,
    pub files: u64,
    pub total_bytes: u64,
}

/// A file's rendered preview, as emitted by the JSON output format.
#[derive(Debug, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: PathBuf,
    pub lines: Vec<DisplayLine>,
}
