//! Output formats for rendered trees.
//!
//! The tree format writes styled lines as they are produced. The JSON format
//! writes one object per previewed file, with escape sequences removed.

use crate::error::TreecatError;
use crate::types::{DisplayLine, FileRecord};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    Tree,
    Json,
}

/// Writes one rendered line, stripping escapes when colour is off.
pub fn write_line<W: Write>(out: &mut W, line: &str, color: bool) -> Result<(), TreecatError> {
    let result = if color {
        writeln!(out, "{line}")
    } else {
        writeln!(out, "{}", crate::style::strip_ansi(line))
    };
    result.map_err(|e| TreecatError::io("<stdout>", e))
}

/// Builds the JSON record for a file from its rendered lines.
pub fn file_record(path: &Path, lines: impl IntoIterator<Item = DisplayLine>) -> FileRecord {
    FileRecord {
        path: path.to_path_buf(),
        lines: lines
            .into_iter()
            .map(|line| DisplayLine::new(line.kind, line.plain()))
            .collect(),
    }
}

/// Writes a record as a single line of JSON.
pub fn write_record<W: Write>(out: &mut W, record: &FileRecord) -> Result<(), TreecatError> {
    let json = serde_json::to_string(record)
        .map_err(|e| TreecatError::Walk(format!("JSON serialization failed: {e}")))?;
    writeln!(out, "{json}").map_err(|e| TreecatError::io("<stdout>", e))
}
