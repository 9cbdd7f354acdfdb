//! # Treecat
//!
//! `treecat` renders a directory tree to a terminal and previews every file
//! inline: text with line numbers and optional highlighting, binary data as
//! a colorized hex and glyph dump.
//!
//! The heart of the crate is the content pipeline. [`ContentFormatter`]
//! reads a file under a deadline and a byte budget, [`classify`] decides
//! whether the bytes are text, and [`TextRenderer`] or [`BinaryRenderer`]
//! turn them into lines that respect the configured line and width caps.
//! [`TreeWalker`] places those lines under box-drawing prefixes.
//!
//! # Example
//!
//! ```no_run
//! use treecat::{RenderConfigBuilder, format_file};
//! use std::path::Path;
//!
//! let config = RenderConfigBuilder::new()
//!     .max_lines(20)
//!     .max_line_width(100)
//!     .build();
//!
//! for line in format_file(Path::new("Cargo.toml"), &config) {
//!     println!("{line}");
//! }
//! ```

pub mod binary;
mod classify;
mod engine;
mod error;
pub mod highlight;
pub mod meta;
mod options;
pub mod output;
mod reader;
pub mod style;
pub mod text;
mod tree;
mod types;

pub use binary::BinaryRenderer;
pub use classify::{CONTROL_RATIO, PRINTABLE_RATIO, classify};
pub use engine::{ContentFormatter, FileLines, format_bytes, format_file};
pub use error::TreecatError;
pub use highlight::{Highlighter, IntegerHighlighter, PlainText, SyntaxHighlighter};
pub use options::{
    DEFAULT_READ_TIMEOUT, RenderConfig, RenderConfigBuilder, TreeOptions, TreeOptionsBuilder,
};
pub use reader::{read_bounded, read_with_deadline};
pub use style::rgb_from_hsv;
pub use text::TextRenderer;
pub use tree::{DirStatsCache, TreeWalker, WalkSummary, treecat};
pub use types::{Classification, DirStats, DisplayLine, FileRecord, LineKind, RawContent, Truncation};
