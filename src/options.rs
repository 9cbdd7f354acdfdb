use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Deadline applied to each file read unless configured otherwise.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// How file contents are rendered. Zero means unlimited for both caps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub max_lines: usize,
    pub max_line_width: usize,
    pub as_binary: bool,
    pub show_line_numbers: bool,
    /// Overrides the bytes shown per hex dump row.
    pub bytes_per_row: Option<usize>,
    /// `None` reads without a deadline.
    pub read_timeout: Option<Duration>,
}
impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_lines: 0,
            max_line_width: 0,
            as_binary: false,
            show_line_numbers: true,
            bytes_per_row: None,
            read_timeout: Some(DEFAULT_READ_TIMEOUT),
        }
    }
}
impl RenderConfig {
    /// Upper bound on bytes worth reading: enough for `max_lines` full
    /// lines. `None` when either cap is unlimited.
    pub fn read_budget(&self) -> Option<u64> {
        if self.max_lines > 0 && self.max_line_width > 0 {
            Some(self.max_lines as u64 * self.max_line_width as u64)
        } else {
            None
        }
    }
}
#[derive(Debug, Default)]
pub struct RenderConfigBuilder {
    config: RenderConfig,
}
impl RenderConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn max_lines(mut self, lines: usize) -> Self {
        self.config.max_lines = lines;
        self
    }
    pub fn max_line_width(mut self, width: usize) -> Self {
        self.config.max_line_width = width;
        self
    }
    pub fn as_binary(mut self, yes: bool) -> Self {
        self.config.as_binary = yes;
        self
    }
    pub fn show_line_numbers(mut self, yes: bool) -> Self {
        self.config.show_line_numbers = yes;
        self
    }
    pub fn bytes_per_row(mut self, bytes: Option<usize>) -> Self {
        self.config.bytes_per_row = bytes;
        self
    }
    pub fn read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.read_timeout = timeout;
        self
    }
    pub fn build(self) -> RenderConfig {
        self.config
    }
}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeOptions {
    pub root: PathBuf,
    /// Names only, no file contents.
    pub summary: bool,
    pub no_files: bool,
    pub max_depth: Option<usize>,
    pub include_hidden: bool,
    pub respect_gitignore: bool,
    pub ignore_patterns: Vec<String>,
    /// Recursive subdirectory, file and size totals on directory lines.
    pub sums: bool,
    pub color: bool,
    pub format: OutputFormat,
    pub render: RenderConfig,
}
impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            summary: false,
            no_files: false,
            max_depth: None,
            include_hidden: false,
            respect_gitignore: false,
            ignore_patterns: Vec::new(),
            sums: true,
            color: true,
            format: OutputFormat::Tree,
            render: RenderConfig::default(),
        }
    }
}
#[derive(Debug, Default)]
pub struct TreeOptionsBuilder {
    options: TreeOptions,
}
impl TreeOptionsBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            options: TreeOptions {
                root: root.into(),
                ..Default::default()
            },
        }
    }
    pub fn summary(mut self, yes: bool) -> Self {
        self.options.summary = yes;
        self
    }
    pub fn no_files(mut self, yes: bool) -> Self {
        self.options.no_files = yes;
        self
    }
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = Some(depth);
        self
    }
    pub fn no_limit_depth(mut self) -> Self {
        self.options.max_depth = None;
        self
    }
    pub fn include_hidden(mut self, yes: bool) -> Self {
        self.options.include_hidden = yes;
        self
    }
    pub fn respect_gitignore(mut self, yes: bool) -> Self {
        self.options.respect_gitignore = yes;
        self
    }
    pub fn ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.options.ignore_patterns = patterns;
        self
    }
    pub fn sums(mut self, yes: bool) -> Self {
        self.options.sums = yes;
        self
    }
    pub fn color(mut self, yes: bool) -> Self {
        self.options.color = yes;
        self
    }
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.options.format = format;
        self
    }
    pub fn render(mut self, config: RenderConfig) -> Self {
        self.options.render = config;
        self
    }
    pub fn build(self) -> TreeOptions {
        self.options
    }
}
