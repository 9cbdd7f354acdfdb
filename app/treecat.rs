//! Command-line interface for treecat.
//!
//! Prints a directory tree with each file's contents previewed beneath it,
//! or a single file (`--file`) or standard input (`-`) without the tree.

use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use treecat::output::{OutputFormat as TreeFormat, file_record, write_line, write_record};
use treecat::{
    ContentFormatter, FileLines, Highlighter, PlainText, RenderConfig, RenderConfigBuilder,
    SyntaxHighlighter, TreeOptionsBuilder, TreeWalker, TreecatError,
};

/// Width used when nothing else reports one.
const FALLBACK_WIDTH: usize = 80;

/// treecat: displays a tree view of files and their contents
#[derive(Parser)]
#[command(name = "treecat", version, about, long_about = None)]
struct Cli {
    /// Paths to show (default current dir); `-` reads standard input
    paths: Vec<PathBuf>,

    /// Show file names only, not contents
    #[arg(short, long)]
    summary: bool,

    /// Show only the first MAX_LINES lines of each file (0 = all)
    #[arg(short = 'L', long, default_value_t = 0)]
    max_lines: usize,

    /// Crop lines to this many columns (0 = no limit, default terminal width)
    #[arg(short = 'W', long)]
    max_line_width: Option<usize>,

    /// Show folders only, no files
    #[arg(short = 'D', long)]
    no_files: bool,

    /// Descend at most MAX_DEPTH levels
    #[arg(short = 'R', long)]
    max_depth: Option<usize>,

    /// Show all files as hex
    #[arg(short = 'B', long)]
    as_binary: bool,

    /// Do not use ANSI colors
    #[arg(long)]
    no_color: bool,

    /// Skip recursive directory totals
    #[arg(long)]
    no_sums: bool,

    /// Hide line numbers
    #[arg(long)]
    no_line_numbers: bool,

    /// Disable content highlighting
    #[arg(long)]
    no_highlight: bool,

    /// Show one file only (no structure/headers)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Ignore patterns (can be repeated)
    #[arg(short = 'I', long = "ignore")]
    ignore_patterns: Vec<String>,

    /// Include hidden files
    #[arg(long)]
    hidden: bool,

    /// Respect .gitignore files
    #[arg(long)]
    gitignore: bool,

    /// Per-file read deadline in milliseconds (0 = none)
    #[arg(long, default_value_t = 1000)]
    timeout_ms: u64,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Tree)]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Tree,
    Json,
}

impl From<OutputFormat> for TreeFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Tree => TreeFormat::Tree,
            OutputFormat::Json => TreeFormat::Json,
        }
    }
}

/// Columns of the terminal on `fd`, if it is one.
#[cfg(unix)]
fn tty_columns(fd: libc::c_int) -> Option<usize> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut ws) };
    (result == 0 && ws.ws_col > 0).then_some(usize::from(ws.ws_col))
}

#[cfg(not(unix))]
fn tty_columns(_fd: i32) -> Option<usize> {
    None
}

/// Width of the terminal on stdout or stdin, then $COLUMNS, then 80.
fn terminal_width() -> usize {
    resolve_width(
        tty_columns(1).or_else(|| tty_columns(0)),
        std::env::var("COLUMNS").ok(),
    )
}

fn resolve_width(tty: Option<usize>, columns: Option<String>) -> usize {
    tty.or_else(|| {
        columns
            .and_then(|c| c.trim().parse().ok())
            .filter(|&w: &usize| w > 0)
    })
    .unwrap_or(FALLBACK_WIDTH)
}

impl Cli {
    fn render_config(&self) -> RenderConfig {
        let timeout = (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms));
        RenderConfigBuilder::new()
            .max_lines(self.max_lines)
            .max_line_width(self.max_line_width.unwrap_or_else(terminal_width))
            .as_binary(self.as_binary)
            .show_line_numbers(!self.no_line_numbers)
            .read_timeout(timeout)
            .build()
    }

    fn highlighter(&self) -> Box<dyn Highlighter> {
        if self.no_highlight {
            Box::new(PlainText)
        } else {
            Box::new(SyntaxHighlighter::new())
        }
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("treecat=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("treecat=warn"))
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();
}

fn setup_signal_handler() -> Arc<AtomicBool> {
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = cancelled.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::info!("interrupt received, stopping");
        if flag.swap(true, Ordering::SeqCst) {
            exit(130);
        }
    }) {
        tracing::warn!("failed to set Ctrl+C handler: {e}");
    }
    cancelled
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);
    let cancelled = setup_signal_handler();

    match run(&cli, &cancelled) {
        Ok(()) => {}
        Err(TreecatError::Interrupted) => exit(130),
        Err(e) if e.is_broken_pipe() => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    }
}

fn run(cli: &Cli, cancelled: &Arc<AtomicBool>) -> Result<(), TreecatError> {
    let config = cli.render_config();
    tracing::debug!(?config, "render configuration");
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let color = !cli.no_color;

    let stdin_only = cli.paths.len() == 1 && cli.paths[0].as_os_str() == "-";
    if stdin_only || cli.file.is_some() {
        let formatter = ContentFormatter::new(config).with_highlighter(cli.highlighter());
        let (path, lines) = match &cli.file {
            Some(path) => (path.clone(), formatter.format(path, "")),
            None => (PathBuf::from("-"), formatter.format_reader(io::stdin().lock(), "")),
        };
        return write_single(&mut out, cli.format, &path, lines, color, cancelled);
    }

    let roots = if cli.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        cli.paths.clone()
    };
    for root in roots {
        let options = TreeOptionsBuilder::new(root)
            .summary(cli.summary)
            .no_files(cli.no_files)
            .include_hidden(cli.hidden)
            .respect_gitignore(cli.gitignore)
            .ignore_patterns(cli.ignore_patterns.clone())
            .sums(!cli.no_sums)
            .color(color)
            .format(cli.format.into())
            .render(config.clone());
        let options = match cli.max_depth {
            Some(depth) => options.max_depth(depth),
            None => options.no_limit_depth(),
        };
        let summary = TreeWalker::new(options.build())
            .with_highlighter(cli.highlighter())
            .with_cancel_flag(cancelled.clone())
            .walk(&mut out)?;
        tracing::debug!(dirs = summary.dirs, files = summary.files, "walk finished");
    }
    out.flush().map_err(|e| TreecatError::io("<stdout>", e))
}

fn write_single<W: Write>(
    out: &mut W,
    format: OutputFormat,
    path: &std::path::Path,
    lines: FileLines,
    color: bool,
    cancelled: &AtomicBool,
) -> Result<(), TreecatError> {
    if format == OutputFormat::Json {
        return write_record(out, &file_record(path, lines));
    }
    for line in lines {
        if cancelled.load(Ordering::SeqCst) {
            return Err(TreecatError::Interrupted);
        }
        write_line(out, &line.text, color)?;
    }
    out.flush().map_err(|e| TreecatError::io("<stdout>", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_size_wins_over_columns() {
        assert_eq!(resolve_width(Some(132), Some("100".into())), 132);
        assert_eq!(resolve_width(None, Some(" 100 ".into())), 100);
        assert_eq!(resolve_width(None, Some("0".into())), FALLBACK_WIDTH);
        assert_eq!(resolve_width(None, None), FALLBACK_WIDTH);
    }
}
