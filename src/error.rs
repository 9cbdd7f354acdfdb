use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum TreecatError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Read Timeout")]
    ReadTimeout { path: PathBuf },
    #[error("Highlighting failed: {0}")]
    Highlight(String),
    #[error("Walk error: {0}")]
    Walk(String),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("Interrupted")]
    Interrupted,
}
impl TreecatError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TreecatError::Io {
            path: path.into(),
            source,
        }
    }
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, TreecatError::Io { source, .. } if source.kind() == std::io::ErrorKind::BrokenPipe)
    }
    /// Short message for an inline error line: the OS message for I/O
    /// failures, since the path is already on screen.
    pub fn display_message(&self) -> String {
        match self {
            TreecatError::Io { source, .. } => os_message(source),
            other => other.to_string(),
        }
    }
}
fn os_message(err: &std::io::Error) -> String {
    let full = err.to_string();
    match full.find(" (os error") {
        Some(idx) => full[..idx].to_string(),
        None => full,
    }
}
