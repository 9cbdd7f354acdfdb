//! Bounded file reads under a deadline.
//!
//! The read runs on a helper thread and the caller waits on a channel with
//! a timeout. When the deadline passes the helper is left to finish (or
//! stay blocked) on its own; its result is discarded. Abandoned helpers
//! are bounded only by the process lifetime: one stays parked per FIFO or
//! stalled device visited. If no helper thread can be started the read
//! proceeds without a deadline.

use crate::error::TreecatError;
use crate::types::RawContent;
use crossbeam_channel::RecvTimeoutError;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Reads `path`, stopping after `limit` bytes when a limit is given.
pub fn read_bounded(path: &Path, limit: Option<u64>) -> Result<RawContent, TreecatError> {
    let file = File::open(path).map_err(|e| TreecatError::io(path, e))?;
    read_from(file, limit).map_err(|e| TreecatError::io(path, e))
}

/// Reads from any reader, stopping after `limit` bytes when a limit is given.
pub fn read_from<R: Read>(reader: R, limit: Option<u64>) -> std::io::Result<RawContent> {
    let mut bytes = Vec::new();
    match limit {
        Some(limit) => {
            // One byte past the limit tells a source of exactly `limit`
            // bytes apart from a longer one.
            reader.take(limit.saturating_add(1)).read_to_end(&mut bytes)?;
            let eof = (bytes.len() as u64) <= limit;
            bytes.truncate(usize::try_from(limit).unwrap_or(usize::MAX).min(bytes.len()));
            Ok(RawContent { bytes, eof })
        }
        None => {
            let mut reader = reader;
            reader.read_to_end(&mut bytes)?;
            Ok(RawContent { bytes, eof: true })
        }
    }
}

/// Like [`read_bounded`], failing with [`TreecatError::ReadTimeout`] when
/// opening plus reading takes longer than `deadline`.
pub fn read_with_deadline(
    path: &Path,
    limit: Option<u64>,
    deadline: Option<Duration>,
) -> Result<RawContent, TreecatError> {
    let Some(deadline) = deadline else {
        return read_bounded(path, limit);
    };

    let (tx, rx) = crossbeam_channel::bounded(1);
    let owned: PathBuf = path.to_path_buf();
    let spawned = thread::Builder::new()
        .name("treecat-read".into())
        .spawn(move || {
            let _ = tx.send(read_bounded(&owned, limit));
        });
    if let Err(e) = spawned {
        tracing::debug!("could not spawn reader thread, reading without deadline: {e}");
        return read_bounded(path, limit);
    }

    match rx.recv_timeout(deadline) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            tracing::debug!("read of {} exceeded {:?}", path.display(), deadline);
            Err(TreecatError::ReadTimeout {
                path: path.to_path_buf(),
            })
        }
        Err(RecvTimeoutError::Disconnected) => Err(TreecatError::io(
            path,
            std::io::Error::other("reader thread exited without a result"),
        )),
    }
}
