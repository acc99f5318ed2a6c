//! Session aliveness marker
//!
//! Each live session owns a zero-byte sibling file `<history_path>_<id>~`
//! and holds an exclusive lock on it for as long as the session runs. A
//! peer probes aliveness with a non-blocking lock attempt: denial means
//! the owner is alive, success means the marker is an orphan. If the owner
//! crashes the OS drops the lock with the process, so a stale marker file
//! reads as orphaned on the next reap pass.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

/// The marker file plus its held lock; dropping it unlinks the marker
pub(crate) struct AliveMarker {
    file: Option<File>,
    path: PathBuf,
}

impl AliveMarker {
    /// Create (or adopt) the marker at `path` and lock it for this session
    pub fn create(path: &Path) -> Option<AliveMarker> {
        let file = match OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)
        {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to create aliveness marker");
                return None;
            }
        };

        if let Err(e) = file.try_lock_exclusive() {
            tracing::warn!(path = %path.display(), error = %e, "aliveness marker is held by another session");
            return None;
        }

        Some(AliveMarker {
            file: Some(file),
            path: path.to_path_buf(),
        })
    }
}

impl Drop for AliveMarker {
    fn drop(&mut self) {
        // Close before unlinking; Windows cannot delete an open file.
        if let Some(file) = self.file.take() {
            let _ = file.unlock();
            drop(file);
        }
        let _ = fs::remove_file(&self.path);
    }
}

/// Probe whether the session owning `marker_path` is gone
///
/// True only when the marker's lock could be taken, i.e. no live session
/// holds it. A marker that cannot be opened is treated as alive so a
/// transient error never reaps a running peer.
pub(crate) fn is_orphaned(marker_path: &Path) -> bool {
    let file = match OpenOptions::new().read(true).write(true).open(marker_path) {
        Ok(file) => file,
        Err(_) => return false,
    };

    match file.try_lock_exclusive() {
        Ok(()) => {
            let _ = file.unlock();
            true
        }
        Err(_) => false,
    }
}
