//! Reap protocol
//!
//! Discovers sibling session banks whose owners are gone and folds them
//! into the master bank. Runs when a store initialises its session bank
//! and again while the store drops, after everything but master has been
//! closed; the drop-side pass is what makes the protocol converge, since
//! the exiting session's own bank is folded by whichever store reaps last.

use std::fs::{self, File};
use std::path::Path;

use crate::bank::{self, ReadLock, WriteLock};
use crate::context::SessionContext;

use super::marker;
use super::HistoryStore;

impl HistoryStore {
    /// Fold every orphaned session bank into master
    ///
    /// Candidates are the `<history_path>_*` siblings, markers excluded.
    /// A peer whose marker is still locked is alive and left untouched. A
    /// crash between splice and unlink leaves duplicates in master; a
    /// crash before the splice leaves the candidate for a future pass.
    /// Neither loses records.
    pub(crate) fn reap(&self) {
        let Some(master) = self.banks.master() else {
            return;
        };

        let master_path = self.ctx.master_path();
        let Some(base) = master_path.file_name().and_then(|name| name.to_str()) else {
            return;
        };
        let prefix = format!("{}_", base);

        let dir = match master_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "reap: cannot scan history directory");
                return;
            }
        };

        for entry in entries.flatten() {
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !name.starts_with(&prefix) || name.ends_with('~') {
                continue;
            }

            let candidate = entry.path();
            let marker_path = SessionContext::marker_path_of(&candidate);
            if marker_path.exists() {
                if !marker::is_orphaned(&marker_path) {
                    tracing::debug!(peer = %candidate.display(), "reap: owner alive, skipping");
                    continue;
                }
                if fs::remove_file(&marker_path).is_err() {
                    continue;
                }
            }

            fold_into_master(master, &candidate);
        }
    }
}

/// Splice one orphaned bank onto master, then unlink it
///
/// The unlink happens only once the contents are safely in master (or
/// there were none), so a failed splice leaves the orphan for a later
/// pass instead of destroying it.
fn fold_into_master(master: &File, path: &Path) {
    let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    if size > 0 {
        let Some(src_file) = bank::open(path) else {
            return;
        };

        let src = ReadLock::new(Some(&src_file));
        let dest = WriteLock::new(Some(master));
        if !src.is_held() || !dest.is_held() {
            return;
        }

        if let Err(e) = dest.splice(&src) {
            tracing::warn!(peer = %path.display(), error = %e, "reap: splice failed, orphan kept");
            return;
        }
        tracing::debug!(peer = %path.display(), bytes = size, "reap: folded orphaned session bank");
    }

    let _ = fs::remove_file(path);
}
