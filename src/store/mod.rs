//! Store Module
//!
//! The public history store: up to two banks (shared master plus an
//! optional per-session bank), a policy-applying façade over them, and the
//! reap protocol that folds dead sessions' banks back into master.
//!
//! ## Responsibilities
//! - Open banks at initialise, close them in reap-safe order at drop
//! - Apply the add policy: empty lines, leading whitespace, dupe modes
//! - Route writes to the rightmost open bank under an exclusive lock
//! - Present a unified ordered view across banks
//!
//! Internal bank operations return `Result`; the façade degrades their
//! failures to null ids and booleans so a read-only filesystem or a
//! missing bank never takes the host shell down with it.

mod bank_set;
mod iter;
mod marker;
mod reap;

pub use bank_set::{BANK_MASTER, BANK_SESSION};
pub use iter::HistoryIter;

use std::sync::Arc;

use crate::bank::{self, ReadLock, WriteLock, MAX_LINE_LENGTH};
use crate::config::{Config, DupeMode};
use crate::context::SessionContext;
use crate::editor::LineEditor;
use crate::expand::{expansion_inhibited, ExpandResult};
use crate::line_id::LineId;

use bank_set::BankSet;
use marker::AliveMarker;

/// Persistent, multi-process command-history store
pub struct HistoryStore {
    config: Config,
    ctx: SessionContext,
    banks: BankSet,
    alive: Option<AliveMarker>,
    hook_installed: bool,
}

impl HistoryStore {
    /// Build an uninitialised store; no files are touched until
    /// [`initialise`](Self::initialise)
    pub fn new(config: Config, ctx: SessionContext) -> Self {
        Self {
            config,
            ctx,
            banks: BankSet::new(),
            alive: None,
            hook_installed: false,
        }
    }

    /// Open the banks; idempotent
    ///
    /// Creates and locks this session's aliveness marker, opens the master
    /// bank, and, unless history is shared, opens the session bank and
    /// runs a reap pass. Returns false when master cannot be opened, in
    /// which case the store stays at zero banks and every operation is a
    /// defined no-op.
    pub fn initialise(&mut self) -> bool {
        if self.banks.master().is_some() {
            return true;
        }

        if self.alive.is_none() {
            self.alive = AliveMarker::create(&self.ctx.marker_path());
        }

        let Some(master) = bank::open(self.ctx.master_path()) else {
            tracing::warn!("master bank unavailable; history is disabled");
            return false;
        };
        self.banks.set(BANK_MASTER, master);

        if self.config.shared {
            return true;
        }

        if let Some(session) = bank::open(&self.ctx.session_path()) {
            self.banks.set(BANK_SESSION, session);
        }

        self.reap(); // collect banks orphaned by dead sessions

        true
    }

    /// Number of open banks
    pub fn bank_count(&self) -> usize {
        self.banks.count()
    }

    /// Record a line; returns whether it was recorded
    ///
    /// Empty lines are rejected, as are space/tab-prefixed lines when
    /// `ignore_space` is set. `DupeMode::Ignore` reports success without
    /// writing when the line exists anywhere; `DupeMode::ErasePrev`
    /// tombstones every prior copy across all banks first.
    pub fn add(&self, line: &str) -> bool {
        let bytes = line.as_bytes();
        if bytes.is_empty() {
            return false;
        }
        if self.config.ignore_space && (bytes[0] == b' ' || bytes[0] == b'\t') {
            return false;
        }

        match self.config.dupe_mode {
            DupeMode::Add => {}
            DupeMode::Ignore => {
                if !self.find(line).is_null() {
                    return true;
                }
            }
            DupeMode::ErasePrev => {
                self.remove_line(line);
            }
        }

        let lock = WriteLock::new(self.banks.write_bank());
        if !lock.is_held() {
            return false;
        }
        match lock.append(bytes) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "failed to append history line");
                false
            }
        }
    }

    /// First id whose record equals `line`, scanning banks in order
    ///
    /// The returned id carries the bank it was found in; the null id
    /// means the line is absent.
    pub fn find(&self, line: &str) -> LineId {
        let bytes = line.as_bytes();
        for index in 0..self.banks.count() {
            let lock = ReadLock::new(self.banks.get(index));
            if !lock.is_held() {
                continue;
            }
            match lock.find(bytes) {
                Ok(id) if !id.is_null() => return id.with_bank(index),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(bank = index, error = %e, "history search failed");
                }
            }
        }
        LineId::NULL
    }

    /// Tombstone every record equal to `line` across all banks
    ///
    /// Returns the number of tombstones written.
    pub fn remove_line(&self, line: &str) -> usize {
        let bytes = line.as_bytes();
        let mut count = 0;

        for index in 0..self.banks.count() {
            let lock = WriteLock::new(self.banks.get(index));
            if !lock.is_held() {
                continue;
            }
            let swept = lock.find_each(bytes, |id| {
                match lock.tombstone(id) {
                    Ok(()) => count += 1,
                    Err(e) => {
                        tracing::warn!(bank = index, error = %e, "tombstone failed");
                    }
                }
                true
            });
            if let Err(e) = swept {
                tracing::warn!(bank = index, error = %e, "history sweep failed");
            }
        }

        count
    }

    /// Tombstone the record named by `id`
    ///
    /// Stale ids pointing at an absent bank, and the null id, return false.
    pub fn remove(&self, id: LineId) -> bool {
        if id.is_null() {
            return false;
        }

        let lock = WriteLock::new(self.banks.get(id.bank_index()));
        if !lock.is_held() {
            return false;
        }
        match lock.tombstone(id) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(bank = id.bank_index(), error = %e, "tombstone failed");
                false
            }
        }
    }

    /// Truncate every bank
    pub fn clear(&self) {
        for index in 0..self.banks.count() {
            let lock = WriteLock::new(self.banks.get(index));
            if !lock.is_held() {
                continue;
            }
            if let Err(e) = lock.clear() {
                tracing::warn!(bank = index, error = %e, "failed to clear bank");
            }
        }
    }

    /// Stream every live record across all banks in order
    ///
    /// The iterator holds a shared lock on its current bank and releases
    /// it when advancing to the next. The default window comfortably holds
    /// the longest supported line.
    pub fn read_lines(&self) -> HistoryIter<'_> {
        self.read_lines_with_capacity(MAX_LINE_LENGTH + 1)
    }

    /// [`read_lines`](Self::read_lines) with an explicit scan-window size
    ///
    /// Records longer than the window are truncated to it.
    pub fn read_lines_with_capacity(&self, capacity: usize) -> HistoryIter<'_> {
        HistoryIter::new(&self.banks, capacity)
    }

    /// Replace the editor's history with the store's contents
    pub fn load_into_editor(&self, editor: &mut dyn LineEditor) {
        editor.clear_history();

        let mut iter = self.read_lines();
        while let Some((_, record)) = iter.next() {
            editor.add_history(&String::from_utf8_lossy(record));
        }
    }

    /// Run the editor's `!` history expansion over `line`
    pub fn expand(&self, line: &str, editor: &mut dyn LineEditor) -> (ExpandResult, Option<String>) {
        editor.using_history();
        editor.history_expand(line)
    }

    /// Install the expansion-inhibitor predicate into the editor, once
    ///
    /// The editor consults the predicate for each `!` it considers
    /// expanding; the predicate answers from this store's `expand_mode`.
    pub fn register_expansion_hook(&mut self, editor: &mut dyn LineEditor) {
        if self.hook_installed {
            return;
        }
        self.hook_installed = true;

        let mode = self.config.expand_mode;
        editor.set_inhibit_expansion(Arc::new(move |line, marker_pos| {
            expansion_inhibited(mode, line, marker_pos)
        }));
    }
}

impl Drop for HistoryStore {
    fn drop(&mut self) {
        // Release the marker first so this session's own bank reads as
        // orphaned, close everything but master, then let the final reap
        // fold whatever is left (our bank included) into master.
        self.alive = None;
        self.banks.close_session();
        self.reap();
    }
}
