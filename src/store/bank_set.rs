//! Fixed two-slot bank table
//!
//! Slot 0 is the master bank, slot 1 the per-session bank. Slots fill left
//! to right (master is always opened first), so the live banks are exactly
//! the first `count()` slots and the rightmost present slot is the write
//! bank: session when open, master otherwise.

use std::fs::File;

/// Index of the shared master bank
pub const BANK_MASTER: usize = 0;

/// Index of the per-session bank
pub const BANK_SESSION: usize = 1;

const BANK_COUNT: usize = 2;

pub(crate) struct BankSet {
    slots: [Option<File>; BANK_COUNT],
}

impl BankSet {
    pub fn new() -> Self {
        Self {
            slots: [None, None],
        }
    }

    /// Number of open banks
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Bank at `index`, bounded by `count()`
    ///
    /// Out-of-range indices (including stale ids pointing at a bank that
    /// is no longer present) resolve to `None`.
    pub fn get(&self, index: usize) -> Option<&File> {
        if index >= self.count() {
            return None;
        }
        self.slots[index].as_ref()
    }

    pub fn set(&mut self, index: usize, file: File) {
        self.slots[index] = Some(file);
    }

    pub fn master(&self) -> Option<&File> {
        self.slots[BANK_MASTER].as_ref()
    }

    /// The bank new lines are appended to: rightmost open slot
    pub fn write_bank(&self) -> Option<&File> {
        match self.count() {
            0 => None,
            n => self.get(n - 1),
        }
    }

    /// Close the session bank, leaving master in place for the final reap
    pub fn close_session(&mut self) {
        self.slots[BANK_SESSION] = None;
    }
}
