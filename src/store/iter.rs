//! Cross-bank streaming iterator
//!
//! Presents the union of all banks as one ordered sequence. The iterator
//! holds a shared lock on its current bank only; exhausting a bank drops
//! that lock and acquires the next bank's before continuing.

use crate::bank::{LineIter, ReadLock};
use crate::line_id::LineId;

use super::bank_set::BankSet;

/// Streaming `(LineId, record)` iterator over every bank in index order
///
/// Yielded ids carry the index of the bank they came from. Record slices
/// borrow the iterator's scan window and are valid until the next advance.
pub struct HistoryIter<'a> {
    banks: &'a BankSet,
    capacity: usize,

    /// Next bank index to open
    cursor: usize,

    /// Bank the current line iterator reads from
    current_bank: usize,

    lock: Option<ReadLock<'a>>,
    line_iter: Option<LineIter<'a>>,
}

impl<'a> HistoryIter<'a> {
    pub(crate) fn new(banks: &'a BankSet, capacity: usize) -> Self {
        let mut iter = Self {
            banks,
            capacity,
            cursor: 0,
            current_bank: 0,
            lock: None,
            line_iter: None,
        };
        iter.next_bank();
        iter
    }

    fn next_bank(&mut self) -> bool {
        // Release the previous bank before locking the next.
        self.line_iter = None;
        self.lock = None;

        while self.cursor < self.banks.count() {
            let index = self.cursor;
            self.cursor += 1;

            if let Some(file) = self.banks.get(index) {
                let lock = ReadLock::new(Some(file));
                match LineIter::new(lock.file(), self.capacity) {
                    Ok(line_iter) => {
                        self.current_bank = index;
                        self.line_iter = Some(line_iter);
                        self.lock = Some(lock);
                        return true;
                    }
                    Err(e) => {
                        tracing::warn!(bank = index, error = %e, "failed to start bank scan");
                    }
                }
            }
        }
        false
    }

    /// The next live record across all banks, or `None` at the end
    pub fn next(&mut self) -> Option<(LineId, &[u8])> {
        loop {
            let found = match self.line_iter.as_mut() {
                Some(iter) => match iter.next() {
                    Ok(found) => found,
                    Err(e) => {
                        tracing::warn!(bank = self.current_bank, error = %e, "bank scan failed");
                        None
                    }
                },
                None => None,
            };

            if let Some((id, range)) = found {
                let id = id.with_bank(self.current_bank);
                let iter = self.line_iter.as_ref()?;
                return Some((id, &iter.buffer()[range]));
            }

            if !self.next_bank() {
                return None;
            }
        }
    }
}
