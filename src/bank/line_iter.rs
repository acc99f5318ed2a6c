//! Record framing parser
//!
//! Converts the raw byte stream of a bank into `(LineId, record)` pairs:
//! skips separator runs (bytes ≤ 0x1F), re-aligns records that straddle a
//! window boundary by rolling the window back, and filters tombstones.

use std::fs::File;
use std::ops::Range;

use crate::error::Result;
use crate::line_id::LineId;

use super::file_iter::FileIter;
use super::{SEPARATOR_MAX, TOMBSTONE};

/// Streaming record iterator over one bank file
///
/// `next` yields the id and window-relative range of each live record;
/// `next_record` is the borrowing convenience that resolves the range
/// against the window. Ids carry the record's absolute byte offset; the
/// bank index is stamped in by callers that know which bank this is.
pub struct LineIter<'a> {
    file_iter: FileIter<'a>,

    /// Unconsumed bytes at the tail of the current window
    pending: usize,
}

impl<'a> LineIter<'a> {
    pub(crate) fn new(file: Option<&'a File>, capacity: usize) -> Result<Self> {
        Ok(Self {
            file_iter: FileIter::new(file, capacity)?,
            pending: 0,
        })
    }

    fn provision(&mut self) -> Result<bool> {
        self.pending = self.file_iter.next(self.pending)?;
        Ok(self.pending > 0)
    }

    /// Yield the next live record as `(id, range into buffer())`
    ///
    /// A record that reaches the window end without having started at
    /// window offset 0 may be truncated mid-record, so the window is
    /// refetched with a rollback of the partial length and parsing
    /// restarts from the record start. A record that fills the window from
    /// offset 0 is returned truncated to the window size; callers size the
    /// window beyond the longest supported line.
    pub fn next(&mut self) -> Result<Option<(LineId, Range<usize>)>> {
        loop {
            if self.pending == 0 && !self.provision()? {
                return Ok(None);
            }

            let fill = self.file_iter.fill();
            let mut start = fill - self.pending;

            // Skip separator run.
            {
                let buf = self.file_iter.buffer();
                while start < fill && buf[start] <= SEPARATOR_MAX {
                    start += 1;
                    self.pending -= 1;
                }
            }
            if start == fill {
                continue;
            }

            let mut end = start;
            {
                let buf = self.file_iter.buffer();
                while end < fill && buf[end] > SEPARATOR_MAX {
                    end += 1;
                }
            }

            if end == fill && start != 0 {
                // Possibly a straddling record; re-align it to the window
                // start and retry. At EOF this drains `pending` instead.
                self.provision()?;
                continue;
            }

            let bytes = end - start;
            self.pending -= bytes;

            if self.file_iter.buffer()[start] == TOMBSTONE {
                continue;
            }

            let id = LineId::at_offset(self.file_iter.offset() + start as u64);
            return Ok(Some((id, start..end)));
        }
    }

    /// Yield the next live record, resolved against the window
    pub fn next_record(&mut self) -> Result<Option<(LineId, &[u8])>> {
        match self.next()? {
            Some((id, range)) => Ok(Some((id, &self.file_iter.buffer()[range]))),
            None => Ok(None),
        }
    }

    /// The current window contents that yielded ranges index into
    pub fn buffer(&self) -> &[u8] {
        self.file_iter.buffer()
    }
}
