//! Scoped bank locks and the operations they gate
//!
//! A `ReadLock` blocks until it holds the whole-file shared lock; a
//! `WriteLock` does the same exclusively and derefs to `ReadLock` so reads
//! stay available under it. Both tolerate a null handle (they test as not
//! held and every operation is an empty no-op) so callers can treat absent
//! banks uniformly. Dropping a lock releases it on every exit path; the
//! locks are the only entry point for bank I/O.

use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::ops::Deref;

use fs2::FileExt;

use crate::error::{HistoryError, Result};
use crate::line_id::LineId;

use super::file_iter::FileIter;
use super::line_iter::LineIter;
use super::{MAX_BANK_SIZE, MAX_LINE_LENGTH, TOMBSTONE};

/// Shared whole-file lock over an optional bank handle
pub struct ReadLock<'a> {
    file: Option<&'a File>,
}

impl<'a> ReadLock<'a> {
    /// Block until the shared lock is granted
    pub fn new(file: Option<&'a File>) -> Self {
        Self::acquire(file, false)
    }

    fn acquire(file: Option<&'a File>, exclusive: bool) -> Self {
        let held = file.and_then(|f| {
            let granted = if exclusive {
                f.lock_exclusive()
            } else {
                f.lock_shared()
            };
            match granted {
                Ok(()) => Some(f),
                Err(e) => {
                    tracing::warn!(error = %e, "bank lock acquisition failed");
                    None
                }
            }
        });
        ReadLock { file: held }
    }

    /// Whether the lock was actually acquired
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    pub(crate) fn file(&self) -> Option<&'a File> {
        self.file
    }

    /// Stream the bank's live records through a window of `capacity` bytes
    pub fn lines(&self, capacity: usize) -> Result<LineIter<'_>> {
        LineIter::new(self.file, capacity)
    }

    /// Invoke `callback` with the id of every record byte-equal to `line`
    ///
    /// The callback returns true to keep searching. The file position is
    /// saved around each invocation so the callback may itself perform
    /// bank I/O (tombstoning, typically) without desynchronising the scan.
    pub fn find_each(&self, line: &[u8], mut callback: impl FnMut(LineId) -> bool) -> Result<()> {
        let Some(file) = self.file else {
            return Ok(());
        };

        let mut iter = self.lines(MAX_LINE_LENGTH)?;
        while let Some((id, range)) = iter.next()? {
            if &iter.buffer()[range] != line {
                continue;
            }

            let mut f = file;
            let saved = f.stream_position()?;
            let keep_going = callback(id);
            f.seek(SeekFrom::Start(saved))?;

            if !keep_going {
                break;
            }
        }
        Ok(())
    }

    /// First record byte-equal to `line`, or the null id
    pub fn find(&self, line: &[u8]) -> Result<LineId> {
        let mut found = LineId::NULL;
        self.find_each(line, |id| {
            found = id;
            false
        })?;
        Ok(found)
    }
}

impl Drop for ReadLock<'_> {
    fn drop(&mut self) {
        if let Some(file) = self.file {
            let _ = file.unlock();
        }
    }
}

/// Exclusive whole-file lock; adds the bank mutators
pub struct WriteLock<'a> {
    inner: ReadLock<'a>,
}

impl<'a> WriteLock<'a> {
    /// Block until the exclusive lock is granted
    pub fn new(file: Option<&'a File>) -> Self {
        WriteLock {
            inner: ReadLock::acquire(file, true),
        }
    }

    /// Truncate the bank to zero length
    pub fn clear(&self) -> Result<()> {
        let Some(file) = self.inner.file else {
            return Ok(());
        };
        let mut f = file;
        f.seek(SeekFrom::Start(0))?;
        file.set_len(0)?;
        Ok(())
    }

    /// Append one record: the line's bytes followed by `\n`
    ///
    /// The caller guarantees the line is non-empty and free of bytes
    /// ≤ 0x1F; violating that produces undefined framing.
    pub fn append(&self, line: &[u8]) -> Result<()> {
        let Some(file) = self.inner.file else {
            return Ok(());
        };
        let mut f = file;
        let end = f.seek(SeekFrom::End(0))?;

        let size = end + line.len() as u64 + 1;
        if size > MAX_BANK_SIZE {
            return Err(HistoryError::BankFull { size });
        }

        f.write_all(line)?;
        f.write_all(b"\n")?;
        Ok(())
    }

    /// Overwrite the first byte of the record at `id` with `|`
    ///
    /// Record length and all subsequent offsets are preserved, so every
    /// previously issued id stays valid.
    pub fn tombstone(&self, id: LineId) -> Result<()> {
        let Some(file) = self.inner.file else {
            return Ok(());
        };
        if id.is_null() {
            return Ok(());
        }
        let mut f = file;
        f.seek(SeekFrom::Start(id.offset()))?;
        f.write_all(&[TOMBSTONE])?;
        Ok(())
    }

    /// Copy every byte of `src` onto the end of this bank
    ///
    /// Tombstones and separators are copied as-is; the fold is a verbatim
    /// concatenation, not a rewrite.
    pub fn splice(&self, src: &ReadLock<'_>) -> Result<()> {
        let Some(file) = self.inner.file else {
            return Ok(());
        };

        let mut src_iter = FileIter::new(src.file(), MAX_LINE_LENGTH)?;

        let mut f = file;
        let end = f.seek(SeekFrom::End(0))?;
        let size = end + src_iter.remaining();
        if size > MAX_BANK_SIZE {
            return Err(HistoryError::BankFull { size });
        }

        loop {
            let n = src_iter.next(0)?;
            if n == 0 {
                break;
            }
            f.write_all(&src_iter.buffer()[..n])?;
        }
        Ok(())
    }
}

impl<'a> Deref for WriteLock<'a> {
    type Target = ReadLock<'a>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
