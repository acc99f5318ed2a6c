//! Sliding-window byte reader
//!
//! Reads a locked bank front to back through a fixed-size buffer. The one
//! advance operation takes a `rollback` count: that many trailing bytes of
//! the current window are copied to the buffer front before the next read,
//! which is how the line iterator re-aligns a record that straddled a
//! window boundary.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};

use crate::error::Result;

/// Fixed-window streaming reader over one bank file
pub struct FileIter<'a> {
    file: Option<&'a File>,

    /// The window itself; capacity never changes after construction
    buf: Vec<u8>,

    /// Valid bytes currently in the window
    fill: usize,

    /// Absolute file offset of `buf[0]`
    offset: u64,

    /// Unread bytes left on disk
    remaining: u64,
}

impl<'a> FileIter<'a> {
    /// Start a scan at file offset 0 with a window of `capacity` bytes
    ///
    /// A `None` handle yields an immediately exhausted iterator.
    pub(crate) fn new(file: Option<&'a File>, capacity: usize) -> Result<Self> {
        debug_assert!(capacity > 0);

        let mut remaining = 0;
        if let Some(f) = file {
            remaining = f.metadata()?.len();
            let mut f = f;
            f.seek(SeekFrom::Start(0))?;
        }

        Ok(Self {
            file,
            buf: vec![0; capacity],
            fill: 0,
            offset: 0,
            remaining,
        })
    }

    /// Advance the window, preserving the last `rollback` bytes at the front
    ///
    /// Returns the new fill size, or 0 once the file is exhausted.
    pub fn next(&mut self, rollback: usize) -> Result<usize> {
        if self.remaining == 0 {
            self.fill = 0;
            return Ok(0);
        }

        let rollback = rollback.min(self.fill);
        let consumed = self.fill - rollback;
        self.buf.copy_within(consumed..self.fill, 0);
        self.offset += consumed as u64;

        let want = ((self.buf.len() - rollback) as u64).min(self.remaining) as usize;
        let mut read_total = 0;
        if let Some(file) = self.file {
            let mut f = file;
            while read_total < want {
                let n = f.read(&mut self.buf[rollback + read_total..rollback + want])?;
                if n == 0 {
                    break;
                }
                read_total += n;
            }
        }

        // A short read means the file shrank under us; treat it as EOF so
        // callers terminate rather than spinning on the missing tail.
        if read_total < want {
            self.remaining = 0;
        } else {
            self.remaining -= read_total as u64;
        }

        self.fill = rollback + read_total;
        Ok(self.fill)
    }

    /// The valid portion of the window
    pub fn buffer(&self) -> &[u8] {
        &self.buf[..self.fill]
    }

    /// Absolute file offset of the window's first byte
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Valid bytes currently in the window
    pub fn fill(&self) -> usize {
        self.fill
    }

    /// Unread bytes left on disk
    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}
