//! Bank Module
//!
//! A bank is one flat history file: records of bytes > 0x1F, each terminated
//! by `\n`, with tombstoned records carrying `|` as their first byte. Banks
//! are shared between processes and guarded by whole-file locks.
//!
//! ## Responsibilities
//! - Open bank files read+write, creating them when absent
//! - Scoped shared/exclusive whole-file locks
//! - Bounded-memory streaming iteration over records
//! - Append, tombstone-in-place, truncate, and bank-to-bank splice
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────┐
//! │ echo one\n                   │   record
//! ├──────────────────────────────┤
//! │ |cho two\n                   │   tombstoned record (skipped by readers)
//! ├──────────────────────────────┤
//! │ echo three\n                 │   record
//! └──────────────────────────────┘
//! ```

mod file_iter;
mod line_iter;
mod lock;

pub use file_iter::FileIter;
pub use line_iter::LineIter;
pub use lock::{ReadLock, WriteLock};

use std::fs::{File, OpenOptions};
use std::path::Path;

/// Largest supported line length; scan buffers are sized past this
pub const MAX_LINE_LENGTH: usize = 8192;

/// Banks are bounded to 512 MiB so record offsets fit in 29 bits
pub const MAX_BANK_SIZE: u64 = 1 << 29;

/// First byte of a record that has been deleted in place
pub const TOMBSTONE: u8 = b'|';

/// Highest byte value treated as a record separator
pub(crate) const SEPARATOR_MAX: u8 = 0x1f;

/// Open a bank file for shared read+write access, creating it if absent
///
/// Failure is soft: the caller continues with the remaining banks, so this
/// logs and returns `None` rather than propagating.
pub fn open(path: &Path) -> Option<File> {
    match OpenOptions::new().read(true).write(true).create(true).open(path) {
        Ok(file) => Some(file),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to open bank file");
            None
        }
    }
}
