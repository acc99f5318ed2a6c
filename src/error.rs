//! Error types for histdb
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using HistoryError
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Unified error type for history store operations
#[derive(Debug, Error)]
pub enum HistoryError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Bank Errors
    // -------------------------------------------------------------------------
    #[error("bank full: {size} bytes exceeds the 512 MiB offset bound")]
    BankFull { size: u64 },
}
