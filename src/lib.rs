//! # histdb
//!
//! A persistent, multi-process command-history store for an interactive
//! shell enhancer, with:
//! - Append-only, line-oriented bank files guarded by whole-file locks
//! - Bounded-memory streaming iteration over records
//! - In-place tombstoning that preserves record identities across edits
//! - A reap protocol folding dead sessions' banks into a shared master
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     HistoryStore                             │
//! │        (add / find / remove / clear / read_lines)            │
//! └──────────────┬───────────────────────────┬──────────────────┘
//!                │                           │
//!         ┌──────▼──────┐             ┌──────▼──────┐
//!         │ master bank │             │ session bank│
//!         │  (shared)   │◄── reap ────│  (per-id)   │
//!         └──────┬──────┘             └──────┬──────┘
//!                │                           │
//!         ReadLock / WriteLock        ReadLock / WriteLock
//!                │                           │
//!           FileIter ──► LineIter ──► (LineId, record)
//! ```
//!
//! Each shell session runs its own store instance; the concurrency
//! surface is between processes, mediated entirely by the bank locks.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod bank;
pub mod context;
pub mod editor;
pub mod expand;
pub mod store;

mod line_id;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use bank::{MAX_BANK_SIZE, MAX_LINE_LENGTH};
pub use config::{Config, DupeMode, ExpandMode};
pub use context::SessionContext;
pub use editor::{InhibitExpansionFn, LineEditor};
pub use error::{HistoryError, Result};
pub use expand::{expansion_inhibited, ExpandResult};
pub use line_id::LineId;
pub use store::{HistoryIter, HistoryStore, BANK_MASTER, BANK_SESSION};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of histdb
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
