//! Integration tests for histdb
//!
//! Note: focused tests live in dedicated modules:
//! - Bank framing, locks, iterators: tests/bank_tests.rs
//! - Store façade and policy: tests/store_tests.rs
//! - Marker + reap protocol: tests/reap_tests.rs
//! - Expansion hook + editor: tests/expand_tests.rs
//!
//! This file covers configuration defaults and scenarios that span
//! multiple sessions over one database.

use std::fs;

use histdb::{Config, DupeMode, ExpandMode, HistoryStore, SessionContext};
use tempfile::TempDir;

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_default() {
    let config = Config::default();

    assert!(!config.shared);
    assert!(config.ignore_space);
    assert_eq!(config.dupe_mode, DupeMode::ErasePrev);
    assert_eq!(config.expand_mode, ExpandMode::NotQuoted);
}

#[test]
fn test_config_builder() {
    let config = Config::builder()
        .shared(true)
        .ignore_space(false)
        .dupe_mode(DupeMode::Ignore)
        .expand_mode(ExpandMode::Off)
        .build();

    assert!(config.shared);
    assert!(!config.ignore_space);
    assert_eq!(config.dupe_mode, DupeMode::Ignore);
    assert_eq!(config.expand_mode, ExpandMode::Off);
}

// =============================================================================
// Multi-Session Scenarios
// =============================================================================

#[test]
fn test_shared_sessions_interleave_in_lock_order() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder().shared(true).dupe_mode(DupeMode::Add).build();

    let mut a = HistoryStore::new(config.clone(), SessionContext::new(temp.path().join("h"), 1));
    let mut b = HistoryStore::new(config, SessionContext::new(temp.path().join("h"), 2));
    assert!(a.initialise());
    assert!(b.initialise());

    assert!(a.add("a first"));
    assert!(b.add("b first"));
    assert!(a.add("a second"));
    assert!(b.add("b second"));

    assert_eq!(
        fs::read(temp.path().join("h")).unwrap(),
        b"a first\nb first\na second\nb second\n"
    );
}

#[test]
fn test_unshared_sessions_see_union_across_banks() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder().dupe_mode(DupeMode::Add).build();

    let mut seven = HistoryStore::new(
        config.clone(),
        SessionContext::new(temp.path().join("h"), 7),
    );
    let mut eight = HistoryStore::new(config, SessionContext::new(temp.path().join("h"), 8));
    assert!(seven.initialise());
    assert!(eight.initialise());

    assert!(seven.add("from seven"));
    assert!(eight.add("from eight"));

    // Each session sees master plus its own bank; the peer's unreaped
    // session bank is not part of its view.
    assert!(!seven.find("from seven").is_null());
    assert!(seven.find("from eight").is_null());
    assert!(!eight.find("from eight").is_null());
    assert!(eight.find("from seven").is_null());
}

#[test]
fn test_full_lifecycle_across_restarts() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("h");

    // First run records a few lines, erasing duplicates in place.
    {
        let config = Config::builder().dupe_mode(DupeMode::ErasePrev).build();
        let mut store = HistoryStore::new(config, SessionContext::new(&path, 7));
        assert!(store.initialise());

        assert!(store.add("cd /tmp"));
        assert!(store.add("ls"));
        assert!(store.add("cd /tmp"));
    }

    // The next session finds the folded history in master, order
    // preserved, with the erased duplicate gone.
    {
        let config = Config::builder().dupe_mode(DupeMode::ErasePrev).build();
        let mut store = HistoryStore::new(config, SessionContext::new(&path, 8));
        assert!(store.initialise());

        let mut iter = store.read_lines();
        let mut lines = Vec::new();
        while let Some((id, record)) = iter.next() {
            lines.push((String::from_utf8_lossy(record).into_owned(), id.bank_index()));
        }
        assert_eq!(
            lines,
            vec![("ls".to_string(), 0), ("cd /tmp".to_string(), 0)]
        );
    }

    // Master survives both sessions; nothing else does.
    assert!(path.exists());
    assert!(!temp.path().join("h_7").exists());
    assert!(!temp.path().join("h_8").exists());
    assert!(!temp.path().join("h_7~").exists());
    assert!(!temp.path().join("h_8~").exists());
}

#[test]
fn test_version_is_set() {
    assert!(!histdb::VERSION.is_empty());
}
