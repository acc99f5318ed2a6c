//! Tests for the aliveness marker and reap protocol
//!
//! These tests verify:
//! - Orphan discovery and folding into master
//! - Live peers (held markers) being left untouched
//! - Stale markers from crashed sessions reading as orphaned
//! - The drop-side reap folding the exiting session's own bank

use std::fs;
use std::path::Path;

use histdb::{Config, DupeMode, HistoryStore, SessionContext};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn store_at(dir: &Path, id: u32) -> HistoryStore {
    let config = Config::builder().dupe_mode(DupeMode::Add).build();
    let ctx = SessionContext::new(dir.join("h"), id);
    let mut store = HistoryStore::new(config, ctx);
    assert!(store.initialise());
    store
}

// =============================================================================
// Reap Tests
// =============================================================================

#[test]
fn test_reap_with_no_peers_is_noop() {
    let temp = TempDir::new().unwrap();
    let store = store_at(temp.path(), 7);

    assert_eq!(store.bank_count(), 2);
    assert_eq!(fs::read(temp.path().join("h")).unwrap(), b"");
}

#[test]
fn test_reap_folds_markerless_orphan() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("h_9"), b"orphan line\n").unwrap();

    let _store = store_at(temp.path(), 7);

    assert!(!temp.path().join("h_9").exists());
    assert_eq!(fs::read(temp.path().join("h")).unwrap(), b"orphan line\n");
}

#[test]
fn test_reap_folds_orphan_with_stale_marker() {
    let temp = TempDir::new().unwrap();
    // A crashed session leaves both its bank and its marker behind; the
    // marker's lock died with the process, so it reads as orphaned.
    fs::write(temp.path().join("h_9"), b"crashed\n").unwrap();
    fs::write(temp.path().join("h_9~"), b"").unwrap();

    let _store = store_at(temp.path(), 7);

    assert!(!temp.path().join("h_9").exists());
    assert!(!temp.path().join("h_9~").exists());
    assert_eq!(fs::read(temp.path().join("h")).unwrap(), b"crashed\n");
}

#[test]
fn test_reap_leaves_live_peer_untouched() {
    let temp = TempDir::new().unwrap();

    let alive = store_at(temp.path(), 8);
    assert!(alive.add("still running"));

    // A second session's initialise-time reap must skip the held peer.
    let _other = store_at(temp.path(), 9);

    assert!(temp.path().join("h_8").exists());
    assert!(temp.path().join("h_8~").exists());
    assert_eq!(fs::read(temp.path().join("h")).unwrap(), b"");
    assert!(!alive.find("still running").is_null());
}

#[test]
fn test_reap_preserves_tombstones_in_fold() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("h_9"), b"|ead\nlive\n").unwrap();

    let store = store_at(temp.path(), 7);

    // The fold is a verbatim splice; tombstones travel with it and stay
    // invisible to readers.
    assert_eq!(fs::read(temp.path().join("h")).unwrap(), b"|ead\nlive\n");
    assert!(store.find("dead").is_null());
    assert!(!store.find("live").is_null());
}

#[test]
fn test_reap_unlinks_empty_orphan_without_splicing() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("h_9"), b"").unwrap();

    let _store = store_at(temp.path(), 7);

    assert!(!temp.path().join("h_9").exists());
    assert_eq!(fs::read(temp.path().join("h")).unwrap(), b"");
}

// =============================================================================
// Drop-Side Reap Tests
// =============================================================================

#[test]
fn test_drop_folds_own_session_bank() {
    let temp = TempDir::new().unwrap();

    {
        let store = store_at(temp.path(), 7);
        assert!(store.add("ls"));
        assert_eq!(fs::read(temp.path().join("h")).unwrap(), b"");
    }

    // Exit releases the marker first, so the final reap folds our own
    // session bank into master and removes both files.
    assert!(!temp.path().join("h_7").exists());
    assert!(!temp.path().join("h_7~").exists());
    assert_eq!(fs::read(temp.path().join("h")).unwrap(), b"ls\n");
}

#[test]
fn test_last_exiting_session_collects_stragglers() {
    let temp = TempDir::new().unwrap();
    let seven = store_at(temp.path(), 7);
    let eight = store_at(temp.path(), 8);

    assert!(seven.add("from seven"));
    assert!(eight.add("from eight"));

    drop(seven);
    drop(eight);

    let master = fs::read_to_string(temp.path().join("h")).unwrap();
    assert!(master.contains("from seven"));
    assert!(master.contains("from eight"));
    assert!(!temp.path().join("h_7").exists());
    assert!(!temp.path().join("h_8").exists());
}

#[test]
fn test_fold_becomes_visible_to_surviving_session() {
    let temp = TempDir::new().unwrap();
    let seven = store_at(temp.path(), 7);
    let eight = store_at(temp.path(), 8);

    assert!(eight.add("handed over"));
    assert!(seven.find("handed over").is_null());

    drop(eight);

    // Eight's bank was folded into master, which seven reads directly.
    let found = seven.find("handed over");
    assert!(!found.is_null());
    assert_eq!(found.bank_index(), 0);
}
