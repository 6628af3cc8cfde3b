//! Visited-destination persistence across store reopens.

use tempfile::TempDir;

use waygate::travel::{VisitedStore, VisitedStoreBuilder};

fn open_store(dir: &TempDir) -> VisitedStore {
    VisitedStoreBuilder::new(dir.path().join("visited"))
        .open()
        .expect("open store")
}

#[test]
fn visits_survive_a_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = open_store(&dir);
        assert!(store.record_visit("riverside").unwrap());
        assert!(store.record_visit("harbor").unwrap());
    }

    let store = open_store(&dir);
    let visited = store.load_visited_set().unwrap();
    assert_eq!(visited.len(), 2);
    assert!(visited.contains("riverside"));
    assert!(visited.contains("harbor"));
}

#[test]
fn recording_across_sessions_stays_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let first_record = {
        let store = open_store(&dir);
        store.record_visit("riverside").unwrap();
        store.get_visit("riverside").unwrap().unwrap()
    };

    let store = open_store(&dir);
    assert!(!store.record_visit("Riverside").unwrap());
    let second_record = store.get_visit("riverside").unwrap().unwrap();
    // Same record, same first-visit timestamp.
    assert_eq!(first_record, second_record);
}

#[test]
fn membership_only_grows() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    for id in ["a", "b", "c"] {
        store.record_visit(id).unwrap();
    }
    // Re-recording everything changes nothing.
    for id in ["a", "b", "c"] {
        assert!(!store.record_visit(id).unwrap());
    }
    assert_eq!(store.load_visited_set().unwrap().len(), 3);
}
