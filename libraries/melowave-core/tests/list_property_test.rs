//! Property-based tests for the persisted recent/saved lists
//!
//! Uses proptest to verify the list invariants across random operation
//! sequences against the in-memory and file-backed stores.

use melowave_core::{JsonFileStore, KeyValueStore, ListKey, ListStore, MemoryStore, TrackDescriptor};
use proptest::prelude::*;
use std::collections::HashSet;

// ===== Helpers =====

fn track_from(source: u8) -> TrackDescriptor {
    TrackDescriptor::new(format!("https://cdn.example/{}.mp3", source))
        .with_title(format!("Song {}", source))
        .with_artist("Artist")
}

fn assert_unique<S: KeyValueStore>(store: &ListStore<S>, key: ListKey) -> Result<(), TestCaseError> {
    let list = store.list(key);
    let unique: HashSet<&str> = list.iter().map(|t| t.source.as_str()).collect();
    prop_assert_eq!(unique.len(), list.len(), "duplicate source in {} list", key);
    Ok(())
}

// ===== Property Tests =====

proptest! {
    /// Property: the saved list never holds a source twice, and an even
    /// number of toggles on one source restores its membership
    #[test]
    fn toggle_saved_keeps_sources_unique(
        ops in prop::collection::vec(0u8..8, 1..60),
        probe in 0u8..8,
        pairs in 0usize..4
    ) {
        let mut store = ListStore::new(MemoryStore::new());
        for op in ops {
            store.toggle_saved(&track_from(op)).unwrap();
            assert_unique(&store, ListKey::Saved)?;
        }

        let probe_track = track_from(probe);
        let before = store.is_saved(&probe_track.source);
        for _ in 0..pairs * 2 {
            store.toggle_saved(&probe_track).unwrap();
        }
        prop_assert_eq!(store.is_saved(&probe_track.source), before);
    }

    /// Property: recent never exceeds 20, the last recorded source is first,
    /// and re-recording never duplicates
    #[test]
    fn record_played_bounded_and_most_recent_first(
        ops in prop::collection::vec(any::<u8>(), 1..120)
    ) {
        let mut store = ListStore::new(MemoryStore::new());
        for op in ops {
            let track = track_from(op);
            store.record_played(&track).unwrap();

            let recent = store.list(ListKey::Recent);
            prop_assert!(recent.len() <= 20, "recent grew to {}", recent.len());
            prop_assert_eq!(&recent[0], &track);
            assert_unique(&store, ListKey::Recent)?;
        }
    }

    /// Property: recording never touches the saved list and vice versa
    #[test]
    fn lists_are_independent(
        played in prop::collection::vec(0u8..10, 0..20),
        saved in prop::collection::vec(10u8..20, 0..20)
    ) {
        let mut store = ListStore::new(MemoryStore::new());
        for p in &played {
            store.record_played(&track_from(*p)).unwrap();
        }
        let saved_before = store.list(ListKey::Saved);
        prop_assert!(saved_before.is_empty());

        for s in &saved {
            store.toggle_saved(&track_from(*s)).unwrap();
        }
        let recent = store.list(ListKey::Recent);
        prop_assert!(recent.iter().all(|t| !store.is_saved(&t.source)));
    }
}

// ===== File-backed persistence =====

#[test]
fn lists_survive_reopening_file_store() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut store = ListStore::new(JsonFileStore::new(dir.path()));
        store.record_played(&track_from(1)).unwrap();
        store.record_played(&track_from(2)).unwrap();
        store.toggle_saved(&track_from(7)).unwrap();
    }

    let reopened = ListStore::new(JsonFileStore::new(dir.path()));
    let recent: Vec<String> = reopened
        .list(ListKey::Recent)
        .into_iter()
        .map(|t| t.source)
        .collect();
    assert_eq!(
        recent,
        vec![
            "https://cdn.example/2.mp3".to_string(),
            "https://cdn.example/1.mp3".to_string()
        ]
    );
    assert!(reopened.is_saved("https://cdn.example/7.mp3"));
}

#[test]
fn corrupt_file_reads_as_empty_then_recovers() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("mw_recent_v1.json"), "not json at all").unwrap();

    let mut store = ListStore::new(JsonFileStore::new(dir.path()));
    assert!(store.list(ListKey::Recent).is_empty());

    store.record_played(&track_from(3)).unwrap();
    assert_eq!(store.list(ListKey::Recent).len(), 1);
}

#[test]
fn reads_records_written_by_older_sessions() {
    // Older sessions stored null for attributes the item did not carry
    let raw = r#"[{"src":"a.wav","title":"A","artist":null,"cover":null},{"src":"b.wav","title":"B","artist":"X","cover":"b.svg"}]"#;
    let store = ListStore::new(MemoryStore::new().with_entry("mw_saved_v1", raw));

    let saved = store.list(ListKey::Saved);
    assert_eq!(saved.len(), 2);
    assert!(saved[0].artist.is_empty());
    assert_eq!(saved[1].cover_locator, "b.svg");
}
