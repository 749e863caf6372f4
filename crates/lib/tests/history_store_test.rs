//! # History Store Tests

use carebot::{constants::HISTORY_CAP, store::history::HistoryStore, types::HistoryRecord};
use chrono::{Duration, Local, TimeZone};
use std::thread;
use tempfile::tempdir;

fn read_file(path: &std::path::Path) -> Vec<HistoryRecord> {
    let raw = std::fs::read_to_string(path).expect("history file should exist");
    serde_json::from_str(&raw).expect("history file should parse")
}

#[test]
fn test_save_keeps_only_the_most_recent_records_in_order() {
    // --- 1. Arrange ---
    let dir = tempdir().unwrap();
    let path = dir.path().join("chat_history.json");
    let mut store = HistoryStore::new(&path);
    let start = Local::now();

    // --- 2. Act ---
    for i in 0..(HISTORY_CAP + 7) {
        store.append(
            &format!("question {i}"),
            &format!("answer {i}"),
            start + Duration::seconds(i as i64),
        );
    }
    store.save().unwrap();

    // --- 3. Assert ---
    let persisted = read_file(&path);
    assert_eq!(persisted.len(), HISTORY_CAP);
    assert_eq!(persisted[0].question(), "question 7");
    assert_eq!(persisted[HISTORY_CAP - 1].question(), "question 56");
    for pair in persisted.windows(2) {
        assert!(pair[0].timestamp() < pair[1].timestamp());
    }
    assert_eq!(store.len(), HISTORY_CAP);
    assert_eq!(store.records()[0].question(), "question 7");
}

#[test]
fn test_file_is_a_list_of_triples() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chat_history.json");
    let mut store = HistoryStore::new(&path);
    store.append("Where is the lab?", "Ground floor.", Local::now());
    store.save().unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let entry = &raw[0];
    assert_eq!(entry[0], "Where is the lab?");
    assert_eq!(entry[1], "Ground floor.");
    assert!(entry[2].is_string());
}

#[test]
fn test_load_round_trips_and_accepts_naive_timestamps() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chat_history.json");
    std::fs::write(
        &path,
        r#"[["Old question", "Old answer", "2024-05-01 14:30:00.123456"]]"#,
    )
    .unwrap();

    let store = HistoryStore::load(&path);

    assert_eq!(store.len(), 1);
    let record = &store.records()[0];
    assert_eq!(record.answer(), "Old answer");
    let expected = Local
        .with_ymd_and_hms(2024, 5, 1, 14, 30, 0)
        .earliest()
        .unwrap();
    assert_eq!(record.timestamp().timestamp(), expected.timestamp());
}

#[test]
fn test_load_corrupt_or_missing_file_is_empty() {
    let dir = tempdir().unwrap();
    let corrupt = dir.path().join("corrupt.json");
    std::fs::write(&corrupt, "{ not json").unwrap();

    assert!(HistoryStore::load(&corrupt).is_empty());
    assert!(HistoryStore::load(dir.path().join("missing.json")).is_empty());
}

#[test]
fn test_delete_removes_file_and_clears_memory() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chat_history.json");
    let mut store = HistoryStore::new(&path);
    store.append("q", "a", Local::now());
    store.save().unwrap();

    store.delete().unwrap();

    assert!(store.is_empty());
    assert!(!path.exists());
    // A second delete finds nothing to remove and still succeeds.
    store.delete().unwrap();
}

#[test]
fn test_recent_is_newest_first() {
    let mut store = HistoryStore::new("unused.json");
    let now = Local::now();
    for i in 0..5 {
        store.append(&format!("q{i}"), "a", now);
    }

    let recent: Vec<&str> = store.recent(3).map(|r| r.question()).collect();

    assert_eq!(recent, vec!["q4", "q3", "q2"]);
}

#[test]
fn test_concurrent_saves_always_publish_a_complete_file() {
    // --- 1. Arrange ---
    let dir = tempdir().unwrap();
    let path = dir.path().join("chat_history.json");
    let writers = 8;
    let saves_per_writer = 100;

    // --- 2. Act ---
    thread::scope(|scope| {
        for writer in 0..writers {
            let path = path.clone();
            scope.spawn(move || {
                let mut store = HistoryStore::new(&path);
                for i in 0..saves_per_writer {
                    store.append(
                        &format!("writer {writer} question {i}"),
                        &"a long answer ".repeat(20),
                        Local::now(),
                    );
                    store.save().expect("concurrent save should succeed");

                    let raw = std::fs::read_to_string(&path).expect("history file should exist");
                    let persisted: Vec<HistoryRecord> =
                        serde_json::from_str(&raw).expect("published file should parse");
                    assert!(!persisted.is_empty());
                }
            });
        }
    });

    // --- 3. Assert ---
    let persisted = read_file(&path);
    assert!(!persisted.is_empty());
    assert!(persisted.len() <= HISTORY_CAP);
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path() != path)
        .collect();
    assert!(leftovers.is_empty(), "temp files left behind: {leftovers:?}");
}
