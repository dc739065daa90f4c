use std::fs;

use fieldops_client::{
    ensure_output_dir, write_atomic, FileSessionStore, PersistError, SessionStore, TOKEN_KEY,
};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("reports").join("2024");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("work_report.csv");

    write_atomic(&target, "a,b\n").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "a,b\n");

    write_atomic(&target, b"c,d\n").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "c,d\n");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn file_in_place_of_directory_is_rejected() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let err = write_atomic(&blocker.join("work_report.csv"), "data").unwrap_err();

    assert!(matches!(err, PersistError::NotADirectory(_)));
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}

#[test]
fn file_session_round_trips_and_clears_token() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("session.ron");
    let store = FileSessionStore::new(&path);

    assert_eq!(store.token(), None);

    store.set(TOKEN_KEY, "tok-42").unwrap();
    assert_eq!(FileSessionStore::new(&path).token(), Some("tok-42".to_string()));

    store.clear_token().unwrap();
    assert_eq!(store.token(), None);
    assert!(path.exists());
}

#[test]
fn blank_token_counts_as_signed_out() {
    let temp = TempDir::new().unwrap();
    let store = FileSessionStore::new(temp.path().join("session.ron"));

    store.set(TOKEN_KEY, "   ").unwrap();

    assert_eq!(store.get(TOKEN_KEY), Some("   ".to_string()));
    assert_eq!(store.token(), None);
}

#[test]
fn malformed_session_file_is_reported() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("session.ron");
    fs::write(&path, "not ron at all {").unwrap();
    let store = FileSessionStore::new(&path);

    assert_eq!(store.token(), None);
    assert!(store.set(TOKEN_KEY, "tok").is_err());
}
