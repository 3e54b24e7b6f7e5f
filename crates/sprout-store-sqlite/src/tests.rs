//! Tests for `SqliteBlobStore`, alone and underneath the core stores.

use std::sync::Arc;

use sprout_core::{
  BlobStore, FAVORITES_KEY, FavoriteTip, FavoritesStore, LoadOutcome, NewCompletion,
  PROGRESS_KEY, ProgressStore, Skill,
};

use crate::SqliteBlobStore;

fn store() -> SqliteBlobStore { SqliteBlobStore::open_in_memory().expect("in-memory store") }

fn completion(id: &str, at: &str) -> NewCompletion {
  NewCompletion::new(id, "tip", "Bubbles", 1).completed_at(at)
}

// ─── Raw blobs ───────────────────────────────────────────────────────────────

#[test]
fn get_missing_key_returns_none() {
  let s = store();
  assert!(s.get("nope").unwrap().is_none());
  assert!(s.updated_at("nope").unwrap().is_none());
}

#[test]
fn set_then_get() {
  let s = store();
  s.set("k", b"hello").unwrap();
  assert_eq!(s.get("k").unwrap().as_deref(), Some(&b"hello"[..]));
  assert!(s.updated_at("k").unwrap().is_some());
}

#[test]
fn set_replaces_previous_value() {
  let s = store();
  s.set("k", b"a much longer first value").unwrap();
  s.set("k", b"short").unwrap();
  assert_eq!(s.get("k").unwrap().as_deref(), Some(&b"short"[..]));
  assert_eq!(s.keys().unwrap(), ["k"]);
}

#[test]
fn keys_are_listed_in_order() {
  let s = store();
  s.set(PROGRESS_KEY, b"[]").unwrap();
  s.set(FAVORITES_KEY, b"{}").unwrap();
  assert_eq!(s.keys().unwrap(), [FAVORITES_KEY, PROGRESS_KEY]);
}

// ─── Under the stores ────────────────────────────────────────────────────────

#[test]
fn stores_share_one_connection() {
  let backend = Arc::new(store());
  let mut progress = ProgressStore::new(Arc::clone(&backend));
  let mut favorites = FavoritesStore::new(Arc::clone(&backend));

  progress.record(completion("a", "2024-01-01T00:00:00Z"));
  favorites.add(FavoriteTip::new("a", "tip", "Bubbles", 1));

  let (progress2, p_outcome) = ProgressStore::open(Arc::clone(&backend));
  let (favorites2, f_outcome) = FavoritesStore::open(backend);
  assert_eq!(p_outcome, LoadOutcome::Loaded(1));
  assert_eq!(f_outcome, LoadOutcome::Loaded(1));
  assert!(progress2.is_finished("a"));
  assert!(favorites2.is_favorite("a"));
}

#[test]
fn progress_survives_reopening_the_file() {
  let dir = tempfile::TempDir::new().unwrap();
  let path = dir.path().join("nested").join("sprout.db");

  let recorded = {
    let (mut progress, outcome) = ProgressStore::open(SqliteBlobStore::open(&path).unwrap());
    assert_eq!(outcome, LoadOutcome::Empty);
    progress.record(
      completion("a", "2024-01-01T00:00:00Z")
        .with_skills([Skill::new("motor"), Skill::new("speech")]),
    );
    progress.record(completion("b", "2024-02-01T00:00:00Z"));
    progress.completions().to_vec()
  };

  let (progress, outcome) = ProgressStore::open(SqliteBlobStore::open(&path).unwrap());
  assert_eq!(outcome, LoadOutcome::Loaded(2));
  assert_eq!(progress.completions(), recorded.as_slice());
  assert_eq!(progress.by_date()[0].0, "2024-02-01");
}

#[test]
fn clear_all_survives_reopening_the_file() {
  let dir = tempfile::TempDir::new().unwrap();
  let path = dir.path().join("sprout.db");

  {
    let mut progress = ProgressStore::new(SqliteBlobStore::open(&path).unwrap());
    progress.record(completion("a", "2024-01-01T00:00:00Z"));
    progress.clear_all();
  }

  let (progress, outcome) = ProgressStore::open(SqliteBlobStore::open(&path).unwrap());
  assert_eq!(outcome, LoadOutcome::Loaded(0));
  assert_eq!(progress.total(), 0);
}

#[test]
fn corrupt_blob_is_reported() {
  let backend = store();
  backend.set(FAVORITES_KEY, b"\xff\xfe").unwrap();

  let (favorites, outcome) = FavoritesStore::open(&backend);
  assert_eq!(outcome, LoadOutcome::Corrupt(vec![0xff, 0xfe]));
  assert_eq!(favorites.count(), 0);
}
