//! [`FavoritesStore`]: the set of favorited tips, keyed by tip id.

use std::collections::BTreeMap;

use crate::{
  BlobStore, FAVORITES_KEY, FavoriteTip, LoadOutcome, RecordId,
  load::{read_blob, write_blob},
};

/// Favorited tips for one user. Holds exactly one entry per tip id.
///
/// Entries are kept in tip-id order, which is also the order they are
/// listed and persisted in.
pub struct FavoritesStore<B> {
  backend:          B,
  items:            BTreeMap<RecordId, FavoriteTip>,
  last_save_failed: bool,
}

impl<B: BlobStore> FavoritesStore<B> {
  /// An empty store that has not read from `backend` yet.
  pub fn new(backend: B) -> Self {
    Self { backend, items: BTreeMap::new(), last_save_failed: false }
  }

  /// Construct a store and load whatever `backend` holds.
  pub fn open(backend: B) -> (Self, LoadOutcome) {
    let mut store = Self::new(backend);
    let outcome = store.load();
    (store, outcome)
  }

  /// Insert `tip`, replacing any entry with the same tip id in full.
  pub fn add(&mut self, tip: FavoriteTip) {
    self.items.insert(tip.tip_id.clone(), tip);
    self.save();
  }

  /// Remove the entry for `id`. Absent ids are not an error.
  pub fn remove(&mut self, id: impl Into<RecordId>) {
    let id = id.into();
    if self.items.remove(&id).is_none() {
      tracing::debug!(%id, "not a favorite");
    }
    self.save();
  }

  /// Flip membership of `tip`. Returns `true` if it is now a favorite.
  pub fn toggle(&mut self, tip: FavoriteTip) -> bool {
    if self.is_favorite(&tip.tip_id) {
      self.remove(tip.tip_id);
      false
    } else {
      self.add(tip);
      true
    }
  }

  /// Replace in-memory state with the persisted mapping.
  ///
  /// Missing, corrupt or unreadable data leaves the current state untouched.
  pub fn load(&mut self) -> LoadOutcome {
    match read_blob::<_, BTreeMap<RecordId, FavoriteTip>>(&self.backend, FAVORITES_KEY) {
      Ok(items) => {
        let n = items.len();
        self.items = items;
        tracing::debug!(favorites = n, "favorites loaded");
        LoadOutcome::Loaded(n)
      }
      Err(outcome) => outcome,
    }
  }

  fn save(&mut self) {
    match write_blob(&self.backend, FAVORITES_KEY, &self.items) {
      Ok(()) => self.last_save_failed = false,
      Err(e) => {
        tracing::warn!(key = FAVORITES_KEY, error = %e, "failed to save favorites");
        self.last_save_failed = true;
      }
    }
  }

  pub fn is_favorite(&self, id: impl Into<RecordId>) -> bool {
    self.items.contains_key(&id.into())
  }

  pub fn get(&self, id: impl Into<RecordId>) -> Option<&FavoriteTip> {
    self.items.get(&id.into())
  }

  /// All favorites, ordered by tip id.
  pub fn list(&self) -> Vec<&FavoriteTip> { self.items.values().collect() }

  pub fn count(&self) -> usize { self.items.len() }

  /// Whether the most recent write to the backend failed.
  pub fn last_save_failed(&self) -> bool { self.last_save_failed }

  pub fn backend(&self) -> &B { &self.backend }
}
