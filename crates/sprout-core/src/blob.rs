//! The [`BlobStore`] trait and an in-memory implementation.
//!
//! A blob store is a synchronous get/set-by-key byte store with no
//! transactional guarantees across keys. Durable implementations live in
//! backend crates (e.g. `sprout-store-sqlite`); the stores in this crate
//! depend only on this abstraction.

use std::{
  collections::HashMap,
  rc::Rc,
  sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicBool, Ordering},
  },
};

use thiserror::Error;

/// Key under which [`crate::ProgressStore`] persists its completions.
pub const PROGRESS_KEY: &str = "bb:progress.v1";

/// Key under which [`crate::FavoritesStore`] persists its favorites.
pub const FAVORITES_KEY: &str = "bb:favorites.v1";

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a key-value blob backend.
///
/// `set` replaces the whole value at `key`. Implementations must make a
/// single `set` all-or-nothing; nothing is promised across keys.
pub trait BlobStore {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the blob at `key`. Returns `None` if nothing was ever written.
  fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error>;

  /// Write `value` at `key`, replacing any previous blob.
  fn set(&self, key: &str, value: &[u8]) -> Result<(), Self::Error>;
}

impl<T: BlobStore + ?Sized> BlobStore for &T {
  type Error = T::Error;

  fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> { (**self).get(key) }

  fn set(&self, key: &str, value: &[u8]) -> Result<(), Self::Error> {
    (**self).set(key, value)
  }
}

impl<T: BlobStore + ?Sized> BlobStore for Arc<T> {
  type Error = T::Error;

  fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> { (**self).get(key) }

  fn set(&self, key: &str, value: &[u8]) -> Result<(), Self::Error> {
    (**self).set(key, value)
  }
}

impl<T: BlobStore + ?Sized> BlobStore for Rc<T> {
  type Error = T::Error;

  fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> { (**self).get(key) }

  fn set(&self, key: &str, value: &[u8]) -> Result<(), Self::Error> {
    (**self).set(key, value)
  }
}

// ─── In-memory backend ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MemoryError {
  #[error("write rejected for key {0:?}")]
  WriteRejected(String),

  #[error("memory store lock poisoned")]
  Poisoned,
}

/// A [`BlobStore`] held entirely in process memory, for tests and for
/// sessions that should leave nothing behind.
///
/// Writes can be switched off with [`MemoryBlobStore::fail_writes`] to
/// simulate a full or read-only medium.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
  blobs:       Mutex<HashMap<String, Vec<u8>>>,
  fail_writes: AtomicBool,
}

impl MemoryBlobStore {
  pub fn new() -> Self { Self::default() }

  /// Put raw bytes at `key`, bypassing any write failure switch.
  pub fn insert_raw(&self, key: &str, value: impl Into<Vec<u8>>) {
    let mut blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
    blobs.insert(key.to_owned(), value.into());
  }

  /// Make every subsequent `set` fail (or succeed again).
  pub fn fail_writes(&self, fail: bool) { self.fail_writes.store(fail, Ordering::SeqCst); }

  pub fn len(&self) -> usize { self.blobs.lock().unwrap_or_else(PoisonError::into_inner).len() }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl BlobStore for MemoryBlobStore {
  type Error = MemoryError;

  fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
    let blobs = self.blobs.lock().map_err(|_| MemoryError::Poisoned)?;
    Ok(blobs.get(key).cloned())
  }

  fn set(&self, key: &str, value: &[u8]) -> Result<(), Self::Error> {
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(MemoryError::WriteRejected(key.to_owned()));
    }
    let mut blobs = self.blobs.lock().map_err(|_| MemoryError::Poisoned)?;
    blobs.insert(key.to_owned(), value.to_vec());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::panic::{AssertUnwindSafe, catch_unwind};

  use super::*;

  #[test]
  fn insert_raw_survives_a_poisoned_lock() {
    let store = MemoryBlobStore::new();
    let _ = catch_unwind(AssertUnwindSafe(|| {
      let _guard = store.blobs.lock().unwrap();
      panic!("poison the lock");
    }));
    assert!(store.blobs.is_poisoned());

    store.insert_raw("k", "v");
    let blobs = store.blobs.lock().unwrap_or_else(PoisonError::into_inner);
    assert_eq!(blobs.get("k").map(Vec::as_slice), Some(&b"v"[..]));
  }
}
