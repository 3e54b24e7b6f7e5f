//! Load outcomes and the read/write helpers shared by both stores.
//!
//! A load never fails from the caller's point of view. Missing, corrupt or
//! unreadable data all leave the in-memory state as it was; the
//! [`LoadOutcome`] tells the caller which of those happened.

use serde::{Serialize, de::DeserializeOwned};

use crate::{BlobStore, Error, Result};

/// What a call to `load()` found at the store's key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
  /// The blob decoded; in-memory state now holds this many records.
  Loaded(usize),
  /// Nothing has been saved under the key yet.
  Empty,
  /// A blob exists but could not be decoded. The raw bytes are returned
  /// untouched so they can be inspected or backed up.
  Corrupt(Vec<u8>),
  /// The backend itself failed to read.
  Unavailable(String),
}

impl LoadOutcome {
  pub fn is_loaded(&self) -> bool { matches!(self, Self::Loaded(_)) }
}

/// Read and decode the blob at `key`.
///
/// `Err` carries every outcome other than [`LoadOutcome::Loaded`], already
/// logged; the caller keeps its current state in that case.
pub(crate) fn read_blob<B, T>(backend: &B, key: &str) -> Result<T, LoadOutcome>
where
  B: BlobStore,
  T: DeserializeOwned,
{
  let raw = match backend.get(key) {
    Ok(Some(raw)) => raw,
    Ok(None) => {
      tracing::debug!(key, "no saved data");
      return Err(LoadOutcome::Empty);
    }
    Err(e) => {
      tracing::warn!(key, error = %e, "failed to read saved data; keeping current state");
      return Err(LoadOutcome::Unavailable(e.to_string()));
    }
  };

  match serde_json::from_slice(&raw) {
    Ok(value) => Ok(value),
    Err(e) => {
      tracing::warn!(
        key,
        error = %e,
        bytes = raw.len(),
        "saved data is corrupt; keeping current state"
      );
      Err(LoadOutcome::Corrupt(raw))
    }
  }
}

/// Serialise `value` in full and write it at `key`.
pub(crate) fn write_blob<B, T>(backend: &B, key: &str, value: &T) -> Result<()>
where
  B: BlobStore,
  T: Serialize + ?Sized,
{
  let bytes = serde_json::to_vec(value)?;
  backend.set(key, &bytes).map_err(Error::backend)?;
  tracing::debug!(key, bytes = bytes.len(), "saved");
  Ok(())
}
