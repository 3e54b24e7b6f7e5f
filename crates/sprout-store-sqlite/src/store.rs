//! [`SqliteBlobStore`], the SQLite implementation of [`BlobStore`].

use std::{
  path::Path,
  sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension as _};
use sprout_core::BlobStore;

use crate::{
  Error, Result,
  encode::{decode_dt, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A blob store backed by a single SQLite file.
///
/// The connection sits behind a mutex so the store is `Send + Sync` and can
/// be shared between the progress and favorites stores through an `Arc`.
pub struct SqliteBlobStore {
  conn: Mutex<Connection>,
}

impl SqliteBlobStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(path)?;
    tracing::debug!(path = %path.display(), "opened sqlite blob store");
    Self::init(conn)
  }

  /// Open an in-memory store, useful for testing.
  pub fn open_in_memory() -> Result<Self> { Self::init(Connection::open_in_memory()?) }

  fn init(conn: Connection) -> Result<Self> {
    conn.execute_batch(SCHEMA)?;
    Ok(Self { conn: Mutex::new(conn) })
  }

  fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
    self.conn.lock().map_err(|_| Error::Poisoned)
  }

  /// When the blob at `key` was last written, if ever.
  pub fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = self
      .conn()?
      .query_row(
        "SELECT updated_at FROM blobs WHERE key = ?1",
        rusqlite::params![key],
        |row| row.get(0),
      )
      .optional()?;

    raw.as_deref().map(decode_dt).transpose()
  }

  /// All keys currently holding a blob, in key order.
  pub fn keys(&self) -> Result<Vec<String>> {
    let conn = self.conn()?;
    let mut stmt = conn.prepare("SELECT key FROM blobs ORDER BY key")?;
    let keys = stmt
      .query_map([], |row| row.get(0))?
      .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(keys)
  }
}

// ─── BlobStore impl ──────────────────────────────────────────────────────────

impl BlobStore for SqliteBlobStore {
  type Error = Error;

  fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
    let value: Option<Vec<u8>> = self
      .conn()?
      .query_row(
        "SELECT value FROM blobs WHERE key = ?1",
        rusqlite::params![key],
        |row| row.get(0),
      )
      .optional()?;
    Ok(value)
  }

  /// A single upsert statement, so the previous blob is either fully
  /// replaced or left as it was.
  fn set(&self, key: &str, value: &[u8]) -> Result<()> {
    let updated_at = encode_dt(Utc::now());
    self.conn()?.execute(
      "INSERT INTO blobs (key, value, updated_at) VALUES (?1, ?2, ?3)
       ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
      rusqlite::params![key, value, updated_at],
    )?;
    Ok(())
  }
}
