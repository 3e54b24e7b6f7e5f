//! SQLite backend for the Sprout blob store.
//!
//! One file, one table, one row per key. Both stores in `sprout-core` can
//! share a single [`SqliteBlobStore`] since each owns a distinct key.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteBlobStore;

#[cfg(test)]
mod tests;
