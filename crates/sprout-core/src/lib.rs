//! Core types and stores for the Sprout activity tracker.
//!
//! Two independent stores live here: [`ProgressStore`], the log of completed
//! activity tips, and [`FavoritesStore`], the set of favorited tips. Both sit
//! on top of the [`BlobStore`] contract and are free of any concrete storage
//! dependency; durable backends live in their own crates.

pub mod blob;
pub mod error;
pub mod favorites;
pub mod id;
pub mod load;
pub mod progress;
pub mod record;

pub use blob::{BlobStore, FAVORITES_KEY, MemoryBlobStore, PROGRESS_KEY};
pub use error::{Error, Result};
pub use favorites::FavoritesStore;
pub use id::RecordId;
pub use load::LoadOutcome;
pub use progress::ProgressStore;
pub use record::{Completion, FavoriteTip, NewCompletion, Skill};
