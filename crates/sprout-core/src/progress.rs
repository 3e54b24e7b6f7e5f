//! [`ProgressStore`]: the log of completed activity tips.
//!
//! Completions are only ever appended or cleared all at once. Every mutation
//! writes the full log back to the blob store under [`PROGRESS_KEY`]. Write
//! failures are logged and otherwise ignored: the in-memory log stays
//! authoritative for the session.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::{
  BlobStore, Completion, LoadOutcome, NewCompletion, PROGRESS_KEY, RecordId,
  load::{read_blob, write_blob},
};

/// The completion log for one user, owned by whoever constructed it.
pub struct ProgressStore<B> {
  backend:          B,
  completions:      Vec<Completion>,
  last_save_failed: bool,
}

impl<B: BlobStore> ProgressStore<B> {
  /// An empty store that has not read from `backend` yet.
  pub fn new(backend: B) -> Self {
    Self { backend, completions: Vec::new(), last_save_failed: false }
  }

  /// Construct a store and load whatever `backend` holds.
  pub fn open(backend: B) -> (Self, LoadOutcome) {
    let mut store = Self::new(backend);
    let outcome = store.load();
    (store, outcome)
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Append a completion without checking for an existing one with the same
  /// id. Stamps the current time if `payload` carries none.
  pub fn record(&mut self, payload: NewCompletion) -> &Completion {
    let index = self.completions.len();
    self.completions.push(payload.into_completion());
    self.save();
    &self.completions[index]
  }

  /// Append a completion only if none with the same id exists yet.
  ///
  /// Returns `false`, and changes nothing, when the tip is already done.
  pub fn record_once(&mut self, payload: NewCompletion) -> bool {
    if self.is_finished(&payload.id) {
      tracing::debug!(id = %payload.id, "already recorded");
      return false;
    }
    self.record(payload);
    true
  }

  /// Drop every completion.
  pub fn clear_all(&mut self) {
    self.completions.clear();
    self.save();
  }

  /// Keep the first completion for each id and drop later repeats.
  ///
  /// Persists only if something was removed. Returns the number removed.
  pub fn dedupe(&mut self) -> usize {
    let before = self.completions.len();
    let mut seen = HashSet::new();
    self.completions.retain(|c| seen.insert(c.id.clone()));

    let removed = before - self.completions.len();
    if removed > 0 {
      tracing::info!(removed, "dropped duplicate completions");
      self.save();
    }
    removed
  }

  // ── Load ──────────────────────────────────────────────────────────────────

  /// Replace in-memory state with the persisted log.
  ///
  /// Missing, corrupt or unreadable data leaves the current state untouched.
  pub fn load(&mut self) -> LoadOutcome {
    match read_blob::<_, Vec<Completion>>(&self.backend, PROGRESS_KEY) {
      Ok(completions) => {
        let n = completions.len();
        self.completions = completions;
        tracing::debug!(completions = n, "progress loaded");
        LoadOutcome::Loaded(n)
      }
      Err(outcome) => outcome,
    }
  }

  fn save(&mut self) {
    match write_blob(&self.backend, PROGRESS_KEY, &self.completions) {
      Ok(()) => self.last_save_failed = false,
      Err(e) => {
        tracing::warn!(key = PROGRESS_KEY, error = %e, "failed to save progress");
        self.last_save_failed = true;
      }
    }
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// All completions in the order they were recorded.
  pub fn completions(&self) -> &[Completion] { &self.completions }

  pub fn total(&self) -> usize { self.completions.len() }

  /// Number of completions exercising each skill code.
  ///
  /// A completion counts at most once per code, however often it lists it.
  /// Codes are trimmed and blank codes are ignored.
  pub fn skills_count(&self) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for completion in &self.completions {
      let mut seen = HashSet::new();
      for code in completion.skills.iter().filter_map(|s| s.normalized_code()) {
        if seen.insert(code) {
          *counts.entry(code.to_owned()).or_insert(0) += 1;
        }
      }
    }
    counts
  }

  /// Completions grouped by calendar date, most recent date first.
  ///
  /// Within a date, completions keep their recorded order.
  pub fn by_date(&self) -> Vec<(String, Vec<&Completion>)> {
    let mut buckets: BTreeMap<&str, Vec<&Completion>> = BTreeMap::new();
    for completion in &self.completions {
      buckets.entry(completion.date()).or_default().push(completion);
    }
    buckets
      .into_iter()
      .rev()
      .map(|(date, completions)| (date.to_owned(), completions))
      .collect()
  }

  /// Whether any completion has this id.
  pub fn is_finished(&self, id: impl Into<RecordId>) -> bool {
    let id = id.into();
    self.completions.iter().any(|c| c.id == id)
  }

  /// Whether the most recent write to the backend failed.
  pub fn last_save_failed(&self) -> bool { self.last_save_failed }

  pub fn backend(&self) -> &B { &self.backend }
}
