//! Record types: what the stores hold and what they persist.
//!
//! Field names follow the persisted JSON layout, which mixes `camelCase`
//! (`activityName`, `completedAt`) with `snake_case` (`age_code`, `tip_des`).
//! Every optional field tolerates being absent so older payloads still load,
//! and the fields the derived views read also tolerate an explicit `null`.

use std::str::FromStr;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, RecordId};

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de> + Default,
{
  Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// ─── Skill ───────────────────────────────────────────────────────────────────

/// A developmental skill a tip exercises. Identity is `code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
  #[serde(default, deserialize_with = "null_as_default")]
  pub code:   String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub weight: Option<f64>,
}

impl Skill {
  pub fn new(code: impl Into<String>) -> Self {
    Self { code: code.into(), weight: None }
  }

  /// The trimmed code, or `None` when nothing is left after trimming.
  pub fn normalized_code(&self) -> Option<&str> {
    let code = self.code.trim();
    (!code.is_empty()).then_some(code)
  }
}

/// Parses `CODE` or `CODE:WEIGHT`.
impl FromStr for Skill {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (code, weight) = match s.split_once(':') {
      Some((code, weight)) => {
        let weight = weight
          .trim()
          .parse::<f64>()
          .map_err(|_| Error::InvalidSkill(s.to_owned()))?;
        (code, Some(weight))
      }
      None => (s, None),
    };

    let code = code.trim();
    if code.is_empty() {
      return Err(Error::InvalidSkill(s.to_owned()));
    }
    Ok(Self { code: code.to_owned(), weight })
  }
}

// ─── Completion ──────────────────────────────────────────────────────────────

/// One activity tip marked done. Never modified after it is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
  /// The tip that was completed; not unique per completion.
  pub id:            RecordId,
  #[serde(default, deserialize_with = "null_as_default")]
  pub tip:           String,
  #[serde(rename = "activityName", default, deserialize_with = "null_as_default")]
  pub activity_name: String,
  #[serde(rename = "activityId", default)]
  pub activity_id:   RecordId,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub age_code:      Option<String>,
  /// May list the same code more than once.
  #[serde(default, deserialize_with = "null_as_default")]
  pub skills:        Vec<Skill>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source:        Option<String>,
  /// ISO 8601 timestamp; the first ten characters are the calendar date.
  #[serde(rename = "completedAt", default, deserialize_with = "null_as_default")]
  pub completed_at:  String,
}

impl Completion {
  /// The `YYYY-MM-DD` bucket this completion falls in.
  ///
  /// Shorter timestamps are used whole, so a missing `completedAt` lands in
  /// the empty-string bucket.
  pub fn date(&self) -> &str {
    let ts = self.completed_at.as_str();
    match ts.char_indices().nth(10) {
      Some((end, _)) => &ts[..end],
      None => ts,
    }
  }
}

// ─── NewCompletion ───────────────────────────────────────────────────────────

/// Input to [`crate::ProgressStore::record`]. `completed_at` is optional; the
/// store stamps the current time when it is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCompletion {
  pub id:            RecordId,
  #[serde(default)]
  pub tip:           String,
  #[serde(rename = "activityName", default)]
  pub activity_name: String,
  #[serde(rename = "activityId", default)]
  pub activity_id:   RecordId,
  #[serde(default)]
  pub age_code:      Option<String>,
  #[serde(default)]
  pub skills:        Vec<Skill>,
  #[serde(default)]
  pub source:        Option<String>,
  #[serde(rename = "completedAt", default)]
  pub completed_at:  Option<String>,
}

impl NewCompletion {
  /// Convenience constructor with all optional fields left empty.
  pub fn new(
    id: impl Into<RecordId>,
    tip: impl Into<String>,
    activity_name: impl Into<String>,
    activity_id: impl Into<RecordId>,
  ) -> Self {
    Self {
      id:            id.into(),
      tip:           tip.into(),
      activity_name: activity_name.into(),
      activity_id:   activity_id.into(),
      age_code:      None,
      skills:        Vec::new(),
      source:        None,
      completed_at:  None,
    }
  }

  pub fn with_skills(mut self, skills: impl IntoIterator<Item = Skill>) -> Self {
    self.skills = skills.into_iter().collect();
    self
  }

  pub fn completed_at(mut self, at: impl Into<String>) -> Self {
    self.completed_at = Some(at.into());
    self
  }

  /// Turn the payload into a stored record, stamping `now` if no
  /// timestamp was supplied. A supplied timestamp is kept as given, even
  /// when empty.
  pub(crate) fn into_completion(self) -> Completion {
    let completed_at = self.completed_at.unwrap_or_else(now_iso8601);

    Completion {
      id: self.id,
      tip: self.tip,
      activity_name: self.activity_name,
      activity_id: self.activity_id,
      age_code: self.age_code,
      skills: self.skills,
      source: self.source,
      completed_at,
    }
  }
}

/// The current UTC instant, e.g. `2024-02-01T09:30:00.000Z`.
pub fn now_iso8601() -> String {
  Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ─── FavoriteTip ─────────────────────────────────────────────────────────────

/// A favorited tip. Exactly one per `tip_id` lives in the favorites store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteTip {
  pub tip_id:        RecordId,
  #[serde(default, deserialize_with = "null_as_default")]
  pub tip:           String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tip_des:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub skills:        Option<Vec<Skill>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source:        Option<String>,
  #[serde(rename = "activityName", default, deserialize_with = "null_as_default")]
  pub activity_name: String,
  #[serde(rename = "activityId", default)]
  pub activity_id:   RecordId,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub age_code:      Option<String>,
}

impl FavoriteTip {
  /// Convenience constructor with all optional fields left empty.
  pub fn new(
    tip_id: impl Into<RecordId>,
    tip: impl Into<String>,
    activity_name: impl Into<String>,
    activity_id: impl Into<RecordId>,
  ) -> Self {
    Self {
      tip_id:        tip_id.into(),
      tip:           tip.into(),
      tip_des:       None,
      skills:        None,
      source:        None,
      activity_name: activity_name.into(),
      activity_id:   activity_id.into(),
      age_code:      None,
    }
  }
}
