//! [`RecordId`], the canonical key for tips and activities.
//!
//! Identifiers arrive either as strings or as numbers. They are normalised to
//! a single string form when they enter the crate, so every later comparison
//! is a plain string comparison.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A string-or-number identifier, stored in its canonical string form.
///
/// Numbers render the way they appear in JSON: `7` becomes `"7"`, `1.5`
/// becomes `"1.5"`. A [`RecordId`] always serialises as a JSON string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RecordId(String);

impl RecordId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }

  pub fn into_string(self) -> String { self.0 }
}

impl fmt::Display for RecordId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl AsRef<str> for RecordId {
  fn as_ref(&self) -> &str { &self.0 }
}

impl Borrow<str> for RecordId {
  fn borrow(&self) -> &str { &self.0 }
}

impl From<&str> for RecordId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

impl From<String> for RecordId {
  fn from(s: String) -> Self { Self(s) }
}

impl From<&RecordId> for RecordId {
  fn from(id: &RecordId) -> Self { id.clone() }
}

impl From<u64> for RecordId {
  fn from(n: u64) -> Self { Self(n.to_string()) }
}

impl From<i64> for RecordId {
  fn from(n: i64) -> Self { Self(n.to_string()) }
}

impl From<u32> for RecordId {
  fn from(n: u32) -> Self { Self(n.to_string()) }
}

impl From<i32> for RecordId {
  fn from(n: i32) -> Self { Self(n.to_string()) }
}

impl PartialEq<str> for RecordId {
  fn eq(&self, other: &str) -> bool { self.0 == other }
}

impl PartialEq<&str> for RecordId {
  fn eq(&self, other: &&str) -> bool { self.0 == *other }
}

// ─── Serde ───────────────────────────────────────────────────────────────────

/// Wire shapes accepted for an identifier.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
  Text(String),
  Number(serde_json::Number),
}

impl Serialize for RecordId {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.0)
  }
}

impl<'de> Deserialize<'de> for RecordId {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    Ok(match RawId::deserialize(deserializer)? {
      RawId::Text(s) => Self(s),
      RawId::Number(n) => Self(n.to_string()),
    })
  }
}
