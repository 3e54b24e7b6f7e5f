//! Configuration for the `sprout` binary.
//!
//! Read from an optional TOML file, then overridden by `SPROUT_*`
//! environment variables (e.g. `SPROUT_STORE_PATH`).

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Shape of the configuration after all sources are merged.
#[derive(Debug, Deserialize)]
pub struct CliConfig {
  /// SQLite file holding both stores. A leading `~/` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/sprout/sprout.db") }

impl CliConfig {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("SPROUT"))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;

    settings
      .try_deserialize()
      .context("failed to deserialise CliConfig")
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_falls_back_to_default() {
    let dir = tempfile::TempDir::new().unwrap();
    let cfg = CliConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(cfg.store_path, default_store_path());
  }

  #[test]
  fn file_sets_store_path() {
    let dir = tempfile::TempDir::new().unwrap();
    let file = dir.path().join("sprout.toml");
    std::fs::write(&file, "store_path = \"/tmp/elsewhere.db\"\n").unwrap();

    let cfg = CliConfig::load(&file).unwrap();
    assert_eq!(cfg.store_path, PathBuf::from("/tmp/elsewhere.db"));
  }

  #[test]
  fn expand_tilde_leaves_other_paths_alone() {
    assert_eq!(expand_tilde(Path::new("/var/db")), PathBuf::from("/var/db"));
    assert_eq!(expand_tilde(Path::new("rel/db")), PathBuf::from("rel/db"));
  }
}
