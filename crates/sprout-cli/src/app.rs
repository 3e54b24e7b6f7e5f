//! Application state and command dispatch.
//!
//! [`App`] owns the one progress store and the one favorites store for the
//! process, both on a shared SQLite backend. Commands borrow it; nothing
//! reaches the stores any other way.

use std::{collections::BTreeMap, sync::Arc};

use anyhow::{Result, bail};
use serde::Serialize;
use serde_json::json;
use sprout_core::{
  FAVORITES_KEY, FavoriteTip, FavoritesStore, LoadOutcome, NewCompletion, PROGRESS_KEY,
  ProgressStore,
};
use sprout_store_sqlite::SqliteBlobStore;

use crate::{Command, FavCommand, FavoriteArgs, RecordArgs};

type Backend = Arc<SqliteBlobStore>;

// ─── App ──────────────────────────────────────────────────────────────────────

pub struct App {
  backend:   Backend,
  progress:  ProgressStore<Backend>,
  favorites: FavoritesStore<Backend>,
  /// What each store found when it was opened: `(progress, favorites)`.
  loaded:    (LoadOutcome, LoadOutcome),
}

impl App {
  /// Open both stores on `backend` and load their saved state.
  pub fn open(backend: SqliteBlobStore) -> Self {
    let backend = Arc::new(backend);
    let (progress, progress_outcome) = ProgressStore::open(Arc::clone(&backend));
    let (favorites, favorites_outcome) = FavoritesStore::open(Arc::clone(&backend));
    Self {
      backend,
      progress,
      favorites,
      loaded: (progress_outcome, favorites_outcome),
    }
  }

  /// Run one command, returning what should be printed to stdout.
  pub fn run(&mut self, command: Command) -> Result<String> {
    match command {
      Command::Record(args) => self.record(args),
      Command::Finished { id } => Ok(self.progress.is_finished(id).to_string()),
      Command::Total => Ok(self.progress.total().to_string()),
      Command::Skills => {
        let counts: BTreeMap<_, _> = self.progress.skills_count().into_iter().collect();
        pretty(&counts)
      }
      Command::History => {
        let groups: Vec<_> = self
          .progress
          .by_date()
          .into_iter()
          .map(|(date, completions)| json!({ "date": date, "completions": completions }))
          .collect();
        pretty(&groups)
      }
      Command::Clear => {
        self.progress.clear_all();
        self.check_saved(self.progress.last_save_failed(), PROGRESS_KEY)?;
        Ok("cleared".to_owned())
      }
      Command::Dedupe => {
        let removed = self.progress.dedupe();
        self.check_saved(self.progress.last_save_failed(), PROGRESS_KEY)?;
        Ok(format!("removed {removed} duplicate(s)"))
      }
      Command::Status => self.status(),
      Command::Fav(cmd) => self.favorite(cmd),
    }
  }

  fn record(&mut self, args: RecordArgs) -> Result<String> {
    let once = args.once;
    let payload = NewCompletion::from(args);

    let output = if once {
      self.progress.record_once(payload).to_string()
    } else {
      pretty(self.progress.record(payload))?
    };
    self.check_saved(self.progress.last_save_failed(), PROGRESS_KEY)?;
    Ok(output)
  }

  fn favorite(&mut self, cmd: FavCommand) -> Result<String> {
    let output = match cmd {
      FavCommand::Add(args) => {
        let tip = FavoriteTip::from(args);
        let id = tip.tip_id.clone();
        self.favorites.add(tip);
        format!("added {id}")
      }
      FavCommand::Remove { id } => {
        self.favorites.remove(id.as_str());
        format!("removed {id}")
      }
      FavCommand::Toggle(args) => self.favorites.toggle(FavoriteTip::from(args)).to_string(),
      FavCommand::Is { id } => return Ok(self.favorites.is_favorite(id).to_string()),
      FavCommand::List => return pretty(&self.favorites.list()),
      FavCommand::Count => return Ok(self.favorites.count().to_string()),
    };
    self.check_saved(self.favorites.last_save_failed(), FAVORITES_KEY)?;
    Ok(output)
  }

  fn status(&self) -> Result<String> {
    let mut lines = Vec::new();
    for (key, outcome) in [(PROGRESS_KEY, &self.loaded.0), (FAVORITES_KEY, &self.loaded.1)] {
      let saved = match self.backend.updated_at(key)? {
        Some(at) => at.to_rfc3339(),
        None => "never".to_owned(),
      };
      lines.push(format!("{key}: {} (last saved: {saved})", describe(outcome)));
    }
    lines.push(format!("completions: {}", self.progress.total()));
    lines.push(format!("favorites: {}", self.favorites.count()));
    Ok(lines.join("\n"))
  }

  /// The stores never fail a mutation; the CLI still tells the user when a
  /// change only lived for this process.
  fn check_saved(&self, failed: bool, key: &str) -> Result<()> {
    if failed {
      bail!("change to {key} could not be saved");
    }
    Ok(())
  }
}

fn describe(outcome: &LoadOutcome) -> String {
  match outcome {
    LoadOutcome::Loaded(n) => format!("loaded {n} record(s)"),
    LoadOutcome::Empty => "no saved data".to_owned(),
    LoadOutcome::Corrupt(raw) => format!("corrupt ({} bytes kept on disk)", raw.len()),
    LoadOutcome::Unavailable(e) => format!("unreadable: {e}"),
  }
}

fn pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
  Ok(serde_json::to_string_pretty(value)?)
}

// ─── Argument conversion ──────────────────────────────────────────────────────

impl From<RecordArgs> for NewCompletion {
  fn from(args: RecordArgs) -> Self {
    let mut payload =
      NewCompletion::new(args.id, args.tip, args.activity_name, args.activity_id)
        .with_skills(args.skills);
    payload.age_code = args.age_code;
    payload.source = args.source;
    payload.completed_at = args.completed_at;
    payload
  }
}

impl From<FavoriteArgs> for FavoriteTip {
  fn from(args: FavoriteArgs) -> Self {
    let mut tip = FavoriteTip::new(args.tip_id, args.tip, args.activity_name, args.activity_id);
    tip.tip_des = args.tip_des;
    tip.skills = (!args.skills.is_empty()).then_some(args.skills);
    tip.source = args.source;
    tip.age_code = args.age_code;
    tip
  }
}

#[cfg(test)]
mod tests {
  use sprout_core::Skill;

  use super::*;

  fn app() -> App { App::open(SqliteBlobStore::open_in_memory().unwrap()) }

  fn record_args(id: &str, once: bool) -> RecordArgs {
    RecordArgs {
      id:            id.to_owned(),
      tip:           "Roll the ball".to_owned(),
      activity_name: "Ball play".to_owned(),
      activity_id:   "7".to_owned(),
      age_code:      Some("1-3".to_owned()),
      source:        None,
      skills:        vec![Skill::new("motor")],
      completed_at:  Some("2024-05-01T10:00:00.000Z".to_owned()),
      once,
    }
  }

  fn favorite_args(id: &str) -> FavoriteArgs {
    FavoriteArgs {
      tip_id:        id.to_owned(),
      tip:           "Sing".to_owned(),
      tip_des:       None,
      activity_name: "Songs".to_owned(),
      activity_id:   "3".to_owned(),
      age_code:      None,
      source:        None,
      skills:        Vec::new(),
    }
  }

  #[test]
  fn record_once_reports_duplicates() {
    let mut app = app();
    assert_eq!(app.run(Command::Record(record_args("t1", true))).unwrap(), "true");
    assert_eq!(app.run(Command::Record(record_args("t1", true))).unwrap(), "false");
    assert_eq!(app.run(Command::Total).unwrap(), "1");
    assert_eq!(app.run(Command::Finished { id: "t1".into() }).unwrap(), "true");
  }

  #[test]
  fn skills_and_history_render_json() {
    let mut app = app();
    app.run(Command::Record(record_args("t1", false))).unwrap();

    let skills: serde_json::Value =
      serde_json::from_str(&app.run(Command::Skills).unwrap()).unwrap();
    assert_eq!(skills, json!({ "motor": 1 }));

    let history: serde_json::Value =
      serde_json::from_str(&app.run(Command::History).unwrap()).unwrap();
    assert_eq!(history[0]["date"], "2024-05-01");
    assert_eq!(history[0]["completions"][0]["id"], "t1");
  }

  #[test]
  fn fav_toggle_flips_membership() {
    let mut app = app();
    assert_eq!(app.run(Command::Fav(FavCommand::Toggle(favorite_args("9")))).unwrap(), "true");
    assert_eq!(app.run(Command::Fav(FavCommand::Count)).unwrap(), "1");
    assert_eq!(app.run(Command::Fav(FavCommand::Toggle(favorite_args("9")))).unwrap(), "false");
    assert_eq!(app.run(Command::Fav(FavCommand::Is { id: "9".into() })).unwrap(), "false");
  }

  #[test]
  fn status_reports_load_outcomes() {
    let mut app = app();
    app.run(Command::Fav(FavCommand::Add(favorite_args("1")))).unwrap();

    let status = app.run(Command::Status).unwrap();
    assert!(status.contains("bb:progress.v1: no saved data (last saved: never)"));
    assert!(status.contains("favorites: 1"));
  }
}
