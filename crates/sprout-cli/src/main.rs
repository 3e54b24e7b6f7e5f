//! `sprout`: command-line front end for the Sprout progress and favorites
//! stores.
//!
//! # Usage
//!
//! ```
//! sprout record --id 12 --tip "Roll the ball" --activity-name "Ball play" \
//!   --activity-id 3 --skill motor --skill social:0.5 --once
//! sprout history
//! sprout fav toggle --tip-id 12 --tip "Roll the ball" --activity-name "Ball play" --activity-id 3
//! ```

mod app;
mod config;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use app::App;
use clap::{Args, Parser, Subcommand};
use config::{CliConfig, expand_tilde};
use sprout_core::Skill;
use sprout_store_sqlite::SqliteBlobStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "sprout", version, about = "Track completed activity tips and favorites")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "sprout.toml")]
  config: PathBuf,

  /// SQLite file to use instead of the configured `store_path`.
  #[arg(long, env = "SPROUT_STORE")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Mark a tip as done.
  Record(RecordArgs),
  /// Print whether a tip has been done.
  Finished { id: String },
  /// Print the number of recorded completions.
  Total,
  /// Print how many completions exercised each skill.
  Skills,
  /// Print completions grouped by date, most recent first.
  History,
  /// Forget every completion.
  Clear,
  /// Drop repeat completions of the same tip, keeping the first.
  Dedupe,
  /// Show what was loaded and when each store was last saved.
  Status,
  /// Manage favorite tips.
  #[command(subcommand)]
  Fav(FavCommand),
}

#[derive(Subcommand, Debug)]
pub enum FavCommand {
  /// Add a tip, replacing any favorite with the same id.
  Add(FavoriteArgs),
  /// Remove a tip from favorites.
  Remove { id: String },
  /// Add the tip if absent, remove it if present.
  Toggle(FavoriteArgs),
  /// Print whether a tip is a favorite.
  Is { id: String },
  /// Print all favorites.
  List,
  /// Print the number of favorites.
  Count,
}

#[derive(Args, Debug)]
pub struct RecordArgs {
  #[arg(long)]
  pub id:            String,
  #[arg(long)]
  pub tip:           String,
  #[arg(long)]
  pub activity_name: String,
  #[arg(long)]
  pub activity_id:   String,
  #[arg(long)]
  pub age_code:      Option<String>,
  #[arg(long)]
  pub source:        Option<String>,
  /// Skill exercised, as `CODE` or `CODE:WEIGHT`. Repeatable.
  #[arg(long = "skill")]
  pub skills:        Vec<Skill>,
  /// ISO 8601 timestamp; defaults to now.
  #[arg(long)]
  pub completed_at:  Option<String>,
  /// Do nothing if the tip is already done; prints whether it was recorded.
  #[arg(long)]
  pub once:          bool,
}

#[derive(Args, Debug)]
pub struct FavoriteArgs {
  #[arg(long)]
  pub tip_id:        String,
  #[arg(long)]
  pub tip:           String,
  #[arg(long)]
  pub tip_des:       Option<String>,
  #[arg(long)]
  pub activity_name: String,
  #[arg(long)]
  pub activity_id:   String,
  #[arg(long)]
  pub age_code:      Option<String>,
  #[arg(long)]
  pub source:        Option<String>,
  /// Skill exercised, as `CODE` or `CODE:WEIGHT`. Repeatable.
  #[arg(long = "skill")]
  pub skills:        Vec<Skill>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // `--store` overrides the config file, which overrides the default.
  let store_path = match cli.store {
    Some(path) => path,
    None => CliConfig::load(&cli.config)?.store_path,
  };
  let store_path = expand_tilde(&store_path);

  let backend = SqliteBlobStore::open(&store_path)
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  tracing::debug!(path = %store_path.display(), "store opened");

  let mut app = App::open(backend);
  let output = app.run(cli.command)?;
  println!("{output}");

  Ok(())
}
