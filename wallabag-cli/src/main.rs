//! wallabag-sync — pull wallabag articles into a Markdown vault.
//!
//! # Usage
//!
//! ```text
//! wallabag-sync init --vault <dir> --server <url> [--force]
//! wallabag-sync sync [--dry-run]
//! wallabag-sync status [--json]
//! wallabag-sync reset
//! ```
//!
//! Every command accepts `--config <path>` to use a settings file other than
//! `~/.wallabag-sync/config.yaml`. `RUST_LOG` controls log output.

mod commands;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{init::InitArgs, reset::ResetArgs, status::StatusArgs, sync::SyncArgs};
use wallabag_core::{settings, ConfigError, Settings};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "wallabag-sync",
    version,
    about = "Sync unread wallabag articles into a Markdown vault",
    long_about = None,
)]
struct Cli {
    /// Settings file to use instead of ~/.wallabag-sync/config.yaml.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a settings file for a vault and server.
    Init(InitArgs),

    /// Fetch new articles and write them into the vault.
    Sync(SyncArgs),

    /// Show settings and local sync state.
    Status(StatusArgs),

    /// Forget which articles were synced.
    Reset(ResetArgs),
}

// ---------------------------------------------------------------------------
// Shared command context
// ---------------------------------------------------------------------------

/// Home directory and settings location shared by every command.
#[derive(Debug, Clone)]
pub struct Env {
    pub home: PathBuf,
    pub config_path: PathBuf,
}

impl Env {
    fn resolve(config: Option<PathBuf>) -> Result<Self> {
        let home = settings::home_dir().context("could not determine home directory")?;
        let config_path = config.unwrap_or_else(|| settings::config_path_at(&home));
        Ok(Env { home, config_path })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load settings, pointing at `init` when there are none yet.
    pub fn load_settings(&self) -> Result<Settings> {
        match settings::load_from(&self.config_path) {
            Ok(s) => Ok(s),
            Err(ConfigError::NotFound { path }) => anyhow::bail!(
                "no settings at {} — run `wallabag-sync init --vault <dir> --server <url>` first",
                path.display()
            ),
            Err(e) => Err(e).context("failed to load settings"),
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let env = Env::resolve(cli.config)?;
    match cli.command {
        Commands::Init(args) => args.run(&env),
        Commands::Sync(args) => args.run(&env),
        Commands::Status(args) => args.run(&env),
        Commands::Reset(args) => args.run(&env),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
