//! `wallabag-sync init --vault <dir> --server <url> [--force]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use wallabag_core::settings::{self, ACCESS_TOKEN_ENV};
use wallabag_core::ConfigError;

use crate::Env;

/// Write a settings file for a vault and server.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Root directory of the note vault. Must exist.
    #[arg(long)]
    pub vault: PathBuf,

    /// Base URL of the wallabag instance (e.g. https://app.wallabag.it).
    #[arg(long)]
    pub server: String,

    /// Replace an existing settings file.
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    pub fn run(self, env: &Env) -> Result<()> {
        let vault = self
            .vault
            .canonicalize()
            .with_context(|| format!("cannot resolve vault '{}'", self.vault.display()))?;

        let path = env.config_path();
        let written = match settings::init_to(path, &self.server, vault, self.force) {
            Ok(s) => s,
            Err(e @ ConfigError::AlreadyExists { .. }) => {
                return Err(e).context("use --force to overwrite");
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to write {}", path.display()));
            }
        };

        println!("✓ Wrote settings to {}", path.display());
        println!("  vault:  {}", written.vault.display());
        println!("  server: {}", written.server_url);
        println!(
            "  Add `access_token` to the file or export {ACCESS_TOKEN_ENV} before syncing."
        );
        Ok(())
    }
}
