//! `wallabag-sync reset` — forget synced article ids.

use anyhow::{Context, Result};
use clap::Args;

use wallabag_sync::pipeline;

use crate::Env;

/// Arguments for `wallabag-sync reset`.
#[derive(Args, Debug)]
pub struct ResetArgs {}

impl ResetArgs {
    pub fn run(self, env: &Env) -> Result<()> {
        let settings = env.load_settings()?;
        match pipeline::reset(&env.home, &settings).context("reset failed")? {
            Some(path) => println!("✓ Removed {}", path.display()),
            None => println!("✓ Nothing to reset"),
        }
        println!("  The next sync reconsiders every article; existing notes are skipped.");
        Ok(())
    }
}
