//! `wallabag-sync sync` — run one pass.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use wallabag_core::Notifier;
use wallabag_sync::{pipeline, SyncReport, WriteOutcome};

use crate::Env;

/// Arguments for `wallabag-sync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Show what would be written without writing, exporting, or archiving.
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncArgs {
    pub fn run(self, env: &Env) -> Result<()> {
        let settings = env.load_settings()?;
        let report = pipeline::run(&env.home, &settings, &TerminalNotifier, self.dry_run)
            .context("sync failed")?;
        print_report(&report);
        Ok(())
    }
}

/// Prints notices to stderr so stdout stays parseable.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notice(&self, message: &str) {
        eprintln!("{}", message.cyan());
    }
}

fn print_report(report: &SyncReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };
    if report.synced.is_empty() {
        println!("{prefix}✓ nothing new");
        return;
    }

    println!(
        "{prefix}✓ {} article(s) ({} written, {} skipped, {} archived)",
        report.synced.len(),
        report.written(),
        report.skipped(),
        report.archived.len()
    );
    for w in &report.writes {
        match w {
            WriteOutcome::Written { path } => println!("  ✎  {path}"),
            WriteOutcome::WouldWrite { path } => println!("  ~  {path}"),
            WriteOutcome::Skipped { path } => println!("  ·  {}", path.bright_black()),
        }
    }
}
