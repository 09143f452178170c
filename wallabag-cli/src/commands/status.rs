//! `wallabag-sync status` — settings summary and local sync state.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use wallabag_core::Settings;
use wallabag_sync::{pipeline, synced_store};

use crate::Env;

/// Arguments for `wallabag-sync status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self, env: &Env) -> Result<()> {
        let settings = env.load_settings()?;
        let state = pipeline::status(&env.home, &settings).context("failed to read sync state")?;
        let last_sync_at = last_modified(&synced_store::synced_path(&state.state_dir));

        let report = StatusJson {
            config: env.config_path().display().to_string(),
            server_url: settings.server_url.clone(),
            vault: settings.vault.display().to_string(),
            folder: settings.folder.clone(),
            mode: mode_label(&settings).to_string(),
            archive_after_sync: settings.archive_after_sync,
            sync_archived: settings.sync_archived,
            authenticated: state.authenticated,
            synced_count: state.synced_count,
            last_sync_at: last_sync_at.map(|t| t.to_rfc3339()),
            pass_running: state.pass_running,
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize status JSON")?
            );
            return Ok(());
        }

        print_table(&report, last_sync_at);
        Ok(())
    }
}

#[derive(Serialize)]
struct StatusJson {
    config: String,
    server_url: String,
    vault: String,
    folder: String,
    mode: String,
    archive_after_sync: bool,
    sync_archived: bool,
    authenticated: bool,
    synced_count: usize,
    last_sync_at: Option<String>,
    pass_running: bool,
}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "setting")]
    key: &'static str,
    #[tabled(rename = "value")]
    value: String,
}

fn row(key: &'static str, value: impl Into<String>) -> Row {
    Row {
        key,
        value: value.into(),
    }
}

fn print_table(report: &StatusJson, last_sync_at: Option<DateTime<Local>>) {
    println!(
        "wallabag-sync v{} | {} article(s) synced",
        env!("CARGO_PKG_VERSION"),
        report.synced_count
    );

    let auth = if report.authenticated {
        "yes".green().to_string()
    } else {
        "no".red().bold().to_string()
    };
    let last = last_sync_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "never".to_string());

    let rows = vec![
        row("config", report.config.clone()),
        row("server", report.server_url.clone()),
        row("vault", report.vault.clone()),
        row("folder", report.folder.clone()),
        row("mode", report.mode.clone()),
        row("archive after sync", yes_no(report.archive_after_sync)),
        row("sync archived", yes_no(report.sync_archived)),
        row("token", auth),
        row("last sync", last),
    ];
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if report.pass_running {
        println!("{}", "A sync pass is running (lock file present).".yellow());
    }
    if !report.authenticated {
        println!("Set `access_token` in the config or export WALLABAG_ACCESS_TOKEN.");
    }
}

fn mode_label(settings: &Settings) -> &'static str {
    match (settings.download_as_pdf, settings.create_pdf_note) {
        (false, _) => "markdown",
        (true, false) => "pdf",
        (true, true) => "pdf + note",
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn last_modified(path: &Path) -> Option<DateTime<Local>> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::<Local>::from(modified))
}
