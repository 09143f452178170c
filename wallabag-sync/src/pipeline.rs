//! Sync pipeline entrypoints used by the CLI.
//!
//! These wire the real collaborators ([`WallabagClient`], [`VaultStore`])
//! to a [`SyncOrchestrator`]; tests drive the orchestrator with fakes instead.

use std::path::{Path, PathBuf};

use wallabag_client::WallabagClient;
use wallabag_core::{ArticleSource, Notifier, Settings};

use crate::lock::LOCK_FILE;
use crate::orchestrator::{SyncOrchestrator, SyncReport, AUTH_REQUIRED_NOTICE};
use crate::synced_store::{self, synced_path};
use crate::vault::VaultStore;
use crate::SyncError;

/// Run one pass for `settings`, keeping state under `home` unless
/// `settings.state_dir` says otherwise.
///
/// A missing token fails before settings validation, which stats the vault.
pub fn run(
    home: &Path,
    settings: &Settings,
    notifier: &dyn Notifier,
    dry_run: bool,
) -> Result<SyncReport, SyncError> {
    let client = WallabagClient::from_settings(settings);
    if !client.is_authenticated() {
        notifier.notice(AUTH_REQUIRED_NOTICE);
        return Err(SyncError::AuthRequired);
    }
    settings.validate()?;

    let store = VaultStore::new(&settings.vault);
    let state_dir = settings.state_dir_at(home);

    SyncOrchestrator::new(settings, &client, &store, notifier, state_dir)
        .dry_run(dry_run)
        .run_sync()
}

/// Snapshot of local sync state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    pub state_dir: PathBuf,
    pub synced_count: usize,
    pub authenticated: bool,
    pub pass_running: bool,
}

/// Read-only view of the state a pass would start from.
pub fn status(home: &Path, settings: &Settings) -> Result<SyncStatus, SyncError> {
    let state_dir = settings.state_dir_at(home);
    let synced = synced_store::load(&state_dir)?;
    Ok(SyncStatus {
        synced_count: synced.len(),
        authenticated: settings.effective_access_token().is_some(),
        pass_running: state_dir.join(LOCK_FILE).exists(),
        state_dir,
    })
}

/// Forget every synced id so the next pass reconsiders all articles.
///
/// Returns the path of the removed store, or `None` if there was none.
pub fn reset(home: &Path, settings: &Settings) -> Result<Option<PathBuf>, SyncError> {
    let state_dir = settings.state_dir_at(home);
    if state_dir.join(LOCK_FILE).exists() {
        return Err(SyncError::AlreadyRunning {
            path: state_dir.join(LOCK_FILE),
        });
    }
    let removed = synced_store::reset(&state_dir)?;
    Ok(removed.then(|| synced_path(&state_dir)))
}
