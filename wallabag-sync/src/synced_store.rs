//! Synced store: the set of article ids already materialized.
//!
//! Persists a JSON array of integer ids at `<state_dir>/.synced`.
//! Writes use the `.tmp` + rename pattern, so a reader never observes a
//! half-written file.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use wallabag_core::ArticleId;

use crate::error::{io_err, SyncError};

/// File name of the store inside the state directory.
pub const SYNCED_FILE: &str = ".synced";

/// Ids of articles already synced. Serialized in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncedSet(BTreeSet<ArticleId>);

impl SyncedSet {
    pub fn new() -> Self {
        SyncedSet::default()
    }

    pub fn contains(&self, id: ArticleId) -> bool {
        self.0.contains(&id)
    }

    /// Returns `false` if `id` was already present.
    pub fn insert(&mut self, id: ArticleId) -> bool {
        self.0.insert(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ArticleId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<ArticleId> for SyncedSet {
    fn from_iter<I: IntoIterator<Item = ArticleId>>(iter: I) -> Self {
        SyncedSet(iter.into_iter().collect())
    }
}

/// `<state_dir>/.synced`
pub fn synced_path(state_dir: &Path) -> PathBuf {
    state_dir.join(SYNCED_FILE)
}

/// Load the synced set.
///
/// A missing or whitespace-only file is the empty set. Anything else that
/// is not a JSON array of integers is [`SyncError::CorruptSyncedSet`].
pub fn load(state_dir: &Path) -> Result<SyncedSet, SyncError> {
    let path = synced_path(state_dir);
    if !path.exists() {
        return Ok(SyncedSet::new());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    if contents.trim().is_empty() {
        return Ok(SyncedSet::new());
    }
    let ids: Vec<ArticleId> = serde_json::from_str(&contents)
        .map_err(|source| SyncError::CorruptSyncedSet { path, source })?;
    Ok(ids.into_iter().collect())
}

/// Replace the persisted set with `set`, atomically.
pub fn save(state_dir: &Path, set: &SyncedSet) -> Result<(), SyncError> {
    std::fs::create_dir_all(state_dir).map_err(|e| io_err(state_dir, e))?;

    let path = synced_path(state_dir);
    let ids: Vec<ArticleId> = set.iter().collect();
    let json = serde_json::to_string(&ids)?;
    let tmp = state_dir.join(format!("{SYNCED_FILE}.tmp"));
    std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, &path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(&path, e));
    }
    Ok(())
}

/// Forget every synced id. Returns whether a store existed.
pub fn reset(state_dir: &Path) -> Result<bool, SyncError> {
    let path = synced_path(state_dir);
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_err(&path, e)),
    }
}
