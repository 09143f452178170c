//! Pass lock: at most one sync pass per state directory.
//!
//! The lock is a `<state_dir>/.sync.lock` file created with `create_new`;
//! a second pass finding it fails with [`SyncError::AlreadyRunning`]. The
//! file holds the owning pid and is removed when the guard drops. A lock
//! left behind by a killed process has to be removed by hand.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{io_err, SyncError};

pub const LOCK_FILE: &str = ".sync.lock";

/// RAII guard for the pass lock.
#[derive(Debug)]
pub struct PassLock {
    path: PathBuf,
}

impl PassLock {
    /// Take the lock for `state_dir`, creating the directory if needed.
    pub fn acquire(state_dir: &Path) -> Result<Self, SyncError> {
        std::fs::create_dir_all(state_dir).map_err(|e| io_err(state_dir, e))?;
        let path = state_dir.join(LOCK_FILE);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                let _ = writeln!(file, "{}", std::process::id());
                tracing::debug!("acquired pass lock {}", path.display());
                Ok(PassLock { path })
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(SyncError::AlreadyRunning { path })
            }
            Err(e) => Err(io_err(&path, e)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PassLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!("could not release pass lock {}: {e}", self.path.display());
        }
    }
}
