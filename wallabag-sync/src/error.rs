//! Error types for wallabag-sync.

use std::path::PathBuf;

use thiserror::Error;

use wallabag_core::{ArticleId, ConfigError};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// All errors that can abort a sync pass.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The article source has no usable session; nothing was touched.
    #[error("not authenticated with wallabag; set an access token first")]
    AuthRequired,

    /// Another pass holds the lock.
    #[error("another sync is already running (lock file {path}); remove it if no sync is in progress")]
    AlreadyRunning { path: PathBuf },

    /// `.synced` exists but is not a JSON array of ids.
    #[error("synced-articles file {path} is corrupt: {source}; run `wallabag-sync reset` to start over")]
    CorruptSyncedSet {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Settings could not be used.
    #[error("settings error: {0}")]
    Config(#[from] ConfigError),

    /// A call to the article source failed.
    #[error("wallabag {op} failed{}: {source}", for_article(.id))]
    Remote {
        op: &'static str,
        id: Option<ArticleId>,
        #[source]
        source: BoxError,
    },

    /// A note-store operation failed.
    #[error("vault error at {path}: {source}")]
    Store {
        path: String,
        #[source]
        source: BoxError,
    },

    /// An I/O error on local state files, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error (synced store).
    #[error("synced store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn for_article(id: &Option<ArticleId>) -> String {
    id.map(|i| format!(" for article {i}")).unwrap_or_default()
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}

pub(crate) fn remote_err(
    op: &'static str,
    id: Option<ArticleId>,
) -> impl FnOnce(anyhow::Error) -> SyncError {
    move |e| SyncError::Remote {
        op,
        id,
        source: e.into(),
    }
}

pub(crate) fn store_err(path: &str) -> impl FnOnce(anyhow::Error) -> SyncError + '_ {
    move |e| SyncError::Store {
        path: path.to_string(),
        source: e.into(),
    }
}
