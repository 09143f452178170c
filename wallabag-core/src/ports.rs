//! Ports driven by a sync pass.
//!
//! Errors at these boundaries are adapter-specific, so every method returns
//! `anyhow::Result`; the sync crate wraps them into its own error enum.
//! All ports are `Send + Sync` because articles are materialized from a
//! worker pool that shares one instance of each.

use crate::types::{ArchiveFilter, Article, ArticleId};

/// The read-it-later service holding the articles.
pub trait ArticleSource: Send + Sync {
    /// Whether a usable session / token is present. Checked before any I/O.
    fn is_authenticated(&self) -> bool;

    /// Every article on the requested side of the archive flag, in server order.
    fn fetch_articles(&self, filter: ArchiveFilter) -> anyhow::Result<Vec<Article>>;

    /// PDF export of one article, as opaque bytes.
    fn export_pdf(&self, id: ArticleId) -> anyhow::Result<Vec<u8>>;

    /// Mark one article archived on the server.
    fn archive(&self, id: ArticleId) -> anyhow::Result<()>;
}

/// Result of a create-exclusive write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    /// Something already lives at the path; nothing was written.
    AlreadyExists,
}

/// A tree of notes addressed by vault-relative, `/`-separated paths.
pub trait NoteStore: Send + Sync {
    fn exists(&self, path: &str) -> anyhow::Result<bool>;

    fn read(&self, path: &str) -> anyhow::Result<String>;

    /// Write text, replacing any existing file.
    fn write(&self, path: &str, content: &str) -> anyhow::Result<()>;

    /// Write bytes, replacing any existing file.
    fn write_binary(&self, path: &str, bytes: &[u8]) -> anyhow::Result<()>;

    /// Create a new note. Never replaces an existing file.
    fn create(&self, path: &str, content: &str) -> anyhow::Result<CreateOutcome>;

    /// Create a new binary document. Never replaces an existing file.
    fn create_binary(&self, path: &str, bytes: &[u8]) -> anyhow::Result<CreateOutcome>;
}

/// Transient, human-readable status messages.
pub trait Notifier: Send + Sync {
    fn notice(&self, message: &str);
}
