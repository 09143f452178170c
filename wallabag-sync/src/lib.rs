//! # wallabag-sync
//!
//! Delta sync from wallabag into a note vault.
//!
//! Call [`pipeline::run`] to perform one pass against the configured server
//! and vault, or build a [`SyncOrchestrator`] directly around any
//! [`ArticleSource`](wallabag_core::ArticleSource) /
//! [`NoteStore`](wallabag_core::NoteStore) pair.

pub mod error;
pub mod filename;
pub mod lock;
pub mod orchestrator;
pub mod pipeline;
pub mod synced_store;
pub mod vault;

pub use error::SyncError;
pub use orchestrator::{SyncOrchestrator, SyncReport, WriteOutcome};
pub use synced_store::SyncedSet;
pub use vault::VaultStore;
