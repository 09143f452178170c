//! wallabag-sync core library — article types, settings persistence, errors.
//!
//! - [`types`] — [`Article`] and friends, deserializable from the wallabag API
//! - [`ports`] — traits the sync pass drives ([`ArticleSource`], [`NoteStore`], [`Notifier`])
//! - [`settings`] — [`Settings`] load / save / init
//! - [`error`] — [`ConfigError`]

pub mod error;
pub mod ports;
pub mod settings;
pub mod types;

pub use error::ConfigError;
pub use ports::{ArticleSource, CreateOutcome, NoteStore, Notifier};
pub use settings::{Settings, TagFormat};
pub use types::{Annotation, ArchiveFilter, Article, ArticleId, Tag};
