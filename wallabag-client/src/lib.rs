//! # wallabag-client
//!
//! Blocking client for the wallabag REST API.
//!
//! [`WallabagClient`] implements [`wallabag_core::ArticleSource`], so it can
//! be handed straight to the sync orchestrator. Token exchange is out of
//! scope: the client is built from an access token obtained elsewhere.

pub mod client;
pub mod error;

pub use client::{EntriesPage, WallabagClient, DEFAULT_PER_PAGE, MAX_EXPORT_BYTES};
pub use error::ClientError;
