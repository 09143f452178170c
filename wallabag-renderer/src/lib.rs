//! # wallabag-renderer
//!
//! Placeholder-substitution templates that turn a wallabag [`Article`] into
//! note text.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wallabag_core::{Article, TagFormat};
//! use wallabag_renderer::{NoteKind, RenderOptions, TemplateSet};
//!
//! fn render(article: &Article) -> String {
//!     let templates = TemplateSet::builtin();
//!     let opts = RenderOptions {
//!         server_url: "https://app.wallabag.it".to_string(),
//!         convert_html_to_markdown: true,
//!         tag_format: TagFormat::Csv,
//!         pdf_link: None,
//!     };
//!     templates.for_kind(NoteKind::Article).fill(article, &opts)
//! }
//! ```
//!
//! [`Article`]: wallabag_core::Article

pub mod context;
pub mod markdown;
pub mod template;

pub use context::{NoteContext, RenderOptions};
pub use template::{NoteKind, NoteTemplate, TemplateSet, DEFAULT_TEMPLATE, PDF_TEMPLATE};
