//! Template context: serializable placeholder payload built from [`Article`].

use std::collections::HashMap;

use serde::Serialize;

use wallabag_core::{Annotation, Article, Tag, TagFormat};

use crate::markdown;

/// Per-render knobs that do not come from the article itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// wallabag base URL, used for `{{wallabag_link}}`.
    pub server_url: String,
    pub convert_html_to_markdown: bool,
    pub tag_format: TagFormat,
    /// Vault path of the exported PDF, for `{{pdf_link}}`.
    pub pdf_link: Option<String>,
}

/// Flat rendering payload. Every field name is a placeholder name.
#[derive(Debug, Clone, Serialize)]
pub struct NoteContext {
    pub id: i64,
    pub article_title: String,
    pub original_link: String,
    pub wallabag_link: String,
    pub content: String,
    pub tags: String,
    pub created_at: String,
    pub updated_at: String,
    pub published_at: String,
    pub archived_at: String,
    pub reading_time: u32,
    pub domain_name: String,
    pub preview_picture: String,
    pub is_starred: bool,
    pub annotations: String,
    pub pdf_link: String,
}

impl NoteContext {
    /// Build a [`NoteContext`] from an [`Article`].
    pub fn from_article(article: &Article, opts: &RenderOptions) -> Self {
        let content = if opts.convert_html_to_markdown {
            markdown::html_to_markdown(&article.content)
        } else {
            article.content.clone()
        };

        NoteContext {
            id: article.id.0,
            article_title: article.title.clone(),
            original_link: article.url.clone(),
            wallabag_link: format!(
                "{}/view/{}",
                opts.server_url.trim_end_matches('/'),
                article.id
            ),
            content,
            tags: format_tags(&article.tags, opts.tag_format),
            created_at: article.created_at.to_rfc3339(),
            updated_at: article.updated_at.to_rfc3339(),
            published_at: article
                .published_at
                .map(|d| d.to_rfc3339())
                .unwrap_or_default(),
            archived_at: article
                .archived_at
                .map(|d| d.to_rfc3339())
                .unwrap_or_default(),
            reading_time: article.reading_time,
            domain_name: article.domain_name.clone().unwrap_or_default(),
            preview_picture: article.preview_picture.clone().unwrap_or_default(),
            is_starred: article.is_starred,
            annotations: format_annotations(&article.annotations),
            pdf_link: opts.pdf_link.clone().unwrap_or_default(),
        }
    }

    /// Placeholder name → substituted text.
    pub fn to_variables(&self) -> HashMap<String, String> {
        let Ok(serde_json::Value::Object(map)) = serde_json::to_value(self) else {
            return HashMap::new();
        };
        map.into_iter()
            .map(|(k, v)| {
                let text = match v {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                };
                (k, text)
            })
            .collect()
    }
}

/// Render tag labels for the `{{tags}}` placeholder.
pub fn format_tags(tags: &[Tag], format: TagFormat) -> String {
    match format {
        TagFormat::Csv => tags
            .iter()
            .map(|t| t.label.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        TagFormat::Hashtag => tags
            .iter()
            .map(|t| {
                let label: String = t
                    .label
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join("_");
                format!("#{label}")
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Each annotation becomes a block quote, with its remark underneath.
pub fn format_annotations(annotations: &[Annotation]) -> String {
    annotations
        .iter()
        .map(|a| {
            let quote = a
                .quote
                .lines()
                .map(|l| format!("> {l}"))
                .collect::<Vec<_>>()
                .join("\n");
            if a.text.trim().is_empty() {
                quote
            } else {
                format!("{quote}\n\n{}", a.text.trim())
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use wallabag_core::ArticleId;

    fn make_article() -> Article {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        Article {
            id: ArticleId(12),
            title: "Ownership explained".to_string(),
            content: "<p>Borrow <strong>checker</strong></p>".to_string(),
            url: "https://example.com/own".to_string(),
            tags: vec![Tag::from("rust"), Tag::from("deep work")],
            is_archived: false,
            is_starred: true,
            created_at: created,
            updated_at: created,
            published_at: None,
            archived_at: None,
            reading_time: 4,
            domain_name: Some("example.com".to_string()),
            preview_picture: None,
            annotations: vec![Annotation {
                quote: "line one\nline two".to_string(),
                text: "worth re-reading".to_string(),
            }],
        }
    }

    fn opts() -> RenderOptions {
        RenderOptions {
            server_url: "https://w.example/".to_string(),
            convert_html_to_markdown: false,
            tag_format: TagFormat::Csv,
            pdf_link: None,
        }
    }

    #[test]
    fn context_fields_populated() {
        let ctx = NoteContext::from_article(&make_article(), &opts());
        assert_eq!(ctx.id, 12);
        assert_eq!(ctx.wallabag_link, "https://w.example/view/12");
        assert_eq!(ctx.tags, "rust, deep work");
        assert_eq!(ctx.created_at, "2024-05-01T09:30:00+00:00");
        assert_eq!(ctx.published_at, "");
        assert_eq!(ctx.pdf_link, "");
    }

    #[test]
    fn hashtag_format_joins_words() {
        let tags = vec![Tag::from("rust"), Tag::from("deep  work")];
        assert_eq!(format_tags(&tags, TagFormat::Hashtag), "#rust #deep_work");
    }

    #[test]
    fn annotations_render_as_quotes() {
        let out = format_annotations(&make_article().annotations);
        assert_eq!(out, "> line one\n> line two\n\nworth re-reading");
    }

    #[test]
    fn variables_flatten_scalars() {
        let vars = NoteContext::from_article(&make_article(), &opts()).to_variables();
        assert_eq!(vars["id"], "12");
        assert_eq!(vars["is_starred"], "true");
        assert_eq!(vars["reading_time"], "4");
        assert_eq!(vars["domain_name"], "example.com");
    }

    #[test]
    fn content_is_raw_html_without_conversion() {
        let ctx = NoteContext::from_article(&make_article(), &opts());
        assert!(ctx.content.contains("<strong>"));
    }
}
