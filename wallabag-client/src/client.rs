//! HTTP client for `/api/entries`.
//!
//! | Operation     | Request                                               |
//! |---------------|-------------------------------------------------------|
//! | list entries  | `GET /api/entries.json?archive={0,1}&page=N&perPage=M` |
//! | export PDF    | `GET /api/entries/{id}/export.pdf`                    |
//! | archive entry | `PATCH /api/entries/{id}.json` `{"archive": 1}`       |

use std::io::Read;
use std::time::Duration;

use serde::Deserialize;

use wallabag_core::{ArchiveFilter, Article, ArticleId, ArticleSource, Settings};

use crate::error::ClientError;

/// Page size requested when listing entries.
pub const DEFAULT_PER_PAGE: u32 = 50;

/// Default upper bound on an exported document.
pub const MAX_EXPORT_BYTES: u64 = 256 * 1024 * 1024;

/// One page of `/api/entries.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct EntriesPage {
    pub page: u32,
    pub pages: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(rename = "_embedded")]
    pub embedded: Embedded,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Embedded {
    #[serde(default)]
    pub items: Vec<Article>,
}

/// Blocking wallabag API client authenticated with a bearer token.
pub struct WallabagClient {
    agent: ureq::Agent,
    base_url: String,
    token: Option<String>,
    per_page: u32,
    max_export_bytes: u64,
}

impl WallabagClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        WallabagClient {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
            per_page: DEFAULT_PER_PAGE,
            max_export_bytes: MAX_EXPORT_BYTES,
        }
    }

    /// Client for the server and token named in `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        WallabagClient::new(
            settings.server_base(),
            settings.effective_access_token(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Exports larger than `limit` bytes fail with [`ClientError::TooLarge`].
    pub fn with_max_export_bytes(mut self, limit: u64) -> Self {
        self.max_export_bytes = limit;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn bearer(&self) -> Result<String, ClientError> {
        self.token
            .as_deref()
            .map(|t| format!("Bearer {t}"))
            .ok_or(ClientError::MissingToken)
    }

    /// Fetch one page of entries.
    pub fn entries_page(
        &self,
        filter: ArchiveFilter,
        page: u32,
    ) -> Result<EntriesPage, ClientError> {
        let url = format!("{}/api/entries.json", self.base_url);
        let resp = self
            .agent
            .get(&url)
            .set("Authorization", &self.bearer()?)
            .query("archive", &filter.as_query_value().to_string())
            .query("page", &page.to_string())
            .query("perPage", &self.per_page.to_string())
            .call()
            .map_err(|e| ClientError::from_ureq(&url, e))?;
        resp.into_json::<EntriesPage>()
            .map_err(|source| ClientError::Decode { url, source })
    }

    /// Fetch every entry matching `filter`, following pagination.
    pub fn fetch_all(&self, filter: ArchiveFilter) -> Result<Vec<Article>, ClientError> {
        let mut articles = Vec::new();
        let mut page = 1;
        loop {
            let batch = self.entries_page(filter, page)?;
            tracing::debug!(
                "fetched page {}/{} ({} entries)",
                batch.page,
                batch.pages,
                batch.embedded.items.len()
            );
            articles.extend(batch.embedded.items);
            if batch.pages == 0 || page >= batch.pages {
                break;
            }
            page += 1;
        }
        Ok(articles)
    }

    /// Download the PDF export of one entry.
    pub fn export_pdf(&self, id: ArticleId) -> Result<Vec<u8>, ClientError> {
        let url = format!("{}/api/entries/{id}/export.pdf", self.base_url);
        let resp = self
            .agent
            .get(&url)
            .set("Authorization", &self.bearer()?)
            .call()
            .map_err(|e| ClientError::from_ureq(&url, e))?;
        let limit = self.max_export_bytes;
        let mut bytes = Vec::new();
        resp.into_reader()
            .take(limit.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(|source| ClientError::Decode {
                url: url.clone(),
                source,
            })?;
        if bytes.len() as u64 > limit {
            return Err(ClientError::TooLarge { url, limit });
        }
        Ok(bytes)
    }

    /// Set the archive flag on one entry.
    pub fn archive_entry(&self, id: ArticleId) -> Result<(), ClientError> {
        let url = format!("{}/api/entries/{id}.json", self.base_url);
        self.agent
            .request("PATCH", &url)
            .set("Authorization", &self.bearer()?)
            .send_json(serde_json::json!({ "archive": 1 }))
            .map_err(|e| ClientError::from_ureq(&url, e))?;
        tracing::debug!("archived entry {id}");
        Ok(())
    }
}

impl ArticleSource for WallabagClient {
    fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn fetch_articles(&self, filter: ArchiveFilter) -> anyhow::Result<Vec<Article>> {
        Ok(self.fetch_all(filter)?)
    }

    fn export_pdf(&self, id: ArticleId) -> anyhow::Result<Vec<u8>> {
        Ok(WallabagClient::export_pdf(self, id)?)
    }

    fn archive(&self, id: ArticleId) -> anyhow::Result<()> {
        Ok(self.archive_entry(id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = WallabagClient::new("https://w.example/", None, Duration::from_secs(1));
        assert_eq!(client.base_url(), "https://w.example");
    }

    #[test]
    fn blank_token_is_not_authenticated() {
        let client = WallabagClient::new("https://w.example", Some("  ".into()), Duration::from_secs(1));
        assert!(!client.is_authenticated());
        assert!(matches!(client.bearer(), Err(ClientError::MissingToken)));
    }

    #[test]
    fn per_page_has_floor_of_one() {
        let client = WallabagClient::new("https://w.example", None, Duration::from_secs(1))
            .with_per_page(0);
        assert_eq!(client.per_page, 1);
    }

    #[test]
    fn entries_page_parses_embedded_items() {
        let json = r#"{"page":1,"limit":50,"pages":1,"total":1,"_embedded":{"items":[
            {"id":5,"title":"t","content":"","url":"u","tags":[],"is_archived":0,
             "is_starred":0,"created_at":"2024-01-01T00:00:00+0000",
             "updated_at":"2024-01-01T00:00:00+0000"}]}}"#;
        let page: EntriesPage = serde_json::from_str(json).expect("parse");
        assert_eq!(page.total, 1);
        assert_eq!(page.embedded.items[0].id, ArticleId(5));
    }
}
