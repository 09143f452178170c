//! Domain types for wallabag articles.
//!
//! Field names follow the wallabag REST API (`/api/entries.json`) so an
//! [`Article`] deserializes straight from an `_embedded.items` element.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Stable wallabag entry identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(pub i64);

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for ArticleId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which side of the archive flag a fetch is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveFilter {
    #[default]
    Unarchived,
    Archived,
}

impl ArchiveFilter {
    /// Value of the `archive` query parameter.
    pub fn as_query_value(self) -> u8 {
        match self {
            ArchiveFilter::Unarchived => 0,
            ArchiveFilter::Archived => 1,
        }
    }
}

impl From<bool> for ArchiveFilter {
    fn from(archived: bool) -> Self {
        if archived {
            ArchiveFilter::Archived
        } else {
            ArchiveFilter::Unarchived
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A tag attached to an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub id: i64,
    pub label: String,
    #[serde(default)]
    pub slug: String,
}

impl From<&str> for Tag {
    fn from(label: &str) -> Self {
        Tag {
            id: 0,
            label: label.to_owned(),
            slug: label.to_lowercase().replace(char::is_whitespace, "-"),
        }
    }
}

/// A highlighted passage with an optional remark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub quote: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

/// A saved article as returned by the wallabag server. Read-only to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Raw HTML body.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, deserialize_with = "flag")]
    pub is_archived: bool,
    #[serde(default, deserialize_with = "flag")]
    pub is_starred: bool,
    #[serde(with = "wallabag_date")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "wallabag_date")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, with = "wallabag_date::option")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, with = "wallabag_date::option")]
    pub archived_at: Option<DateTime<Utc>>,
    /// Estimated reading time in minutes.
    #[serde(default)]
    pub reading_time: u32,
    #[serde(default)]
    pub domain_name: Option<String>,
    #[serde(default)]
    pub preview_picture: Option<String>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

// ---------------------------------------------------------------------------
// serde helpers
// ---------------------------------------------------------------------------

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// wallabag encodes booleans as `0`/`1`; accept either form.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(n)) => n != 0,
        None => false,
    })
}

/// wallabag emits `2024-01-31T09:15:00+0100` (no colon in the offset), which
/// is not RFC 3339. Both forms are accepted; serialization is RFC 3339.
mod wallabag_date {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub(super) fn parse(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(s)
            .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z"))
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).map_err(de::Error::custom)
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            dt: &Option<DateTime<Utc>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => s.serialize_some(&dt.to_rfc3339()),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(d)? {
                Some(raw) if !raw.is_empty() => {
                    super::parse(&raw).map(Some).map_err(de::Error::custom)
                }
                _ => Ok(None),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
