//! Deserialization of wallabag entry payloads in the shapes servers emit.
//!
//! Each `#[case]` is isolated — no shared state.

use rstest::rstest;
use wallabag_core::{Article, ArticleId};

fn entry(overrides: &[(&str, serde_json::Value)]) -> serde_json::Value {
    let mut base = serde_json::json!({
        "id": 1,
        "title": "A title",
        "content": "<p>body</p>",
        "url": "https://example.com/a",
        "tags": [],
        "is_archived": 0,
        "is_starred": 0,
        "created_at": "2024-03-01T12:00:00+0000",
        "updated_at": "2024-03-01T12:00:00+0000"
    });
    for (key, value) in overrides {
        base[*key] = value.clone();
    }
    base
}

#[rstest]
#[case::offset_without_colon("2024-03-01T13:00:00+0100")]
#[case::rfc3339("2024-03-01T13:00:00+01:00")]
#[case::zulu("2024-03-01T12:00:00Z")]
fn created_at_formats_normalise_to_utc(#[case] raw: &str) {
    let json = entry(&[("created_at", serde_json::json!(raw))]);
    let article: Article = serde_json::from_value(json).expect("parse");
    assert_eq!(article.created_at.to_rfc3339(), "2024-03-01T12:00:00+00:00");
}

#[rstest]
#[case::int_one(serde_json::json!(1), true)]
#[case::int_zero(serde_json::json!(0), false)]
#[case::bool_true(serde_json::json!(true), true)]
#[case::null(serde_json::Value::Null, false)]
fn archived_flag_encodings(#[case] raw: serde_json::Value, #[case] expected: bool) {
    let article: Article =
        serde_json::from_value(entry(&[("is_archived", raw)])).expect("parse");
    assert_eq!(article.is_archived, expected);
}

#[test]
fn missing_optional_fields_default() {
    let article: Article = serde_json::from_value(entry(&[])).expect("parse");
    assert_eq!(article.id, ArticleId(1));
    assert_eq!(article.reading_time, 0);
    assert!(article.domain_name.is_none());
    assert!(article.preview_picture.is_none());
    assert!(article.annotations.is_empty());
}

#[test]
fn serialized_article_parses_back() {
    let article: Article = serde_json::from_value(entry(&[
        ("archived_at", serde_json::json!("2024-03-02T08:00:00+0000")),
    ]))
    .expect("parse");
    let json = serde_json::to_string(&article).expect("serialize");
    let again: Article = serde_json::from_str(&json).expect("reparse");
    assert_eq!(again, article);
}

#[test]
fn bad_date_is_rejected() {
    let json = entry(&[("created_at", serde_json::json!("yesterday"))]);
    assert!(serde_json::from_value::<Article>(json).is_err());
}
