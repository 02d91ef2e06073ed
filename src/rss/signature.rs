use ring::digest;
use serde_json::{json, Value};

use crate::models::follow::Follow;

use super::{http_date, parse_timestamp, EPOCH_HTTP_DATE};

/// Cache validators derived from the canonical follow sequence. `etag` is a
/// weak validator (`W/"<sha1-hex>"`); `last_modified` is an RFC 1123
/// HTTP-date.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSignature {
    pub etag: String,
    pub last_modified: String,
}

/// Fingerprint the canonical sequence. The digest covers the
/// `(id, last_chapter, uploaded_at)` tuple of every item, in order, so the
/// ETag changes exactly when read-relevant content changes. SHA-1 is used
/// for change detection only.
pub fn build_signature(canonical: &[Follow]) -> FeedSignature {
    let entries: Vec<Value> = canonical
        .iter()
        .map(|follow| {
            let comic = follow.comic();
            json!({
                "id": comic
                    .and_then(|c| c.id)
                    .map(Value::from)
                    .unwrap_or_else(|| Value::from("unknown")),
                "last_chapter": comic
                    .and_then(|c| c.last_chapter.as_ref())
                    .map(|lc| Value::from(lc.to_string()))
                    .unwrap_or_else(|| Value::from("")),
                "uploaded_at": comic
                    .and_then(|c| c.uploaded_at.as_deref())
                    .unwrap_or(""),
            })
        })
        .collect();

    let payload = Value::Array(entries).to_string();
    let digest = digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, payload.as_bytes());
    let etag = format!("W/\"{}\"", hex::encode(digest.as_ref()));

    let last_modified = canonical
        .first()
        .and_then(|f| f.comic())
        .and_then(|c| c.uploaded_at.as_deref())
        .and_then(parse_timestamp)
        .map(http_date)
        .unwrap_or_else(|| EPOCH_HTTP_DATE.to_string());

    FeedSignature {
        etag,
        last_modified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::follow::{Comic, LastChapter};

    fn follow(id: i64, last_chapter: f64, uploaded_at: &str) -> Follow {
        Follow {
            follow_type: 1,
            md_comics: Some(Comic {
                id: Some(id),
                title: Some("Title".into()),
                slug: None,
                status: None,
                last_chapter: Some(LastChapter::Number(last_chapter)),
                uploaded_at: Some(uploaded_at.to_string()),
                md_covers: vec![],
            }),
            md_chapters: None,
        }
    }

    #[test]
    fn etag_is_weak_validator_syntax() {
        let sig = build_signature(&[follow(1, 10.0, "2024-05-01T12:00:00Z")]);
        assert!(sig.etag.starts_with("W/\""), "etag: {}", sig.etag);
        assert!(sig.etag.ends_with('"'));
        // W/ + quotes + 40 hex chars
        assert_eq!(sig.etag.len(), 44);
    }

    #[test]
    fn identical_content_yields_identical_etag() {
        let a = [follow(1, 10.0, "2024-05-01T12:00:00Z")];
        let b = [follow(1, 10.0, "2024-05-01T12:00:00Z")];
        assert_eq!(build_signature(&a).etag, build_signature(&b).etag);
    }

    #[test]
    fn content_changes_change_the_etag() {
        let base = [follow(1, 10.0, "2024-05-01T12:00:00Z")];
        let new_chapter = [follow(1, 11.0, "2024-05-01T12:00:00Z")];
        let new_upload = [follow(1, 10.0, "2024-05-02T12:00:00Z")];
        let reordered = [
            follow(2, 5.0, "2024-05-01T12:00:00Z"),
            follow(1, 10.0, "2024-05-01T12:00:00Z"),
        ];
        let ordered = [
            follow(1, 10.0, "2024-05-01T12:00:00Z"),
            follow(2, 5.0, "2024-05-01T12:00:00Z"),
        ];

        let etag = build_signature(&base).etag;
        assert_ne!(etag, build_signature(&new_chapter).etag);
        assert_ne!(etag, build_signature(&new_upload).etag);
        assert_ne!(
            build_signature(&reordered).etag,
            build_signature(&ordered).etag
        );
    }

    #[test]
    fn last_modified_tracks_first_item() {
        let sig = build_signature(&[
            follow(1, 10.0, "2024-05-01T12:00:00Z"),
            follow(2, 3.0, "2024-01-01T00:00:00Z"),
        ]);
        assert_eq!(sig.last_modified, "Wed, 01 May 2024 12:00:00 GMT");
    }

    #[test]
    fn empty_sequence_uses_epoch() {
        let sig = build_signature(&[]);
        assert_eq!(sig.last_modified, EPOCH_HTTP_DATE);
        assert!(sig.etag.starts_with("W/\""));
    }
}
