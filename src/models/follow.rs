use serde::{Deserialize, Serialize};
use std::fmt;

/// Follow category the Comick API uses for "dropped" titles. These are
/// excluded from generated feeds.
pub const DROPPED_FOLLOW_TYPE: i64 = 4;

/// One user-comic subscription record, as returned by
/// `GET /user/{userId}/follows`. Fields the feed does not need are left to
/// serde's unknown-field handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Follow {
    #[serde(rename = "type", default)]
    pub follow_type: i64,
    #[serde(default)]
    pub md_comics: Option<Comic>,
    #[serde(default)]
    pub md_chapters: Option<Chapter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comic {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub last_chapter: Option<LastChapter>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub md_covers: Vec<Cover>,
}

/// Latest read/available chapter attached to a follow. Absence means the
/// feed item is title-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    #[serde(default)]
    pub chap: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cover {
    #[serde(default)]
    pub w: i64,
    #[serde(default)]
    pub h: i64,
    #[serde(default)]
    pub b2key: String,
}

/// The API reports `last_chapter` as either a JSON number or a string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LastChapter {
    Number(f64),
    Text(String),
}

impl fmt::Display for LastChapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastChapter::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            LastChapter::Number(n) => write!(f, "{}", n),
            LastChapter::Text(s) => write!(f, "{}", s),
        }
    }
}

impl Follow {
    pub fn comic(&self) -> Option<&Comic> {
        self.md_comics.as_ref()
    }

    /// Chapter number of the latest chapter, when one is attached.
    pub fn chapter_number(&self) -> Option<&str> {
        self.md_chapters.as_ref().and_then(|c| c.chap.as_deref())
    }
}

impl Comic {
    /// First cover image URL. A cover record without a key is treated as
    /// no cover at all.
    pub fn cover_url(&self) -> Option<String> {
        self.md_covers
            .first()
            .filter(|c| !c.b2key.is_empty())
            .map(|c| format!("https://meo.comick.pictures/{}", c.b2key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_follow_with_unknown_fields() {
        let raw = serde_json::json!({
            "type": 1,
            "created_at": "2024-01-01T00:00:00Z",
            "score": null,
            "md_comics": {
                "id": 42,
                "title": "Some Comic",
                "slug": "some-comic",
                "status": 1,
                "last_chapter": 104,
                "uploaded_at": "2024-05-01T12:00:00Z",
                "follow_count": 1234,
                "md_covers": [{"w": 600, "h": 900, "b2key": "abc.jpg"}]
            },
            "md_chapters": {"hid": "xyz", "chap": "104", "lang": "en", "vol": null}
        });

        let follow: Follow = serde_json::from_value(raw).unwrap();
        let comic = follow.comic().unwrap();
        assert_eq!(comic.id, Some(42));
        assert_eq!(comic.last_chapter, Some(LastChapter::Number(104.0)));
        assert_eq!(follow.chapter_number(), Some("104"));
        assert_eq!(
            comic.cover_url().as_deref(),
            Some("https://meo.comick.pictures/abc.jpg")
        );
    }

    #[test]
    fn tolerates_missing_comic_and_string_chapter() {
        let raw = serde_json::json!([
            {"type": 2},
            {"type": 1, "md_comics": {"id": 7, "last_chapter": "12.5"}}
        ]);

        let follows: Vec<Follow> = serde_json::from_value(raw).unwrap();
        assert!(follows[0].comic().is_none());
        assert_eq!(
            follows[1].comic().unwrap().last_chapter,
            Some(LastChapter::Text("12.5".to_string()))
        );
    }

    #[test]
    fn cover_without_key_is_treated_as_no_cover() {
        let raw = serde_json::json!({
            "type": 1,
            "md_comics": {
                "id": 5,
                "title": "Keyless",
                "md_covers": [{"w": 600, "h": 900}]
            }
        });

        let follow: Follow = serde_json::from_value(raw).unwrap();
        assert!(follow.comic().unwrap().cover_url().is_none());
    }

    #[test]
    fn last_chapter_display_drops_trailing_zero() {
        assert_eq!(LastChapter::Number(104.0).to_string(), "104");
        assert_eq!(LastChapter::Number(12.5).to_string(), "12.5");
        assert_eq!(LastChapter::Text("ost".into()).to_string(), "ost");
    }
}
