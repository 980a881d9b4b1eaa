use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;

use crate::fetch::FetchError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaType {
    Image,
    Video,
    Other(String),
}

impl MediaType {
    pub fn as_str(&self) -> &str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Other(other) => other,
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, MediaType::Video)
    }
}

impl Default for MediaType {
    fn default() -> Self {
        MediaType::Other(String::new())
    }
}

impl From<String> for MediaType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "image" => MediaType::Image,
            "video" => MediaType::Video,
            _ => MediaType::Other(value),
        }
    }
}

impl From<MediaType> for String {
    fn from(value: MediaType) -> Self {
        value.as_str().to_string()
    }
}

/// One entry of the fetched collection. Every field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MediaRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub media_type: MediaType,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub hdurl: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl MediaRecord {
    /// Builds a record from one JSON object. Fields that are missing or not
    /// strings are treated as absent.
    pub fn from_value(value: &Value) -> Self {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .map(|s| s.to_string())
        };
        let media_type = value
            .get("media_type")
            .and_then(Value::as_str)
            .map(|kind| MediaType::from(kind.to_string()))
            .unwrap_or_default();
        Self {
            title: field("title"),
            date: field("date"),
            explanation: field("explanation"),
            media_type,
            url: field("url"),
            hdurl: field("hdurl"),
            thumbnail_url: field("thumbnail_url"),
        }
    }

    pub fn is_video(&self) -> bool {
        self.media_type.is_video()
    }
}

/// Elements of the render surface that can hold keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    Trigger,
    Card(usize),
    Close,
}

/// Where a primary-pointer activation landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Trigger,
    Card(usize),
    Close,
    Backdrop,
    OverlayRoot,
    Window,
    Elsewhere,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Fetcher: Send + Sync {
    fn get(&self, url: &str) -> impl Future<Output = Result<FetchResponse, FetchError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lenient_record_parsing_ignores_non_string_fields() {
        let record = MediaRecord::from_value(&json!({
            "title": 42,
            "date": "2024-06-03",
            "media_type": "video",
            "url": "https://youtu.be/abc"
        }));
        assert_eq!(record.title, None);
        assert_eq!(record.date.as_deref(), Some("2024-06-03"));
        assert!(record.is_video());
        assert_eq!(record.hdurl, None);
    }

    #[test]
    fn media_type_keeps_unknown_values() {
        let record: MediaRecord =
            serde_json::from_value(json!({"media_type": "other"})).unwrap();
        assert_eq!(record.media_type, MediaType::Other("other".into()));
        assert_eq!(record.media_type.as_str(), "other");
    }

    #[test]
    fn success_status_range() {
        let ok = FetchResponse {
            status: 204,
            body: String::new(),
        };
        let bad = FetchResponse {
            status: 500,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!bad.is_success());
    }
}
