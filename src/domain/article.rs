use chrono::{DateTime, NaiveDateTime, Utc};
use html_escape::decode_html_entities;
use serde::{Deserialize, Deserializer, Serialize};

/// A news article as served by `/api/news/`.
///
/// Field names follow the server serializer; `published` and
/// `gemini_summary` are renamed to read naturally on the Rust side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub author: Option<String>,
    #[serde(rename = "published", default, deserialize_with = "lenient_datetime")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub image_url: Option<String>,
    pub link: String,
    #[serde(
        rename = "gemini_summary",
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub ai_summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Article {
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }

    /// Summary with HTML entities from the upstream RSS decoded.
    pub fn display_summary(&self) -> String {
        decode_html_entities(&self.summary).to_string()
    }

    /// "Source · Author" line shown under the title.
    pub fn byline(&self) -> String {
        match (&self.author, self.source.is_empty()) {
            (Some(author), false) => format!("{} · {}", self.source, author),
            (Some(author), true) => author.clone(),
            (None, false) => self.source.clone(),
            (None, true) => String::new(),
        }
    }

    /// Publication time, falling back to when the server ingested the article.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.published_at.or(self.created_at)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Accepts RFC 3339 timestamps and the offset-less form Django emits when
/// timezone support is off (read as UTC).
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_timestamp(&raw)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Article {
        serde_json::from_str(
            r#"{
                "id": "a1",
                "title": "Monsoon arrives early",
                "summary": "Rains &amp; winds",
                "link": "https://example.com/a1",
                "source": "NDTV",
                "category": "India",
                "published": "2024-06-01T08:30:00Z",
                "image_url": "",
                "author": "Staff",
                "tags": ["weather"],
                "created_at": "2024-06-01T09:00:00"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_deserialize_server_field_names() {
        let article = sample();
        assert_eq!(article.id, "a1");
        assert_eq!(
            article.published_at,
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap())
        );
        assert_eq!(
            article.created_at,
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap())
        );
        assert_eq!(article.image_url, None);
        assert_eq!(article.ai_summary, None);
        assert_eq!(article.tags, vec!["weather"]);
    }

    #[test]
    fn test_missing_optional_fields() {
        let article: Article = serde_json::from_str(
            r#"{"id": "x", "title": "", "link": "https://example.com/x", "published": null, "summary": null}"#,
        )
        .unwrap();
        assert_eq!(article.summary, "");
        assert!(article.tags.is_empty());
        assert_eq!(article.published_at, None);
        assert_eq!(article.display_title(), "(Untitled)");
    }

    #[test]
    fn test_invalid_timestamp_rejected() {
        let result: Result<Article, _> = serde_json::from_str(
            r#"{"id": "x", "title": "t", "link": "l", "published": "yesterday"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_gemini_summary_maps_to_ai_summary() {
        let article: Article = serde_json::from_str(
            r#"{"id": "x", "title": "t", "link": "l", "gemini_summary": "Short take."}"#,
        )
        .unwrap();
        assert_eq!(article.ai_summary.as_deref(), Some("Short take."));
    }

    #[test]
    fn test_display_summary_decodes_entities() {
        assert_eq!(sample().display_summary(), "Rains & winds");
    }

    #[test]
    fn test_byline() {
        let mut article = sample();
        assert_eq!(article.byline(), "NDTV · Staff");
        article.author = None;
        assert_eq!(article.byline(), "NDTV");
        article.source.clear();
        assert_eq!(article.byline(), "");
    }

    #[test]
    fn test_timestamp_falls_back_to_created_at() {
        let mut article = sample();
        article.published_at = None;
        assert_eq!(article.timestamp(), article.created_at);
    }
}
