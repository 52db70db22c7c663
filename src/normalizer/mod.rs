use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{Article, Failure, Page};

/// Which response shapes a paginated endpoint is allowed to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageShape {
    /// `{"results": [...], "next": url-or-null}` only.
    Envelope,
    /// The envelope, or a bare `[...]` list of articles (single page).
    EnvelopeOrList,
}

#[derive(Deserialize)]
struct Envelope {
    results: Vec<Article>,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    detail: Option<String>,
}

/// Turns raw response bodies into domain values. Every decode either
/// produces the expected shape or a `Parse` failure; nothing is guessed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn page(&self, body: &[u8], shape: PageShape) -> Result<Page, Failure> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| Failure::parse(format!("Malformed response body: {}", e)))?;

        let is_envelope = matches!(&value, Value::Object(map) if map.contains_key("results"));
        if is_envelope {
            let envelope: Envelope = serde_json::from_value(value)
                .map_err(|e| Failure::parse(format!("Malformed page: {}", e)))?;
            let has_next = envelope.next.is_some_and(|next| !next.is_empty());
            return Ok(Page::new(envelope.results, has_next));
        }

        if value.is_array() && shape == PageShape::EnvelopeOrList {
            let items: Vec<Article> = serde_json::from_value(value)
                .map_err(|e| Failure::parse(format!("Malformed article list: {}", e)))?;
            return Ok(Page::last(items));
        }

        Err(Failure::parse("Unexpected response shape for a news page"))
    }

    pub fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, Failure> {
        serde_json::from_slice(body)
            .map_err(|e| Failure::parse(format!("Malformed response body: {}", e)))
    }

    /// Message from an error body (`{"error": ...}` or DRF's `{"detail": ...}`).
    pub fn error_message(&self, body: &[u8]) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
        parsed
            .error
            .or(parsed.detail)
            .filter(|message| !message.trim().is_empty())
    }
}
