use serde::{Deserialize, Serialize};

/// Categories the server ingests feeds for.
pub const KNOWN_CATEGORIES: &[&str] = &[
    "India",
    "Technology",
    "Sports",
    "Business",
    "Entertainment",
    "World",
    "Politics",
    "Health",
];

/// Sources the server ingests feeds from.
pub const KNOWN_SOURCES: &[&str] = &[
    "Times of India",
    "NDTV",
    "Indian Express",
    "Hindustan Times",
    "News18",
    "Zee News",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub preferred_categories: Vec<String>,
    #[serde(default)]
    pub preferred_sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl Profile {
    pub fn has_preferences(&self) -> bool {
        !self.preferred_categories.is_empty() || !self.preferred_sources.is_empty()
    }

    pub fn toggle_category(&mut self, category: &str) {
        toggle(&mut self.preferred_categories, category);
    }

    pub fn toggle_source(&mut self, source: &str) {
        toggle(&mut self.preferred_sources, source);
    }

    pub fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            preferred_categories: self.preferred_categories.clone(),
            preferred_sources: self.preferred_sources.clone(),
        }
    }
}

/// Body of `PUT /api/auth/profile/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    pub preferred_categories: Vec<String>,
    pub preferred_sources: Vec<String>,
}

fn toggle(values: &mut Vec<String>, value: &str) {
    if let Some(pos) = values.iter().position(|v| v == value) {
        values.remove(pos);
    } else {
        values.push(value.to_string());
    }
}
