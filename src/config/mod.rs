//! Configuration management for scoop.
//!
//! Configuration is read from `~/.config/scoop/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

pub mod colors;
pub mod keybindings;

pub use colors::ColorConfig;
pub use keybindings::KeybindingConfig;

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::KNOWN_CATEGORIES;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiSettings,
    pub feeds: FeedSettings,
    pub colors: ColorConfig,
    pub keybindings: KeybindingConfig,
}

/// How to reach the news API. Passed explicitly to the HTTP client.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 10,
            user_agent: concat!("scoop/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    /// Category tabs shown between "All" and "For You".
    pub categories: Vec<String>,
    /// Start loading the next page when the selection is this close to the end.
    pub load_more_threshold: usize,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            categories: KNOWN_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            load_more_threshold: 5,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// Missing fields in the config file use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source: e,
        })
    }

    /// `~/.config/scoop/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("scoop").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::write(path, Self::default_config_content()).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn default_config_content() -> &'static str {
        r##"# scoop configuration
#
# Colors can be named (Black, Red, Green, Yellow, Blue, Magenta, Cyan, Gray,
# DarkGray, LightRed, LightGreen, LightYellow, LightBlue, LightMagenta,
# LightCyan, White, Reset) or hex ("#RRGGBB" / "#RGB").
#
# Keys can be single characters ("a", "/"), special keys (Enter, Tab, BackTab,
# Backspace, Delete, Home, End, PageUp, PageDown, Up, Down, Left, Right, Esc,
# Space, F1-F12) or combinations ("Ctrl+c", "Shift+Tab").

[api]
# DailyScoop server; can be overridden with --base-url or SCOOP_BASE_URL
base_url = "http://localhost:8000"
# Request timeout in seconds
timeout_secs = 10

[feeds]
# Category tabs, shown between "All" and "For You"
categories = ["India", "Technology", "Sports", "Business", "Entertainment", "World", "Politics", "Health"]
# Fetch the next page when the selection is this many articles from the end
load_more_threshold = 5

[colors]
active_border = "Cyan"
inactive_border = "DarkGray"
selection_bg = "Cyan"
selection_fg = "Black"
tab_active = "Yellow"
tab_inactive = "Gray"
metadata_source = "Green"
metadata_date = "Yellow"
metadata_link = "Blue"
ai_summary = "LightMagenta"
error = "LightRed"
status_fg = "White"
status_bg = "DarkGray"

[keybindings]
quit = ["q", "Ctrl+c"]
move_up = ["k", "Up"]
move_down = ["j", "Down"]
next_page = ["n", "PageDown"]
prev_page = ["p", "PageUp"]
next_tab = ["Tab", "l", "Right"]
prev_tab = ["BackTab", "Shift+Tab", "h", "Left"]
select = ["Enter"]
open_in_browser = ["o"]
refresh = ["R"]
search = ["/"]
toggle_maximize = ["m"]
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn test_default_config_deserializes() {
        let config: Config = toml::from_str(Config::default_config_content())
            .expect("Default config should be valid TOML");

        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.feeds.categories.len(), KNOWN_CATEGORIES.len());
        assert_eq!(config.colors.active_border, Color::Cyan);
        assert_eq!(config.keybindings.search, vec!["/"]);
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[api]
base_url = "https://news.example.com"

[colors]
error = "#FF0000"
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.api.base_url, "https://news.example.com");
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
        assert_eq!(config.colors.error, Color::Rgb(255, 0, 0));
        assert_eq!(config.colors.inactive_border, Color::DarkGray);
        assert_eq!(config.feeds.load_more_threshold, 5);
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.keybindings.quit, vec!["q", "Ctrl+c"]);
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scoop").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.feeds.load_more_threshold, 5);

        fs::write(&path, "[feeds]\ncategories = [\"World\"]\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.feeds.categories, vec!["World"]);
    }

    #[test]
    fn test_load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api\nbase_url = 1").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
