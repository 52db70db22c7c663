use std::path::PathBuf;
use std::sync::Arc;

use reqwest::cookie::Jar;

use crate::app::error::{Result, ScoopError};
use crate::config::Config;
use crate::feed::FeedController;
use crate::fetcher::HttpFetcher;
use crate::session::{SavedSession, SessionFile};

pub struct AppContext {
    pub config: Config,
    pub api: Arc<HttpFetcher>,
    pub session: SessionFile,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        Self::with_session_file(config, SessionFile::at_default_path()?)
    }

    /// Build the API client and put any saved login back into its cookie jar.
    pub fn with_session_file(config: Config, session: SessionFile) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let api = HttpFetcher::with_jar(&config.api, jar.clone())?;

        match session.load() {
            Ok(Some(saved)) => {
                if saved.restore(&jar, api.base_url()) {
                    tracing::debug!("Restored session from {}", session.path().display());
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(
                "Ignoring unreadable session file {}: {}",
                session.path().display(),
                e
            ),
        }

        Ok(Self {
            config,
            api: Arc::new(api),
            session,
        })
    }

    /// A controller fetching through the shared client. Refreshes ask the
    /// server to re-ingest its sources first.
    pub fn feed_controller(&self) -> FeedController {
        FeedController::new(self.api.clone()).with_invalidator(self.api.clone())
    }

    pub fn save_session(&self, username: Option<String>) -> Result<()> {
        let saved = SavedSession::capture(self.api.jar(), self.api.base_url(), username);
        self.session.save(&saved)
    }

    pub fn clear_session(&self) -> Result<()> {
        self.session.clear()
    }

    /// Username recorded with the saved session, if any.
    pub fn saved_username(&self) -> Option<String> {
        self.session.load().ok().flatten().and_then(|s| s.username)
    }
}

/// `~/.local/share/scoop`, created on first use. Holds the session and the
/// TUI log.
pub fn data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| ScoopError::Other("Could not find data directory".into()))?;
    let scoop_dir = data_dir.join("scoop");
    std::fs::create_dir_all(&scoop_dir)?;
    Ok(scoop_dir)
}
