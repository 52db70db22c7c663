use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::Failure;

#[derive(Error, Debug)]
pub enum ScoopError {
    #[error("{0}")]
    Api(#[from] Failure),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file error: {0}")]
    Session(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ScoopError>;
