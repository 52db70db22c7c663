//! Session cookie persistence.
//!
//! The server authenticates with a Django session cookie and expects the
//! `csrftoken` cookie echoed back as a header. Both live in the HTTP
//! client's cookie jar; this module copies them to and from
//! `~/.local/share/scoop/session.json` so separate CLI runs share a login.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use reqwest::cookie::{CookieStore, Jar};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::context::data_dir;
use crate::app::Result;

pub const CSRF_COOKIE: &str = "csrftoken";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSession {
    pub base_url: String,
    pub username: Option<String>,
    /// `name=value` pairs as sent in the `Cookie` header.
    pub cookies: Vec<String>,
    pub saved_at: DateTime<Utc>,
}

impl SavedSession {
    /// Snapshot whatever the jar would send to `base_url`.
    pub fn capture(jar: &Jar, base_url: &Url, username: Option<String>) -> Self {
        Self {
            base_url: base_url.to_string(),
            username,
            cookies: cookie_pairs(jar, base_url),
            saved_at: Utc::now(),
        }
    }

    /// Put the saved cookies back into `jar`. Cookies saved for a different
    /// server are ignored.
    pub fn restore(&self, jar: &Jar, base_url: &Url) -> bool {
        if self.base_url != base_url.as_str() {
            tracing::debug!(
                "Ignoring session for {} (current server is {})",
                self.base_url,
                base_url
            );
            return false;
        }
        for pair in &self.cookies {
            jar.add_cookie_str(&format!("{}; Path=/", pair), base_url);
        }
        true
    }
}

pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn at_default_path() -> Result<Self> {
        Ok(Self::new(data_dir()?.join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<SavedSession>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn save(&self, session: &SavedSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;

        // `mode` only applies on creation; tighten files left by older runs.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(serde_json::to_string_pretty(session)?.as_bytes())?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn cookie_pairs(jar: &Jar, url: &Url) -> Vec<String> {
    let Some(header) = jar.cookies(url) else {
        return Vec::new();
    };
    header
        .to_str()
        .map(|value| {
            value
                .split(';')
                .map(str::trim)
                .filter(|pair| pair.contains('='))
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Value of the named cookie the jar would send to `url`.
pub fn cookie_value(jar: &Jar, url: &Url, name: &str) -> Option<String> {
    cookie_pairs(jar, url).into_iter().find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}
