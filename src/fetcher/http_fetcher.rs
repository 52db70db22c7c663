use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::header::REFERER;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::{Result, ScoopError};
use crate::config::ApiSettings;
use crate::domain::{
    Article, Credentials, EndpointKind, Failure, FeedIdentity, Page, Profile, ProfileUpdate,
    SignupRequest, User,
};
use crate::fetcher::{CacheInvalidator, PageFetcher};
use crate::normalizer::{Normalizer, PageShape};
use crate::session::{cookie_value, CSRF_COOKIE};

pub const CSRF_HEADER: &str = "X-CSRFToken";

#[derive(Deserialize)]
struct UserEnvelope {
    user: Option<User>,
}

/// reqwest client for the news API. Holds the explicitly configured base URL
/// and the cookie jar carrying the session; otherwise stateless.
pub struct HttpFetcher {
    client: Client,
    base_url: Url,
    jar: Arc<Jar>,
    normalizer: Normalizer,
}

impl HttpFetcher {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        Self::with_jar(settings, Arc::new(Jar::default()))
    }

    pub fn with_jar(settings: &ApiSettings, jar: Arc<Jar>) -> Result<Self> {
        let base_url = normalize_base_url(&settings.base_url)?;
        let client = Client::builder()
            .timeout(settings.timeout())
            .gzip(true)
            .brotli(true)
            .user_agent(settings.user_agent.as_str())
            .cookie_provider(jar.clone())
            .build()?;

        Ok(Self {
            client,
            base_url,
            jar,
            normalizer: Normalizer::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn jar(&self) -> &Arc<Jar> {
        &self.jar
    }

    pub async fn article(&self, id: &str) -> std::result::Result<Article, Failure> {
        let url = self.endpoint_with_segments("api/news/", &[id])?;
        let body = self
            .execute(Method::GET, url, None::<&()>, "Failed to fetch article details")
            .await?;
        self.normalizer.decode(&body)
    }

    pub async fn refresh_news(&self) -> std::result::Result<(), Failure> {
        let url = self.endpoint("api/refresh-news/")?;
        self.execute(Method::POST, url, None::<&()>, "Failed to refresh news")
            .await?;
        Ok(())
    }

    /// The logged-in user, or `None` when the server answers 401.
    pub async fn auth_status(&self) -> std::result::Result<Option<User>, Failure> {
        let url = self.endpoint("api/auth/status/")?;
        match self
            .execute(Method::GET, url, None::<&()>, "Not authenticated")
            .await
        {
            Ok(body) => Ok(self.normalizer.decode::<UserEnvelope>(&body)?.user),
            Err(failure) if failure.is_unauthenticated() => Ok(None),
            Err(failure) => Err(failure),
        }
    }

    pub async fn login(&self, credentials: &Credentials) -> std::result::Result<User, Failure> {
        let url = self.endpoint("api/auth/login/")?;
        let body = self
            .execute(Method::POST, url, Some(credentials), "Login failed")
            .await?;
        self.expect_user(&body)
    }

    pub async fn signup(&self, request: &SignupRequest) -> std::result::Result<User, Failure> {
        let url = self.endpoint("api/auth/signup/")?;
        let body = self
            .execute(Method::POST, url, Some(request), "Signup failed")
            .await?;
        self.expect_user(&body)
    }

    pub async fn logout(&self) -> std::result::Result<(), Failure> {
        let url = self.endpoint("api/auth/logout/")?;
        self.execute(Method::POST, url, None::<&()>, "Logout failed")
            .await?;
        Ok(())
    }

    pub async fn profile(&self) -> std::result::Result<Profile, Failure> {
        let url = self.endpoint("api/auth/profile/")?;
        let body = self
            .execute(Method::GET, url, None::<&()>, "Failed to fetch profile")
            .await?;
        self.normalizer.decode(&body)
    }

    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> std::result::Result<Profile, Failure> {
        let url = self.endpoint("api/auth/profile/")?;
        let body = self
            .execute(Method::PUT, url, Some(update), "Failed to update profile")
            .await?;
        self.normalizer.decode(&body)
    }

    /// Request URL and accepted response shape for one page of a feed.
    pub fn page_request(
        &self,
        identity: &FeedIdentity,
        page: u32,
    ) -> std::result::Result<(Url, PageShape), Failure> {
        let (mut url, shape) = match (identity.kind, identity.filter.as_deref()) {
            (EndpointKind::Category, Some(name)) => (
                self.endpoint_with_segments("api/news/category/", &[name])?,
                PageShape::Envelope,
            ),
            (EndpointKind::Personalized, _) => (
                self.endpoint("api/news/for-you/")?,
                PageShape::EnvelopeOrList,
            ),
            _ => (self.endpoint("api/news/")?, PageShape::Envelope),
        };

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page", &page.to_string());
            if let (EndpointKind::Search, Some(term)) = (identity.kind, identity.filter.as_deref())
            {
                query.append_pair("search", term);
            }
        }

        Ok((url, shape))
    }

    fn expect_user(&self, body: &[u8]) -> std::result::Result<User, Failure> {
        self.normalizer
            .decode::<UserEnvelope>(body)?
            .user
            .ok_or_else(|| Failure::parse("Response did not include a user"))
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, Failure> {
        self.base_url
            .join(path)
            .map_err(|e| Failure::network(format!("Invalid request URL {}: {}", path, e)))
    }

    /// `path` followed by percent-encoded `segments` and a trailing slash.
    fn endpoint_with_segments(
        &self,
        path: &str,
        segments: &[&str],
    ) -> std::result::Result<Url, Failure> {
        let mut url = self.endpoint(path)?;
        url.path_segments_mut()
            .map_err(|_| Failure::network(format!("Invalid request URL {}", path)))?
            .pop_if_empty()
            .extend(segments)
            .push("");
        Ok(url)
    }

    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        fallback: &str,
    ) -> std::result::Result<Vec<u8>, Failure> {
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), url);
        if method != Method::GET && method != Method::HEAD {
            request = self.with_csrf(request);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Failure::network(format!("{}: {}", fallback, e)))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Failure::network(format!("{}: {}", fallback, e)))?;

        if status.is_success() {
            return Ok(bytes.to_vec());
        }

        let message = self
            .normalizer
            .error_message(&bytes)
            .unwrap_or_else(|| fallback.to_string());
        tracing::debug!("Request failed with {}: {}", status, message);

        if status == StatusCode::UNAUTHORIZED {
            Err(Failure::unauthenticated(message))
        } else {
            Err(Failure::server(status.as_u16(), message))
        }
    }

    fn with_csrf(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(REFERER, self.base_url.as_str());
        match cookie_value(&self.jar, &self.base_url, CSRF_COOKIE) {
            Some(token) => request.header(CSRF_HEADER, token),
            None => request,
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(
        &self,
        identity: &FeedIdentity,
        page: u32,
    ) -> std::result::Result<Page, Failure> {
        let fallback = match identity.kind {
            EndpointKind::Category => "Failed to fetch category news",
            EndpointKind::Personalized => "Failed to fetch personalized news",
            EndpointKind::All | EndpointKind::Search => "Failed to fetch news",
        };
        let (url, shape) = self.page_request(identity, page)?;
        let body = self.execute(Method::GET, url, None::<&()>, fallback).await?;
        self.normalizer.page(&body, shape)
    }
}

#[async_trait]
impl CacheInvalidator for HttpFetcher {
    async fn invalidate(&self) -> std::result::Result<(), Failure> {
        self.refresh_news().await
    }
}

/// Parse the configured base URL, keeping scheme/host/path and ensuring the
/// path ends in `/` so relative endpoint paths append instead of replacing.
pub fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())?;
    if url.cannot_be_a_base() {
        return Err(ScoopError::Other(format!("Not a usable base URL: {}", raw)));
    }
    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(base_url: &str) -> HttpFetcher {
        let settings = ApiSettings {
            base_url: base_url.to_string(),
            ..ApiSettings::default()
        };
        HttpFetcher::new(&settings).unwrap()
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://localhost:8000").unwrap().as_str(),
            "http://localhost:8000/"
        );
        assert_eq!(
            normalize_base_url("https://example.com/scoop?x=1").unwrap().as_str(),
            "https://example.com/scoop/"
        );
        assert!(normalize_base_url("mailto:news@example.com").is_err());
        assert!(normalize_base_url("not a url").is_err());
    }

    #[test]
    fn test_page_request_all_and_search() {
        let fetcher = fetcher("http://localhost:8000");

        let (url, shape) = fetcher.page_request(&FeedIdentity::all(), 1).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/news/?page=1");
        assert_eq!(shape, PageShape::Envelope);

        let (url, _) = fetcher
            .page_request(&FeedIdentity::search("rain & flood"), 3)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/news/?page=3&search=rain+%26+flood"
        );
    }

    #[test]
    fn test_page_request_category_encodes_name() {
        let fetcher = fetcher("https://example.com/prefix");
        let (url, _) = fetcher
            .page_request(&FeedIdentity::category("Science/Tech"), 2)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/prefix/api/news/category/Science%2FTech/?page=2"
        );
    }

    #[test]
    fn test_page_request_personalized_accepts_bare_list() {
        let fetcher = fetcher("http://localhost:8000");
        let (url, shape) = fetcher
            .page_request(&FeedIdentity::personalized(), 1)
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/news/for-you/?page=1");
        assert_eq!(shape, PageShape::EnvelopeOrList);
    }
}
