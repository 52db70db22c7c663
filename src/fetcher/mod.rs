pub mod http_fetcher;

use async_trait::async_trait;

use crate::domain::{Failure, FeedIdentity, Page};

pub use http_fetcher::HttpFetcher;

/// Fetches one page of a feed. Implementations hold no per-feed state, so a
/// single instance can serve any number of feeds concurrently.
#[async_trait]
pub trait PageFetcher {
    async fn fetch_page(&self, identity: &FeedIdentity, page: u32) -> Result<Page, Failure>;
}

/// Asks the server to re-ingest its sources before a user-initiated refresh.
#[async_trait]
pub trait CacheInvalidator {
    async fn invalidate(&self) -> Result<(), Failure>;
}
