use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::domain::{Article, Failure, FeedIdentity, Page};
use crate::fetcher::{CacheInvalidator, PageFetcher};

pub(crate) fn article(id: &str) -> Article {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": format!("Article {}", id),
        "summary": format!("Summary of {}", id),
        "source": "NDTV",
        "category": "India",
        "link": format!("https://example.com/{}", id),
        "published": "2024-05-01T10:00:00Z",
    }))
    .unwrap()
}

pub(crate) fn page(ids: &[&str], has_next: bool) -> Page {
    Page::new(ids.iter().map(|id| article(id)).collect(), has_next)
}

struct Scripted {
    result: Result<Page, Failure>,
    gate: Option<oneshot::Receiver<()>>,
}

/// Replays queued responses per `(identity, page)` and records every call.
#[derive(Default)]
pub(crate) struct ScriptedFetcher {
    responses: Mutex<HashMap<(FeedIdentity, u32), VecDeque<Scripted>>>,
    calls: Mutex<Vec<(FeedIdentity, u32)>>,
    invalidation: Mutex<Option<Failure>>,
    invalidations: Mutex<usize>,
}

impl ScriptedFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, identity: FeedIdentity, page: u32, result: Result<Page, Failure>) {
        self.push(identity, page, result, None);
    }

    /// Queue a response that is held back until the returned sender fires.
    pub(crate) fn respond_gated(
        &self,
        identity: FeedIdentity,
        page: u32,
        result: Result<Page, Failure>,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(identity, page, result, Some(rx));
        tx
    }

    pub(crate) fn fail_invalidation(&self, failure: Failure) {
        *self.invalidation.lock().unwrap() = Some(failure);
    }

    pub(crate) fn calls(&self) -> Vec<(FeedIdentity, u32)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn invalidations(&self) -> usize {
        *self.invalidations.lock().unwrap()
    }

    fn push(
        &self,
        identity: FeedIdentity,
        page: u32,
        result: Result<Page, Failure>,
        gate: Option<oneshot::Receiver<()>>,
    ) {
        self.responses
            .lock()
            .unwrap()
            .entry((identity, page))
            .or_default()
            .push_back(Scripted { result, gate });
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch_page(&self, identity: &FeedIdentity, page: u32) -> Result<Page, Failure> {
        self.calls.lock().unwrap().push((identity.clone(), page));
        let scripted = self
            .responses
            .lock()
            .unwrap()
            .get_mut(&(identity.clone(), page))
            .and_then(|queue| queue.pop_front());

        match scripted {
            Some(Scripted { result, gate }) => {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                result
            }
            None => Err(Failure::server(404, format!("no page {} of {}", page, identity))),
        }
    }
}

#[async_trait]
impl CacheInvalidator for ScriptedFetcher {
    async fn invalidate(&self) -> Result<(), Failure> {
        *self.invalidations.lock().unwrap() += 1;
        match self.invalidation.lock().unwrap().clone() {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }
}
