use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

use crate::domain::{Failure, FeedIdentity, Page};
use crate::feed::store::{Applied, FeedState, FeedStore, LoadKind, LoadRefused, LoadTicket};
use crate::feed::view::FeedView;
use crate::fetcher::{CacheInvalidator, PageFetcher};

/// Notifications for whoever renders the feed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Reset {
        identity: FeedIdentity,
    },
    PageApplied {
        identity: FeedIdentity,
        page: u32,
        added: usize,
        has_more: bool,
    },
    LoadFailed {
        identity: FeedIdentity,
        kind: LoadKind,
        failure: Failure,
    },
    StaleDropped {
        identity: FeedIdentity,
        page: u32,
    },
}

/// A finished fetch, still tagged with the ticket it was issued under.
#[derive(Debug)]
pub struct LoadOutcome {
    pub ticket: LoadTicket,
    pub result: Result<Page, Failure>,
}

/// Drives one feed: resets on identity changes and refreshes, starts page
/// fetches as background tasks, and feeds their outcomes back into the store.
///
/// The controller and its store live on a single task. Fetches report back
/// over a channel and are applied by `poll` or `settle`.
pub struct FeedController {
    store: FeedStore,
    fetcher: Arc<dyn PageFetcher + Send + Sync>,
    invalidator: Option<Arc<dyn CacheInvalidator + Send + Sync>>,
    outcome_tx: mpsc::UnboundedSender<LoadOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<LoadOutcome>,
    events: Option<mpsc::UnboundedSender<FeedEvent>>,
    in_flight: Option<(LoadTicket, JoinHandle<()>)>,
    observed: bool,
}

impl FeedController {
    pub fn new(fetcher: Arc<dyn PageFetcher + Send + Sync>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            store: FeedStore::new(FeedIdentity::default()),
            fetcher,
            invalidator: None,
            outcome_tx,
            outcome_rx,
            events: None,
            in_flight: None,
            observed: false,
        }
    }

    pub fn with_invalidator(mut self, invalidator: Arc<dyn CacheInvalidator + Send + Sync>) -> Self {
        self.invalidator = Some(invalidator);
        self
    }

    /// Receive `FeedEvent`s from now on. A later call replaces the earlier
    /// subscriber.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<FeedEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    pub fn state(&self) -> &FeedState {
        self.store.state()
    }

    pub fn identity(&self) -> &FeedIdentity {
        self.store.identity()
    }

    pub fn view(&self) -> FeedView<'_> {
        FeedView::of(self.store.state())
    }

    /// The load currently waited for, if any.
    pub fn in_flight(&self) -> Option<&LoadTicket> {
        self.in_flight.as_ref().map(|(ticket, _)| ticket)
    }

    /// Follow `identity`. The first call and every change start a new epoch
    /// and load page 1; repeating the current identity does nothing.
    pub fn observe(&mut self, identity: FeedIdentity) -> bool {
        if self.observed && &identity == self.store.identity() {
            return false;
        }
        self.reset(identity);
        true
    }

    /// Discard everything and load page 1 of `identity`.
    pub fn reset(&mut self, identity: FeedIdentity) {
        self.restart(identity, false);
    }

    /// Reload the current feed from page 1, asking the server to refresh its
    /// sources first when an invalidator is configured.
    pub fn refresh(&mut self) {
        let identity = self.store.identity().clone();
        self.restart(identity, true);
    }

    /// Fetch the next page. Refused while another load is running, before the
    /// first page arrived, or once the feed is exhausted.
    pub fn load_more(&mut self) -> Result<(), LoadRefused> {
        let ticket = self.store.begin_incremental_load()?;
        self.spawn(ticket, false);
        Ok(())
    }

    /// Apply every outcome that has already arrived, without waiting.
    pub fn poll(&mut self) -> usize {
        // Checked before draining: a task queues its outcome before it exits.
        let finished = self
            .in_flight
            .as_ref()
            .is_some_and(|(_, handle)| handle.is_finished());

        let mut applied = 0;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            if self.apply(outcome) == Applied::Applied {
                applied += 1;
            }
        }

        if finished {
            if let Some((ticket, _)) = self.in_flight.take() {
                if self.abandon(ticket, "task exited without a result".to_string())
                    == Applied::Applied
                {
                    applied += 1;
                }
            }
        }
        applied
    }

    /// Wait until no load is in flight, applying outcomes as they arrive.
    pub async fn settle(&mut self) {
        while self.store.state().is_loading() {
            let woke = match self.in_flight.as_mut() {
                Some((_, handle)) => tokio::select! {
                    biased;
                    outcome = self.outcome_rx.recv() => Woke::Outcome(outcome),
                    joined = handle => Woke::Exited(joined),
                },
                None => Woke::Outcome(self.outcome_rx.recv().await),
            };

            match woke {
                Woke::Outcome(Some(outcome)) => {
                    self.apply(outcome);
                }
                Woke::Outcome(None) => break,
                Woke::Exited(joined) => {
                    let Some((ticket, _)) = self.in_flight.take() else {
                        continue;
                    };
                    // A clean exit has already queued its outcome.
                    if let Err(err) = joined {
                        self.abandon(ticket, err.to_string());
                    }
                }
            }
        }
    }

    /// Fail `ticket` on behalf of a fetch task that died before reporting.
    fn abandon(&mut self, ticket: LoadTicket, reason: String) -> Applied {
        warn!(
            "Fetch of page {} of {} stopped: {}",
            ticket.page, ticket.identity, reason
        );
        self.apply(LoadOutcome {
            ticket,
            result: Err(Failure::network(format!("Loading stopped: {}", reason))),
        })
    }

    pub fn apply(&mut self, outcome: LoadOutcome) -> Applied {
        let LoadOutcome { ticket, result } = outcome;

        let applied = match result {
            Ok(page) => {
                let added = page.items.len();
                let applied = self.store.apply_page(&ticket, page);
                if applied == Applied::Applied {
                    let has_more = self.store.state().has_more;
                    info!(
                        "Loaded page {} of {} ({} articles, more: {})",
                        ticket.page, ticket.identity, added, has_more
                    );
                    self.emit(FeedEvent::PageApplied {
                        identity: ticket.identity.clone(),
                        page: ticket.page,
                        added,
                        has_more,
                    });
                }
                applied
            }
            Err(failure) => {
                let applied = self.store.apply_failure(&ticket, failure.clone());
                if applied == Applied::Applied {
                    match ticket.kind {
                        LoadKind::Initial => {
                            warn!("Loading {} failed: {}", ticket.identity, failure)
                        }
                        LoadKind::Incremental => warn!(
                            "Loading page {} of {} failed, no further pages will be requested: {}",
                            ticket.page, ticket.identity, failure
                        ),
                    }
                    self.emit(FeedEvent::LoadFailed {
                        identity: ticket.identity.clone(),
                        kind: ticket.kind,
                        failure,
                    });
                }
                applied
            }
        };

        match applied {
            Applied::Applied => self.in_flight = None,
            Applied::Stale => {
                debug!(
                    "Dropping stale result for page {} of {}",
                    ticket.page, ticket.identity
                );
                self.emit(FeedEvent::StaleDropped {
                    identity: ticket.identity,
                    page: ticket.page,
                });
            }
        }
        applied
    }

    fn restart(&mut self, identity: FeedIdentity, invalidate: bool) {
        self.observed = true;
        if let Some((ticket, handle)) = self.in_flight.take() {
            debug!("Abandoning page {} of {}", ticket.page, ticket.identity);
            handle.abort();
        }

        self.store.reset(identity.clone());
        self.emit(FeedEvent::Reset { identity });

        match self.store.begin_initial_load() {
            Ok(ticket) => self.spawn(ticket, invalidate),
            Err(refused) => debug!("Initial load not started: {}", refused),
        }
    }

    fn spawn(&mut self, ticket: LoadTicket, invalidate: bool) {
        let fetcher = self.fetcher.clone();
        let invalidator = if invalidate {
            self.invalidator.clone()
        } else {
            None
        };
        let tx = self.outcome_tx.clone();
        let task_ticket = ticket.clone();

        let handle = tokio::spawn(async move {
            let result = async {
                if let Some(invalidator) = invalidator {
                    invalidator.invalidate().await?;
                }
                fetcher
                    .fetch_page(&task_ticket.identity, task_ticket.page)
                    .await
            }
            .await;

            // The receiver lives as long as the controller.
            let _ = tx.send(LoadOutcome {
                ticket: task_ticket,
                result,
            });
        });

        self.in_flight = Some((ticket, handle));
    }

    fn emit(&self, event: FeedEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }
}

enum Woke {
    Outcome(Option<LoadOutcome>),
    Exited(Result<(), JoinError>),
}
