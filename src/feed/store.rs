use thiserror::Error;

use crate::domain::{Article, Failure, FeedIdentity, Page};

/// Client-held state of one feed during one identity epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedState {
    pub identity: FeedIdentity,
    pub items: Vec<Article>,
    pub next_page: u32,
    pub has_more: bool,
    pub is_loading_initial: bool,
    pub is_loading_more: bool,
    pub last_error: Option<Failure>,
}

impl FeedState {
    pub fn new(identity: FeedIdentity) -> Self {
        Self {
            identity,
            items: Vec::new(),
            next_page: 1,
            has_more: true,
            is_loading_initial: false,
            is_loading_more: false,
            last_error: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading_initial || self.is_loading_more
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    Initial,
    Incremental,
}

/// Tag carried by an in-flight fetch. A result is only applied while its
/// ticket still describes the load the store is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub epoch: u64,
    pub identity: FeedIdentity,
    pub page: u32,
    pub kind: LoadKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoadRefused {
    #[error("a load is already in flight")]
    AlreadyLoading,
    #[error("the feed already has items")]
    NotEmpty,
    #[error("the first page has not been loaded yet")]
    NotStarted,
    #[error("no more pages")]
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    Stale,
}

/// Owns one `FeedState`. Every mutation goes through here; fetches are
/// issued elsewhere and report back with the ticket they were given.
#[derive(Debug)]
pub struct FeedStore {
    state: FeedState,
    epoch: u64,
}

impl FeedStore {
    pub fn new(identity: FeedIdentity) -> Self {
        Self {
            state: FeedState::new(identity),
            epoch: 0,
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn identity(&self) -> &FeedIdentity {
        &self.state.identity
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Start a new epoch. The old state is replaced wholesale, and every
    /// ticket handed out before this call becomes stale.
    pub fn reset(&mut self, identity: FeedIdentity) {
        self.epoch += 1;
        self.state = FeedState::new(identity);
    }

    pub fn begin_initial_load(&mut self) -> Result<LoadTicket, LoadRefused> {
        if self.state.is_loading() {
            return Err(LoadRefused::AlreadyLoading);
        }
        if !self.state.items.is_empty() {
            return Err(LoadRefused::NotEmpty);
        }
        self.state.is_loading_initial = true;
        Ok(self.ticket(LoadKind::Initial))
    }

    pub fn begin_incremental_load(&mut self) -> Result<LoadTicket, LoadRefused> {
        if self.state.is_loading() {
            return Err(LoadRefused::AlreadyLoading);
        }
        if !self.state.has_more {
            return Err(LoadRefused::Exhausted);
        }
        if self.state.next_page <= 1 {
            return Err(LoadRefused::NotStarted);
        }
        self.state.is_loading_more = true;
        Ok(self.ticket(LoadKind::Incremental))
    }

    pub fn apply_page(&mut self, ticket: &LoadTicket, page: Page) -> Applied {
        if !self.is_current(ticket) {
            return Applied::Stale;
        }

        match ticket.kind {
            LoadKind::Initial => self.state.items = page.items,
            LoadKind::Incremental => self.state.items.extend(page.items),
        }
        // Terminal within the epoch: only a reset brings it back.
        self.state.has_more = self.state.has_more && page.has_next;
        self.state.next_page += 1;
        self.state.is_loading_initial = false;
        self.state.is_loading_more = false;
        self.state.last_error = None;
        Applied::Applied
    }

    pub fn apply_failure(&mut self, ticket: &LoadTicket, failure: Failure) -> Applied {
        if !self.is_current(ticket) {
            return Applied::Stale;
        }

        if ticket.kind == LoadKind::Incremental {
            self.state.has_more = false;
        }
        self.state.is_loading_initial = false;
        self.state.is_loading_more = false;
        self.state.last_error = Some(failure);
        Applied::Applied
    }

    fn ticket(&self, kind: LoadKind) -> LoadTicket {
        LoadTicket {
            epoch: self.epoch,
            identity: self.state.identity.clone(),
            page: self.state.next_page,
            kind,
        }
    }

    fn is_current(&self, ticket: &LoadTicket) -> bool {
        let awaiting = match ticket.kind {
            LoadKind::Initial => self.state.is_loading_initial,
            LoadKind::Incremental => self.state.is_loading_more,
        };
        awaiting
            && ticket.epoch == self.epoch
            && ticket.identity == self.state.identity
            && ticket.page == self.state.next_page
    }
}
