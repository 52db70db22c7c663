use ratatui::widgets::ListState;

use crate::domain::{Article, EndpointKind, Failure, FeedIdentity};
use crate::feed::{FeedEvent, LoadKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    Articles,
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

pub const PAGE_SIZE: usize = 10;

/// Article detail fetched on demand; carries the AI summary the list omits.
#[derive(Debug, Clone, PartialEq)]
pub enum Detail {
    Loading(String),
    Loaded(Article),
    Failed(String, Failure),
}

impl Detail {
    pub fn article_id(&self) -> &str {
        match self {
            Detail::Loading(id) | Detail::Failed(id, _) => id,
            Detail::Loaded(article) => &article.id,
        }
    }
}

pub struct TuiApp {
    /// All, one tab per configured category, then For You.
    pub tabs: Vec<FeedIdentity>,
    pub tab_index: usize,
    /// An active search replaces the current tab's feed until the tab changes.
    pub search: Option<FeedIdentity>,
    pub input_mode: InputMode,
    pub search_input: String,
    pub active_pane: ActivePane,
    pub item_index: usize,
    pub list_state: ListState,
    pub preview_scroll: u16,
    pub maximized: bool,
    pub should_quit: bool,
    pub status_message: Option<String>,
    pub detail: Option<Detail>,
    load_more_threshold: usize,
}

impl TuiApp {
    pub fn new(categories: &[String], load_more_threshold: usize) -> Self {
        let mut tabs = vec![FeedIdentity::all()];
        tabs.extend(categories.iter().map(FeedIdentity::category));
        tabs.push(FeedIdentity::personalized());

        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            tabs,
            tab_index: 0,
            search: None,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            active_pane: ActivePane::Articles,
            item_index: 0,
            list_state,
            preview_scroll: 0,
            maximized: false,
            should_quit: false,
            status_message: None,
            detail: None,
            load_more_threshold,
        }
    }

    /// The feed the list should be showing right now.
    pub fn current_identity(&self) -> FeedIdentity {
        match &self.search {
            Some(search) => search.clone(),
            None => self.tabs[self.tab_index].clone(),
        }
    }

    pub fn tab_titles(&self) -> Vec<String> {
        self.tabs
            .iter()
            .map(|identity| match identity.kind {
                EndpointKind::All => "All".to_string(),
                _ => identity.label(),
            })
            .collect()
    }

    pub fn next_tab(&mut self) {
        self.tab_index = (self.tab_index + 1) % self.tabs.len();
        self.search = None;
    }

    pub fn prev_tab(&mut self) {
        self.tab_index = (self.tab_index + self.tabs.len() - 1) % self.tabs.len();
        self.search = None;
    }

    pub fn begin_search(&mut self) {
        self.input_mode = InputMode::Search;
        self.search_input.clear();
    }

    pub fn cancel_search(&mut self) {
        self.input_mode = InputMode::Normal;
        self.search_input.clear();
    }

    /// Leave search input. A blank query clears the search and goes back to
    /// the current tab.
    pub fn submit_search(&mut self) -> FeedIdentity {
        self.input_mode = InputMode::Normal;
        let identity = FeedIdentity::search(self.search_input.as_str());
        self.search = (identity != FeedIdentity::all()).then_some(identity);
        self.search_input.clear();
        self.current_identity()
    }

    pub fn move_up(&mut self) {
        match self.active_pane {
            ActivePane::Articles => {
                if self.item_index > 0 {
                    self.select(self.item_index - 1);
                }
            }
            ActivePane::Preview => {
                self.preview_scroll = self.preview_scroll.saturating_sub(1);
            }
        }
    }

    pub fn move_down(&mut self, len: usize) {
        match self.active_pane {
            ActivePane::Articles => {
                if len > 0 && self.item_index < len - 1 {
                    self.select(self.item_index + 1);
                }
            }
            ActivePane::Preview => {
                self.preview_scroll = self.preview_scroll.saturating_add(1);
            }
        }
    }

    pub fn next_page(&mut self, len: usize) {
        match self.active_pane {
            ActivePane::Articles => {
                let new_index = (self.item_index + PAGE_SIZE).min(len.saturating_sub(1));
                if new_index != self.item_index {
                    self.select(new_index);
                }
            }
            ActivePane::Preview => {
                self.preview_scroll = self.preview_scroll.saturating_add(PAGE_SIZE as u16);
            }
        }
    }

    pub fn prev_page(&mut self) {
        match self.active_pane {
            ActivePane::Articles => {
                let new_index = self.item_index.saturating_sub(PAGE_SIZE);
                if new_index != self.item_index {
                    self.select(new_index);
                }
            }
            ActivePane::Preview => {
                self.preview_scroll = self.preview_scroll.saturating_sub(PAGE_SIZE as u16);
            }
        }
    }

    pub fn toggle_maximize(&mut self) {
        self.maximized = !self.maximized;
        self.active_pane = if self.maximized {
            ActivePane::Preview
        } else {
            ActivePane::Articles
        };
    }

    /// True when the selection is close enough to the end of `len` loaded
    /// articles that the next page should be requested.
    pub fn should_load_more(&self, len: usize, has_more: bool) -> bool {
        has_more && len > 0 && self.item_index + self.load_more_threshold >= len
    }

    pub fn on_feed_event(&mut self, event: &FeedEvent) {
        match event {
            FeedEvent::Reset { .. } => {
                self.select(0);
                self.detail = None;
            }
            FeedEvent::LoadFailed {
                kind: LoadKind::Incremental,
                failure,
                ..
            } => {
                self.set_status(format!("Could not load more articles: {}", failure));
            }
            FeedEvent::LoadFailed {
                kind: LoadKind::Initial,
                ..
            }
            | FeedEvent::PageApplied { page: 1, .. } => self.clear_status(),
            _ => {}
        }
    }

    /// Remember that the detail for `id` is being fetched. Returns false when
    /// it is already loading or loaded.
    pub fn request_detail(&mut self, id: &str) -> bool {
        match &self.detail {
            Some(Detail::Loading(current)) if current == id => false,
            Some(Detail::Loaded(article)) if article.id == id => false,
            _ => {
                self.detail = Some(Detail::Loading(id.to_string()));
                true
            }
        }
    }

    /// Store a fetched detail, unless the user has moved on to another article.
    pub fn on_detail(&mut self, id: String, result: Result<Article, Failure>) {
        let wanted = matches!(&self.detail, Some(Detail::Loading(current)) if *current == id);
        if !wanted {
            return;
        }
        self.detail = Some(match result {
            Ok(article) => Detail::Loaded(article),
            Err(failure) => Detail::Failed(id, failure),
        });
    }

    /// Detail for `article`, if one was requested for it.
    pub fn detail_for(&self, article: &Article) -> Option<&Detail> {
        self.detail
            .as_ref()
            .filter(|detail| detail.article_id() == article.id)
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    fn select(&mut self, index: usize) {
        self.item_index = index;
        self.list_state.select(Some(index));
        self.preview_scroll = 0;
    }
}
