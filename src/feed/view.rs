use crate::domain::{Article, Failure};
use crate::feed::store::FeedState;

/// What a renderer should show for a feed. Exactly one variant applies to
/// any `FeedState`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedView<'a> {
    LoadingEmpty,
    Error {
        failure: &'a Failure,
    },
    Empty,
    Populated {
        items: &'a [Article],
        is_loading_more: bool,
        has_more: bool,
    },
}

impl<'a> FeedView<'a> {
    pub fn of(state: &'a FeedState) -> Self {
        if !state.items.is_empty() {
            return FeedView::Populated {
                items: &state.items,
                is_loading_more: state.is_loading_more,
                has_more: state.has_more,
            };
        }
        if state.is_loading() {
            return FeedView::LoadingEmpty;
        }
        match &state.last_error {
            Some(failure) => FeedView::Error { failure },
            None => FeedView::Empty,
        }
    }

    pub fn items(&self) -> &'a [Article] {
        match self {
            FeedView::Populated { items, .. } => items,
            _ => &[],
        }
    }

    /// One-line status for a footer or status bar.
    pub fn summary(&self) -> String {
        match self {
            FeedView::LoadingEmpty => "Loading latest news...".to_string(),
            FeedView::Error { failure } => format!("{} (press refresh to retry)", failure),
            FeedView::Empty => "No articles found".to_string(),
            FeedView::Populated {
                items,
                is_loading_more: true,
                ..
            } => format!("{}, loading more...", article_count(items.len())),
            FeedView::Populated {
                items,
                has_more: false,
                ..
            } => format!("{}, end of feed", article_count(items.len())),
            FeedView::Populated { items, .. } => article_count(items.len()),
        }
    }
}

fn article_count(count: usize) -> String {
    match count {
        1 => "1 article".to_string(),
        n => format!("{} articles", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeedIdentity;

    fn article(id: &str) -> Article {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": id,
            "link": "https://example.com",
        }))
        .unwrap()
    }

    /// Every combination of the fields the adapter looks at.
    fn all_states() -> Vec<FeedState> {
        let mut states = Vec::new();
        for has_items in [false, true] {
            for loading in [None, Some(true), Some(false)] {
                for has_error in [false, true] {
                    for has_more in [false, true] {
                        let mut state = FeedState::new(FeedIdentity::all());
                        if has_items {
                            state.items.push(article("a"));
                        }
                        match loading {
                            Some(true) => state.is_loading_initial = true,
                            Some(false) => state.is_loading_more = true,
                            None => {}
                        }
                        if has_error {
                            state.last_error = Some(Failure::network("offline"));
                        }
                        state.has_more = has_more;
                        states.push(state);
                    }
                }
            }
        }
        states
    }

    #[test]
    fn test_adapter_is_total_and_exclusive() {
        for state in all_states() {
            let view = FeedView::of(&state);
            let expected = if !state.items.is_empty() {
                "populated"
            } else if state.is_loading() {
                "loading"
            } else if state.last_error.is_some() {
                "error"
            } else {
                "empty"
            };
            let actual = match view {
                FeedView::Populated { .. } => "populated",
                FeedView::LoadingEmpty => "loading",
                FeedView::Error { .. } => "error",
                FeedView::Empty => "empty",
            };
            assert_eq!(actual, expected, "state: {:?}", state);
        }
    }

    #[test]
    fn test_populated_exposes_paging_flags() {
        let mut state = FeedState::new(FeedIdentity::all());
        state.items.push(article("a"));
        state.is_loading_more = true;
        state.has_more = true;

        assert_eq!(
            FeedView::of(&state),
            FeedView::Populated {
                items: &state.items,
                is_loading_more: true,
                has_more: true
            }
        );
        assert_eq!(FeedView::of(&state).items().len(), 1);
    }

    #[test]
    fn test_summaries() {
        let mut state = FeedState::new(FeedIdentity::all());
        assert_eq!(FeedView::of(&state).summary(), "No articles found");

        state.last_error = Some(Failure::server(500, "Failed to fetch news"));
        assert_eq!(
            FeedView::of(&state).summary(),
            "Failed to fetch news (press refresh to retry)"
        );

        state.items.push(article("a"));
        state.has_more = false;
        assert_eq!(FeedView::of(&state).summary(), "1 article, end of feed");

        state.items.push(article("b"));
        state.has_more = true;
        assert_eq!(FeedView::of(&state).summary(), "2 articles");

        state.is_loading_more = true;
        assert_eq!(FeedView::of(&state).summary(), "2 articles, loading more...");
    }
}
