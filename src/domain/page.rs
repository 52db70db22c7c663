use crate::domain::Article;

/// One page of a feed. `has_next` mirrors a non-null `next` link.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Article>,
    pub has_next: bool,
}

impl Page {
    pub fn new(items: Vec<Article>, has_next: bool) -> Self {
        Self { items, has_next }
    }

    pub fn last(items: Vec<Article>) -> Self {
        Self::new(items, false)
    }
}
