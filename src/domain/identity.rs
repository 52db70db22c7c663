use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    All,
    Category,
    Search,
    Personalized,
}

/// Which logical feed a list shows. Two identities are equal iff both
/// the endpoint kind and the filter match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedIdentity {
    pub kind: EndpointKind,
    pub filter: Option<String>,
}

impl FeedIdentity {
    pub fn all() -> Self {
        Self {
            kind: EndpointKind::All,
            filter: None,
        }
    }

    pub fn category(name: impl Into<String>) -> Self {
        Self {
            kind: EndpointKind::Category,
            filter: Some(name.into()),
        }
    }

    /// A blank query means "no search" and yields the general feed.
    pub fn search(query: impl Into<String>) -> Self {
        let query = query.into();
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Self::all();
        }
        Self {
            kind: EndpointKind::Search,
            filter: Some(trimmed.to_string()),
        }
    }

    pub fn personalized() -> Self {
        Self {
            kind: EndpointKind::Personalized,
            filter: None,
        }
    }

    /// Heading for a list showing this feed.
    pub fn label(&self) -> String {
        match (self.kind, self.filter.as_deref()) {
            (EndpointKind::All, _) => "Latest News".to_string(),
            (EndpointKind::Category, Some(name)) => name.to_string(),
            (EndpointKind::Category, None) => "Category".to_string(),
            (EndpointKind::Search, Some(query)) => format!("Search Results for \"{}\"", query),
            (EndpointKind::Search, None) => "Search Results".to_string(),
            (EndpointKind::Personalized, _) => "For You".to_string(),
        }
    }
}

impl Default for FeedIdentity {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for FeedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filter {
            Some(filter) => write!(f, "{:?}:{}", self.kind, filter),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_compares_kind_and_filter() {
        assert_eq!(FeedIdentity::category("Sports"), FeedIdentity::category("Sports"));
        assert_ne!(FeedIdentity::category("Sports"), FeedIdentity::category("Tech"));
        assert_ne!(FeedIdentity::category("Tech"), FeedIdentity::search("Tech"));
    }

    #[test]
    fn test_blank_search_is_all() {
        assert_eq!(FeedIdentity::search("   "), FeedIdentity::all());
        assert_eq!(
            FeedIdentity::search(" budget "),
            FeedIdentity {
                kind: EndpointKind::Search,
                filter: Some("budget".into())
            }
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(FeedIdentity::all().label(), "Latest News");
        assert_eq!(
            FeedIdentity::search("rain").label(),
            "Search Results for \"rain\""
        );
        assert_eq!(FeedIdentity::personalized().label(), "For You");
    }

    #[test]
    fn test_display() {
        assert_eq!(FeedIdentity::category("World").to_string(), "Category:World");
        assert_eq!(FeedIdentity::all().to_string(), "All");
    }
}
