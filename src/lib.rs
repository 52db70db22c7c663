//! # Scoop
//!
//! A terminal client for the DailyScoop news API.
//!
//! ## Architecture
//!
//! Scoop keeps one paginated feed on screen at a time:
//!
//! ```text
//! Fetcher → Normalizer → Feed store ← Controller → View → UI
//! ```
//!
//! - [`fetcher`]: reqwest client for the REST API, one page per request
//! - [`normalizer`]: Decodes page envelopes and error bodies into domain types
//! - [`feed`]: Pagination state, stale-result guard and the view adapter
//! - [`tui`]: Terminal user interface built with ratatui
//!
//! ## Quick Start
//!
//! ```bash
//! # Latest headlines
//! scoop news
//!
//! # Three pages of sports
//! scoop news --category Sports --pages 3
//!
//! # Log in and read your personalized feed
//! scoop login --username asha
//! scoop for-you
//!
//! # Launch TUI
//! scoop tui
//! ```
//!
//! ## Modules
//!
//! - [`app`]: Application context and error types
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: TOML configuration
//! - [`domain`]: Core domain models (Article, FeedIdentity, Page, Failure)
//! - [`feed`]: Feed store, controller and presentation adapter
//! - [`fetcher`]: HTTP access to the news API
//! - [`normalizer`]: Response decoding
//! - [`session`]: Login cookie persistence
//! - [`tui`]: Terminal user interface

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the
/// configuration, the shared API client and the saved session.
pub mod app;

/// Configuration management.
///
/// Loads from `~/.config/scoop/config.toml`, supporting:
/// - API base URL and timeout
/// - Category tabs and the load-more threshold
/// - Custom colors (named or hex)
/// - Custom keybindings
pub mod config;

/// Command-line interface using clap.
///
/// - `news [--category C | --search Q] [--pages N]` - List articles
/// - `for-you` - Personalized feed
/// - `show <id>` - Article detail with AI summary
/// - `login` / `signup` / `logout` / `status` - Session management
/// - `profile` - Feed preferences
/// - `tui` - Launch the TUI
pub mod cli;

/// Core domain models.
///
/// - [`Article`](domain::Article): A news article
/// - [`FeedIdentity`](domain::FeedIdentity): Which feed a list shows
/// - [`Page`](domain::Page): One page of articles plus the has-next flag
/// - [`Failure`](domain::Failure): Normalized API failure
pub mod domain;

/// Paginated feed state.
///
/// - [`FeedStore`](feed::FeedStore): Owns the state and rejects stale results
/// - [`FeedController`](feed::FeedController): Runs fetches and applies outcomes
/// - [`FeedView`](feed::FeedView): What a renderer should show
pub mod feed;

/// HTTP access to the news API.
///
/// - [`PageFetcher`](fetcher::PageFetcher): Async trait for page fetching
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Response decoding.
///
/// Turns `{results, next}` envelopes (or bare lists, where allowed) into
/// [`Page`](domain::Page)s and extracts server error messages.
pub mod normalizer;

/// Session cookie persistence between runs.
pub mod session;

/// Terminal user interface.
///
/// Tabs across the top, article list on the left, preview on the right:
/// - Tabs: All, configured categories, For You
/// - Articles pane (45% width)
/// - Preview pane with AI summary on demand
///
/// Keybindings: j/k navigate, Tab switches feed, / searches, Enter loads the
/// AI summary, o opens in browser, R refreshes, q quits.
pub mod tui;
