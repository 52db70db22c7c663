pub mod controller;
pub mod store;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{FeedController, FeedEvent, LoadOutcome};
pub use store::{Applied, FeedState, FeedStore, LoadKind, LoadRefused, LoadTicket};
pub use view::FeedView;
