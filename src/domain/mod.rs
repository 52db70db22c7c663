pub mod article;
pub mod failure;
pub mod identity;
pub mod page;
pub mod user;

pub use article::Article;
pub use failure::{Failure, FailureKind};
pub use identity::{EndpointKind, FeedIdentity};
pub use page::Page;
pub use user::{
    Credentials, Profile, ProfileUpdate, SignupRequest, User, KNOWN_CATEGORIES, KNOWN_SOURCES,
};
