pub mod feed;
pub mod updates;

pub use feed::{FeedQuery, Profile};
pub use updates::{compose, validate_content, UpdateService, MAX_CONTENT_CHARS};
