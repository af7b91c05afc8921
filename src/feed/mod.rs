//! Feed module for bhub.
//!
//! Covers configured RSS/Atom sources: fetching with SSRF protection,
//! parsing/normalization, and persistence.

pub mod fetcher;
pub mod repository;
pub mod types;

pub use fetcher::{parse_feed, strip_html, validate_url, FeedFetcher};
pub use repository::FeedRepository;
pub use types::{
    Feed, FeedUpdate, NewFeed, ParsedEntry, ParsedFeed, MAX_ABSTRACT_LENGTH,
    MAX_CONSECUTIVE_ERRORS, MAX_FEED_SIZE,
};
