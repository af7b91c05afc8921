//! bhub - content repository for behavior analysis research.
//!
//! Aggregates scientific article feeds into a relational database, exposes
//! a public browsing/search API and an admin API for curation, banners and
//! retention, plus an embeddings-based similar-articles feature.

pub mod auth;
pub mod banner;
pub mod config;
pub mod content;
pub mod datetime;
pub mod db;
pub mod error;
pub mod feed;
pub mod logging;
pub mod similarity;
pub mod sync;
pub mod web;

pub use auth::{hash_password, validate_password, verify_password, PasswordError};
pub use config::Config;
pub use db::{Database, NewUser, Role, User, UserRepository, UserUpdate};
pub use error::{BhubError, Result};
pub use feed::{Feed, FeedFetcher, FeedRepository, NewFeed};
pub use sync::{
    archive_old_articles, clean_repository, CleanupReport, FeedAggregatorService, SyncReport,
};
pub use web::WebServer;
