//! Banner ad module for bhub.

pub mod repository;
pub mod types;

pub use repository::BannerRepository;
pub use types::{Banner, BannerUpdate, NewBanner};
