//! Middleware for the bhub API.

pub mod auth;
pub mod cors;
pub mod cron;

pub use auth::{jwt_auth, AuthUser, JwtClaims, JwtState};
pub use cors::create_cors_layer;
pub use cron::{CronAuth, CRON_SECRET_HEADER};
