//! Cron endpoint authorization.
//!
//! Scheduler-driven endpoints carry no session; they authenticate with a
//! shared secret in the `x-cron-secret` header.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Header carrying the cron shared secret.
pub const CRON_SECRET_HEADER: &str = "x-cron-secret";

/// Extractor gating cron endpoints on the shared secret.
#[derive(Debug, Clone, Copy)]
pub struct CronAuth;

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CronAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if state.cron_secret.is_empty() {
            return Err(ApiError::not_found("Cron endpoints are disabled"));
        }

        let provided = parts
            .headers
            .get(CRON_SECRET_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing cron secret"))?;

        if provided != state.cron_secret {
            return Err(ApiError::unauthorized("Invalid cron secret"));
        }

        Ok(CronAuth)
    }
}
