//! Request DTOs for the bhub API.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Logout request.
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    /// Refresh token to invalidate.
    pub refresh_token: String,
}

/// Token refresh request.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token.
    pub refresh_token: String,
}

/// Feed creation request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFeedRequest {
    /// Feed URL.
    #[validate(url(message = "Must be a valid URL"))]
    pub url: String,
    /// Custom title (discovered from the feed when omitted).
    #[serde(default)]
    pub title: Option<String>,
    /// Description override.
    #[serde(default)]
    pub description: Option<String>,
    /// Publisher country code.
    #[serde(default)]
    pub country: Option<String>,
}

/// Feed update request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateFeedRequest {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New description (empty string clears).
    #[serde(default)]
    pub description: Option<String>,
    /// New country code (empty string clears).
    #[serde(default)]
    pub country: Option<String>,
    /// New active flag.
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Feed URL request (test/verify endpoints).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct FeedUrlRequest {
    /// Feed URL to check.
    #[validate(url(message = "Must be a valid URL"))]
    pub url: String,
}

/// Repository cleanup request.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CleanRepositoryRequest {
    /// Retention horizon in days (configuration default when omitted).
    #[serde(default)]
    pub retention_days: Option<i64>,
    /// Archive instead of delete (configuration default when omitted).
    #[serde(default)]
    pub archive: Option<bool>,
}

/// Article highlight toggle request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct HighlightRequest {
    /// Desired highlight state.
    pub highlighted: bool,
}

/// Article archive toggle request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ArchiveRequest {
    /// Desired archive state.
    pub archived: bool,
}

/// Article category assignment request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetCategoryRequest {
    /// Category ID; null clears the assignment.
    pub category_id: Option<i64>,
}

/// Category creation request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    /// Display name.
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Explicit slug (derived from the name when omitted).
    #[serde(default)]
    pub slug: Option<String>,
    /// Display color.
    #[serde(default)]
    pub color: Option<String>,
}

/// Category update request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New color (empty string clears).
    #[serde(default)]
    pub color: Option<String>,
}

/// Banner creation request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBannerRequest {
    /// Internal title.
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    /// Image URL.
    #[validate(url(message = "Must be a valid URL"))]
    pub image_url: String,
    /// Click-through target.
    #[serde(default)]
    pub target_url: Option<String>,
    /// Placement slot.
    #[validate(length(min = 1, message = "Position is required"))]
    pub position: String,
    /// Display window start (RFC 3339 or `YYYY-MM-DD HH:MM:SS`).
    #[validate(length(min = 1, message = "Start date is required"))]
    pub starts_at: String,
    /// Display window end.
    #[validate(length(min = 1, message = "End date is required"))]
    pub ends_at: String,
    /// Rotation priority.
    #[serde(default)]
    pub priority: Option<i32>,
}

/// Banner update request.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateBannerRequest {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// New target URL (empty string clears).
    #[serde(default)]
    pub target_url: Option<String>,
    /// New placement slot.
    #[serde(default)]
    pub position: Option<String>,
    /// New window start.
    #[serde(default)]
    pub starts_at: Option<String>,
    /// New window end.
    #[serde(default)]
    pub ends_at: Option<String>,
    /// New priority.
    #[serde(default)]
    pub priority: Option<i32>,
    /// New active flag.
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (capped at 100).
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PaginationQuery {
    /// Convert to an (offset, limit) pair with clamping.
    pub fn to_offset_limit(&self) -> (i64, i64) {
        let per_page = self.per_page.clamp(1, 100) as i64;
        let page = self.page.max(1) as i64;
        ((page - 1) * per_page, per_page)
    }
}

/// Public article listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ArticleListQuery {
    /// Page number (1-based).
    #[serde(default)]
    pub page: Option<u32>,
    /// Items per page.
    #[serde(default)]
    pub per_page: Option<u32>,
    /// Free-text search over title and abstract.
    #[serde(default)]
    pub q: Option<String>,
    /// Category slug filter.
    #[serde(default)]
    pub category: Option<String>,
    /// Feed filter.
    #[serde(default)]
    pub feed_id: Option<i64>,
}

impl ArticleListQuery {
    /// The pagination window for this query.
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page.unwrap_or_else(default_page),
            per_page: self.per_page.unwrap_or_else(default_per_page),
        }
    }
}
