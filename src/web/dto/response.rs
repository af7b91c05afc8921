//! Response DTOs for the bhub API.
//!
//! Success responses use the `{ success, message?, data }` envelope;
//! paginated listings add a `meta` block.

use serde::Serialize;
use utoipa::ToSchema;

// ============================================================================
// Generic Response Wrappers
// ============================================================================

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always true for success responses.
    pub success: bool,
    /// Optional human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    /// Create a new API response with a message.
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    /// Always true for success responses.
    pub success: bool,
    /// Response data.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PaginationMeta,
}

impl<T: Serialize> PaginatedResponse<T> {
    /// Create a new paginated response.
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        Self {
            success: true,
            data,
            meta: PaginationMeta {
                page,
                per_page,
                total,
            },
        }
    }
}

/// Pagination metadata.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u64,
}

// ============================================================================
// Auth DTOs
// ============================================================================

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Access token (JWT).
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Access token expiry in seconds.
    pub expires_in: u64,
    /// User information.
    pub user: UserInfo,
}

/// User information in responses.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: i64,
    /// Username.
    pub username: String,
    /// Display name.
    pub display_name: String,
    /// User role.
    pub role: String,
}

/// Token refresh response.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token.
    pub access_token: String,
    /// New refresh token.
    pub refresh_token: String,
    /// Expiry in seconds.
    pub expires_in: u64,
}

/// Current user response (for /api/auth/me).
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// User ID.
    pub id: i64,
    /// Username.
    pub username: String,
    /// Display name.
    pub display_name: String,
    /// User role.
    pub role: String,
    /// Account creation timestamp.
    pub created_at: String,
    /// Last login timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<String>,
}

// ============================================================================
// Article DTOs
// ============================================================================

/// Public article response.
#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    /// Article ID.
    pub id: i64,
    /// Feed the article came from.
    pub feed_id: i64,
    /// Assigned category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryResponse>,
    /// Article title.
    pub title: String,
    /// Abstract text.
    #[serde(skip_serializing_if = "Option::is_none", rename = "abstract")]
    pub abstract_text: Option<String>,
    /// Link to the original article.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    /// Upstream publication timestamp (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// Ingest timestamp (RFC 3339).
    pub created_at: String,
    /// Highlight flag.
    pub highlighted: bool,
    /// View count.
    pub view_count: i64,
    /// Authors in stored order.
    pub authors: Vec<String>,
}

/// Admin article response (includes moderation fields).
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminArticleResponse {
    /// Article ID.
    pub id: i64,
    /// Feed the article came from.
    pub feed_id: i64,
    /// Assigned category ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    /// Per-feed GUID.
    pub guid: String,
    /// Article title.
    pub title: String,
    /// Ingest timestamp (RFC 3339).
    pub created_at: String,
    /// Highlight flag.
    pub highlighted: bool,
    /// Archive flag.
    pub is_archived: bool,
    /// View count.
    pub view_count: i64,
}

// ============================================================================
// Category DTOs
// ============================================================================

/// Category response.
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    /// Category ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// URL-safe slug.
    pub slug: String,
    /// Display color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

// ============================================================================
// Feed DTOs
// ============================================================================

/// Public feed response.
#[derive(Debug, Serialize)]
pub struct FeedResponse {
    /// Feed ID.
    pub id: i64,
    /// Feed title.
    pub title: String,
    /// Feed description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Site URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
    /// Publisher country code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Admin feed response (includes sync state).
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminFeedResponse {
    /// Feed ID.
    pub id: i64,
    /// Feed URL.
    pub url: String,
    /// Feed title.
    pub title: String,
    /// Feed description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Site URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
    /// Publisher country code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Whether the feed is synced.
    pub is_active: bool,
    /// Last sync timestamp (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync_at: Option<String>,
    /// Consecutive error count.
    pub error_count: i32,
    /// Last sync error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// Preview of a parsed feed entry (feed test endpoint).
#[derive(Debug, Serialize, ToSchema)]
pub struct FeedEntryPreview {
    /// Entry title.
    pub title: String,
    /// Entry link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Publication timestamp (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
}

/// Feed test response.
#[derive(Debug, Serialize, ToSchema)]
pub struct FeedTestResponse {
    /// Discovered feed title.
    pub title: String,
    /// Discovered description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Discovered site URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
    /// Total parsed entries.
    pub entry_count: usize,
    /// Bounded entry preview.
    pub preview: Vec<FeedEntryPreview>,
}

/// Feed verify response.
#[derive(Debug, Serialize, ToSchema)]
pub struct FeedVerifyResponse {
    /// Whether the URL points at a parseable feed.
    pub valid: bool,
    /// Discovered feed title when valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Failure reason when invalid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Banner DTOs
// ============================================================================

/// Public banner response.
#[derive(Debug, Serialize)]
pub struct BannerResponse {
    /// Banner ID.
    pub id: i64,
    /// Image URL.
    pub image_url: String,
    /// Click-through target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    /// Placement slot.
    pub position: String,
    /// Rotation priority.
    pub priority: i32,
}

/// Admin banner response (includes scheduling and stats).
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminBannerResponse {
    /// Banner ID.
    pub id: i64,
    /// Internal title.
    pub title: String,
    /// Image URL.
    pub image_url: String,
    /// Click-through target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    /// Placement slot.
    pub position: String,
    /// Display window start (RFC 3339).
    pub starts_at: String,
    /// Display window end (RFC 3339).
    pub ends_at: String,
    /// Rotation priority.
    pub priority: i32,
    /// Recorded clicks.
    pub click_count: i64,
    /// Active flag.
    pub is_active: bool,
}

// ============================================================================
// Job report DTOs
// ============================================================================

/// A feed that failed during bulk sync.
#[derive(Debug, Serialize, ToSchema)]
pub struct SyncFailureResponse {
    /// Feed ID.
    pub feed_id: i64,
    /// Feed title.
    pub feed_title: String,
    /// Error message.
    pub error: String,
}

/// Bulk sync report.
#[derive(Debug, Serialize, ToSchema)]
pub struct SyncReportResponse {
    /// Feeds attempted.
    pub feeds_processed: u32,
    /// New articles stored.
    pub articles_added: u32,
    /// Per-feed failures.
    pub failures: Vec<SyncFailureResponse>,
}

/// Retention pass report.
#[derive(Debug, Serialize, ToSchema)]
pub struct CleanupReportResponse {
    /// Cutoff used (RFC 3339).
    pub cutoff: String,
    /// Articles deleted or archived.
    pub articles_affected: u64,
    /// Orphaned authors removed.
    pub authors_removed: u64,
    /// Whether articles were archived instead of deleted.
    pub archived: bool,
}

/// Single-feed sync report.
#[derive(Debug, Serialize, ToSchema)]
pub struct FeedSyncResponse {
    /// Feed ID.
    pub feed_id: i64,
    /// Feed title.
    pub feed_title: String,
    /// New articles stored.
    pub added: u32,
    /// Duplicate entries skipped.
    pub skipped: u32,
}
