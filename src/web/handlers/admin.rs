//! Admin handlers: feed management, curation, banners, categories, cleanup.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::banner::{BannerRepository, BannerUpdate, NewBanner};
use crate::content::{
    ArticleQuery, ArticleRepository, CategoryRepository, NewCategory,
};
use crate::datetime::{parse_datetime, to_rfc3339, to_storage};
use crate::db::Role;
use crate::feed::{self, Feed, FeedRepository, FeedUpdate, NewFeed};
use crate::sync::{archive_old_articles, clean_repository, FeedAggregatorService};
use crate::web::dto::{
    empty_as_none, AdminArticleResponse, AdminBannerResponse, AdminFeedResponse, ApiResponse,
    ArchiveRequest, CategoryResponse, CleanRepositoryRequest, CleanupReportResponse,
    CreateBannerRequest, CreateCategoryRequest, CreateFeedRequest, FeedEntryPreview,
    FeedSyncResponse, FeedTestResponse, FeedUrlRequest, FeedVerifyResponse, HighlightRequest,
    PaginatedResponse, PaginationQuery, SetCategoryRequest, SyncReportResponse,
    UpdateBannerRequest, UpdateCategoryRequest, UpdateFeedRequest, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::cron::{cleanup_report_response, run_sync_all};
use crate::web::handlers::AppState;
use crate::web::middleware::{AuthUser, JwtClaims};

/// Entries included in a feed test preview.
const TEST_PREVIEW_LIMIT: usize = 5;

/// Require an admin session.
fn require_admin(claims: &JwtClaims) -> Result<(), ApiError> {
    if claims.parsed_role() < Role::Admin {
        return Err(ApiError::forbidden("Admin access required"));
    }
    Ok(())
}

fn feed_response(feed: Feed) -> AdminFeedResponse {
    AdminFeedResponse {
        id: feed.id,
        url: feed.url,
        title: feed.title,
        description: feed.description,
        site_url: feed.site_url,
        country: feed.country,
        is_active: feed.is_active,
        last_sync_at: feed.last_sync_at.map(|dt| dt.to_rfc3339()),
        error_count: feed.error_count,
        last_error: feed.last_error,
    }
}

fn article_response(article: crate::content::Article) -> AdminArticleResponse {
    AdminArticleResponse {
        id: article.id,
        feed_id: article.feed_id,
        category_id: article.category_id,
        guid: article.guid,
        title: article.title,
        created_at: to_rfc3339(&article.created_at),
        highlighted: article.highlighted,
        is_archived: article.is_archived,
        view_count: article.view_count,
    }
}

fn banner_response(banner: crate::banner::Banner) -> AdminBannerResponse {
    AdminBannerResponse {
        id: banner.id,
        title: banner.title,
        image_url: banner.image_url,
        target_url: banner.target_url,
        position: banner.position,
        starts_at: to_rfc3339(&banner.starts_at),
        ends_at: to_rfc3339(&banner.ends_at),
        priority: banner.priority,
        click_count: banner.click_count,
        is_active: banner.is_active,
    }
}

fn parse_banner_datetime(value: &str, field: &str) -> Result<String, ApiError> {
    parse_datetime(value)
        .map(|dt| to_storage(&dt))
        .ok_or_else(|| ApiError::bad_request(format!("Invalid datetime in {field}")))
}

// ============================================================================
// Feed Management
// ============================================================================

/// GET /api/admin/feeds - List all feeds with sync state.
#[utoipa::path(
    get,
    path = "/api/admin/feeds",
    tag = "admin",
    responses(
        (status = 200, description = "All configured feeds", body = Vec<AdminFeedResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_list_feeds(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ApiResponse<Vec<AdminFeedResponse>>>, ApiError> {
    require_admin(&claims)?;

    let feeds = FeedRepository::new(state.db.pool())
        .list_all()
        .await
        .map_err(|e| {
            tracing::error!("Failed to list feeds: {}", e);
            ApiError::internal("Failed to list feeds")
        })?;

    Ok(Json(ApiResponse::new(
        feeds.into_iter().map(feed_response).collect(),
    )))
}

/// POST /api/admin/feeds - Register a feed.
///
/// Fetches the URL to validate it and discover metadata, then stores the
/// feed and ingests its current entries.
#[utoipa::path(
    post,
    path = "/api/admin/feeds",
    tag = "admin",
    request_body = CreateFeedRequest,
    responses(
        (status = 200, description = "Feed created", body = AdminFeedResponse),
        (status = 400, description = "Invalid URL or unparseable feed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 408, description = "Feed fetch timed out"),
        (status = 409, description = "Feed already registered")
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_create_feed(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateFeedRequest>,
) -> Result<Json<ApiResponse<AdminFeedResponse>>, ApiError> {
    require_admin(&claims)?;

    let feed_repo = FeedRepository::new(state.db.pool());

    if feed_repo
        .get_by_url(&req.url)
        .await
        .map_err(ApiError::from)?
        .is_some()
    {
        return Err(ApiError::conflict("Feed already registered"));
    }

    // Fetch once to validate the URL and discover metadata
    let parsed = state.fetcher.fetch(&req.url).await.map_err(ApiError::from)?;

    let title = req
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| parsed.title.clone());
    let mut new_feed = NewFeed::new(&req.url, title);
    if let Some(description) = req.description.or_else(|| parsed.description.clone()) {
        new_feed = new_feed.with_description(description);
    }
    if let Some(ref site_url) = parsed.site_url {
        new_feed = new_feed.with_site_url(site_url.clone());
    }
    if let Some(country) = req.country.filter(|c| !c.trim().is_empty()) {
        new_feed = new_feed.with_country(country);
    }

    let created = feed_repo.create(&new_feed).await.map_err(ApiError::from)?;

    // Seed the repository with the entries already in the feed
    let mut service =
        FeedAggregatorService::new(&state.db, &state.fetcher, state.max_items_per_feed);
    if let Some(ref embedder) = state.embedder {
        service = service.with_embedder(embedder.as_ref());
    }
    let stats = service
        .ingest(&created, &parsed)
        .await
        .map_err(ApiError::from)?;
    feed_repo.mark_synced(created.id).await.map_err(ApiError::from)?;

    let feed = feed_repo
        .get_by_id(created.id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::internal("Feed vanished after creation"))?;

    Ok(Json(ApiResponse::with_message(
        format!("Feed registered with {} article(s)", stats.added),
        feed_response(feed),
    )))
}

/// GET /api/admin/feeds/:id - Feed detail.
pub async fn admin_get_feed(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(feed_id): Path<i64>,
) -> Result<Json<ApiResponse<AdminFeedResponse>>, ApiError> {
    require_admin(&claims)?;

    let feed = FeedRepository::new(state.db.pool())
        .get_by_id(feed_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found("Feed not found"))?;

    Ok(Json(ApiResponse::new(feed_response(feed))))
}

/// PUT /api/admin/feeds/:id - Update feed settings.
pub async fn admin_update_feed(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(feed_id): Path<i64>,
    Json(req): Json<UpdateFeedRequest>,
) -> Result<Json<ApiResponse<AdminFeedResponse>>, ApiError> {
    require_admin(&claims)?;

    let feed_repo = FeedRepository::new(state.db.pool());
    feed_repo
        .get_by_id(feed_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found("Feed not found"))?;

    let mut update = FeedUpdate::new();
    if let Some(title) = req.title {
        if title.trim().is_empty() {
            return Err(ApiError::bad_request("Title must not be empty"));
        }
        update = update.with_title(title);
    }
    if let Some(description) = empty_as_none(req.description) {
        update = update.with_description(description);
    }
    if let Some(country) = empty_as_none(req.country) {
        update = update.with_country(country);
    }
    if let Some(is_active) = req.is_active {
        update = if is_active { update.enable() } else { update.disable() };
    }

    feed_repo.update(feed_id, &update).await.map_err(ApiError::from)?;

    let feed = feed_repo
        .get_by_id(feed_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found("Feed not found"))?;

    Ok(Json(ApiResponse::new(feed_response(feed))))
}

/// DELETE /api/admin/feeds/:id - Remove a feed and its articles.
pub async fn admin_delete_feed(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(feed_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require_admin(&claims)?;

    let deleted = FeedRepository::new(state.db.pool())
        .delete(feed_id)
        .await
        .map_err(ApiError::from)?;
    if !deleted {
        return Err(ApiError::not_found("Feed not found"));
    }

    // Articles cascade with the feed; authors may now dangle
    let orphans = crate::content::AuthorRepository::new(state.db.pool())
        .delete_orphans()
        .await
        .map_err(ApiError::from)?;
    if orphans > 0 {
        tracing::info!(orphans, "Removed orphaned authors after feed delete");
    }

    Ok(Json(ApiResponse::with_message("Feed deleted", ())))
}

/// POST /api/admin/feeds/:id/sync - Sync one feed now.
#[utoipa::path(
    post,
    path = "/api/admin/feeds/{id}/sync",
    tag = "admin",
    params(("id" = i64, Path, description = "Feed ID")),
    responses(
        (status = 200, description = "Sync summary", body = FeedSyncResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Feed not found"),
        (status = 408, description = "Feed fetch timed out")
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_sync_feed(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(feed_id): Path<i64>,
) -> Result<Json<ApiResponse<FeedSyncResponse>>, ApiError> {
    require_admin(&claims)?;

    let mut service =
        FeedAggregatorService::new(&state.db, &state.fetcher, state.max_items_per_feed);
    if let Some(ref embedder) = state.embedder {
        service = service.with_embedder(embedder.as_ref());
    }

    let summary = service.sync_feed(feed_id).await.map_err(ApiError::from)?;

    Ok(Json(ApiResponse::with_message(
        format!("Added {} article(s)", summary.added),
        FeedSyncResponse {
            feed_id: summary.feed_id,
            feed_title: summary.feed_title,
            added: summary.added,
            skipped: summary.skipped,
        },
    )))
}

/// POST /api/admin/feeds/test - Fetch a URL and preview its entries.
#[utoipa::path(
    post,
    path = "/api/admin/feeds/test",
    tag = "admin",
    request_body = FeedUrlRequest,
    responses(
        (status = 200, description = "Feed metadata and entry preview", body = FeedTestResponse),
        (status = 400, description = "Invalid URL or unparseable feed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 408, description = "Feed fetch timed out")
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_test_feed(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<FeedUrlRequest>,
) -> Result<Json<ApiResponse<FeedTestResponse>>, ApiError> {
    require_admin(&claims)?;

    let parsed = state.fetcher.fetch(&req.url).await.map_err(ApiError::from)?;

    let preview = parsed
        .entries
        .iter()
        .take(TEST_PREVIEW_LIMIT)
        .map(|entry| FeedEntryPreview {
            title: entry.title.clone(),
            link: entry.link.clone(),
            published_at: entry.published_at.map(|dt| dt.to_rfc3339()),
        })
        .collect();

    Ok(Json(ApiResponse::new(FeedTestResponse {
        title: parsed.title,
        description: parsed.description,
        site_url: parsed.site_url,
        entry_count: parsed.entries.len(),
        preview,
    })))
}

/// POST /api/admin/feeds/verify - Check that a URL points at a feed.
///
/// Unlike `test`, a broken feed is reported as `valid: false` rather than
/// an error status; only auth failures error out.
#[utoipa::path(
    post,
    path = "/api/admin/feeds/verify",
    tag = "admin",
    request_body = FeedUrlRequest,
    responses(
        (status = 200, description = "Verification result", body = FeedVerifyResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_verify_feed(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<FeedUrlRequest>,
) -> Result<Json<ApiResponse<FeedVerifyResponse>>, ApiError> {
    require_admin(&claims)?;

    if let Err(e) = feed::validate_url(&req.url) {
        return Ok(Json(ApiResponse::new(FeedVerifyResponse {
            valid: false,
            title: None,
            error: Some(e.to_string()),
        })));
    }

    let response = match state.fetcher.fetch(&req.url).await {
        Ok(parsed) => FeedVerifyResponse {
            valid: true,
            title: Some(parsed.title),
            error: None,
        },
        Err(e) => FeedVerifyResponse {
            valid: false,
            title: None,
            error: Some(e.to_string()),
        },
    };

    Ok(Json(ApiResponse::new(response)))
}

/// POST /api/admin/sync-all - Sync every active feed.
#[utoipa::path(
    post,
    path = "/api/admin/sync-all",
    tag = "admin",
    responses(
        (status = 200, description = "Sync report", body = SyncReportResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_sync_all(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ApiResponse<SyncReportResponse>>, ApiError> {
    require_admin(&claims)?;

    let report = run_sync_all(&state).await?;
    Ok(Json(ApiResponse::with_message("Sync finished", report)))
}

/// POST /api/admin/repository/clean - Run a retention pass now.
#[utoipa::path(
    post,
    path = "/api/admin/repository/clean",
    tag = "admin",
    request_body = CleanRepositoryRequest,
    responses(
        (status = 200, description = "Cleanup report", body = CleanupReportResponse),
        (status = 400, description = "Invalid retention horizon"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_clean_repository(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    body: Option<Json<CleanRepositoryRequest>>,
) -> Result<Json<ApiResponse<CleanupReportResponse>>, ApiError> {
    require_admin(&claims)?;

    let req = body.map(|Json(req)| req).unwrap_or_default();
    let days = req.retention_days.unwrap_or(state.retention_days);
    let archive = req.archive.unwrap_or(state.retention_archives);

    let report = if archive {
        archive_old_articles(&state.db, days).await
    } else {
        clean_repository(&state.db, days).await
    }
    .map_err(ApiError::from)?;

    Ok(Json(ApiResponse::with_message(
        "Cleanup finished",
        cleanup_report_response(report),
    )))
}

// ============================================================================
// Article Curation
// ============================================================================

/// GET /api/admin/articles - List articles including archived ones.
#[utoipa::path(
    get,
    path = "/api/admin/articles",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Articles", body = Vec<AdminArticleResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_list_articles(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<PaginatedResponse<AdminArticleResponse>>, ApiError> {
    require_admin(&claims)?;
    let (offset, limit) = pagination.to_offset_limit();

    let query = ArticleQuery {
        include_archived: true,
        limit,
        offset,
        ..ArticleQuery::default()
    };

    let repo = ArticleRepository::new(state.db.pool());
    let total = repo.count(&query).await.map_err(ApiError::from)?;
    let articles = repo.list(&query).await.map_err(ApiError::from)?;

    Ok(Json(PaginatedResponse::new(
        articles.into_iter().map(article_response).collect(),
        pagination.page,
        pagination.per_page,
        total as u64,
    )))
}

/// PUT /api/admin/articles/:id/highlight - Toggle the highlight flag.
#[utoipa::path(
    put,
    path = "/api/admin/articles/{id}/highlight",
    tag = "admin",
    params(("id" = i64, Path, description = "Article ID")),
    request_body = HighlightRequest,
    responses(
        (status = 200, description = "Updated article", body = AdminArticleResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Article not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_highlight_article(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(article_id): Path<i64>,
    Json(req): Json<HighlightRequest>,
) -> Result<Json<ApiResponse<AdminArticleResponse>>, ApiError> {
    require_admin(&claims)?;

    let repo = ArticleRepository::new(state.db.pool());
    if !repo
        .set_highlighted(article_id, req.highlighted)
        .await
        .map_err(ApiError::from)?
    {
        return Err(ApiError::not_found("Article not found"));
    }

    let article = repo
        .get_by_id(article_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;

    Ok(Json(ApiResponse::new(article_response(article))))
}

/// PUT /api/admin/articles/:id/archive - Toggle the archive flag.
pub async fn admin_archive_article(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(article_id): Path<i64>,
    Json(req): Json<ArchiveRequest>,
) -> Result<Json<ApiResponse<AdminArticleResponse>>, ApiError> {
    require_admin(&claims)?;

    let repo = ArticleRepository::new(state.db.pool());
    if !repo
        .set_archived(article_id, req.archived)
        .await
        .map_err(ApiError::from)?
    {
        return Err(ApiError::not_found("Article not found"));
    }

    let article = repo
        .get_by_id(article_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;

    Ok(Json(ApiResponse::new(article_response(article))))
}

/// PUT /api/admin/articles/:id/category - Assign or clear the category.
pub async fn admin_set_article_category(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(article_id): Path<i64>,
    Json(req): Json<SetCategoryRequest>,
) -> Result<Json<ApiResponse<AdminArticleResponse>>, ApiError> {
    require_admin(&claims)?;

    if let Some(category_id) = req.category_id {
        CategoryRepository::new(state.db.pool())
            .get_by_id(category_id)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::bad_request("Unknown category"))?;
    }

    let repo = ArticleRepository::new(state.db.pool());
    if !repo
        .set_category(article_id, req.category_id)
        .await
        .map_err(ApiError::from)?
    {
        return Err(ApiError::not_found("Article not found"));
    }

    let article = repo
        .get_by_id(article_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;

    Ok(Json(ApiResponse::new(article_response(article))))
}

/// DELETE /api/admin/articles/:id - Hard-delete one article.
pub async fn admin_delete_article(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(article_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require_admin(&claims)?;

    let deleted = ArticleRepository::new(state.db.pool())
        .delete(article_id)
        .await
        .map_err(ApiError::from)?;
    if !deleted {
        return Err(ApiError::not_found("Article not found"));
    }

    crate::content::AuthorRepository::new(state.db.pool())
        .delete_orphans()
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiResponse::with_message("Article deleted", ())))
}

// ============================================================================
// Category Management
// ============================================================================

/// POST /api/admin/categories - Create a category.
#[utoipa::path(
    post,
    path = "/api/admin/categories",
    tag = "admin",
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid name or slug"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "Slug already in use")
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_create_category(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateCategoryRequest>,
) -> Result<Json<ApiResponse<CategoryResponse>>, ApiError> {
    require_admin(&claims)?;

    let mut new_category = NewCategory::new(req.name);
    if let Some(slug) = req.slug.filter(|s| !s.trim().is_empty()) {
        new_category = new_category.with_slug(crate::content::slugify(&slug));
    }
    if let Some(color) = req.color.filter(|c| !c.trim().is_empty()) {
        new_category = new_category.with_color(color);
    }

    let repo = CategoryRepository::new(state.db.pool());
    if repo
        .get_by_slug(&new_category.slug)
        .await
        .map_err(ApiError::from)?
        .is_some()
    {
        return Err(ApiError::conflict("Slug already in use"));
    }

    let category = repo.create(&new_category).await.map_err(ApiError::from)?;

    Ok(Json(ApiResponse::new(CategoryResponse {
        id: category.id,
        name: category.name,
        slug: category.slug,
        color: category.color,
    })))
}

/// PUT /api/admin/categories/:id - Update a category.
pub async fn admin_update_category(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(category_id): Path<i64>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<Json<ApiResponse<CategoryResponse>>, ApiError> {
    require_admin(&claims)?;

    let color = empty_as_none(req.color);
    let category = CategoryRepository::new(state.db.pool())
        .update(
            category_id,
            req.name.as_deref(),
            color.as_ref().map(|c| c.as_deref()),
        )
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;

    Ok(Json(ApiResponse::new(CategoryResponse {
        id: category.id,
        name: category.name,
        slug: category.slug,
        color: category.color,
    })))
}

/// DELETE /api/admin/categories/:id - Delete a category.
pub async fn admin_delete_category(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(category_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require_admin(&claims)?;

    let deleted = CategoryRepository::new(state.db.pool())
        .delete(category_id)
        .await
        .map_err(ApiError::from)?;
    if !deleted {
        return Err(ApiError::not_found("Category not found"));
    }

    Ok(Json(ApiResponse::with_message("Category deleted", ())))
}

// ============================================================================
// Banner Management
// ============================================================================

/// GET /api/admin/banners - List all banners.
#[utoipa::path(
    get,
    path = "/api/admin/banners",
    tag = "admin",
    responses(
        (status = 200, description = "All banners", body = Vec<AdminBannerResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_list_banners(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ApiResponse<Vec<AdminBannerResponse>>>, ApiError> {
    require_admin(&claims)?;

    let banners = BannerRepository::new(state.db.pool())
        .list_all()
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiResponse::new(
        banners.into_iter().map(banner_response).collect(),
    )))
}

/// POST /api/admin/banners - Create a banner.
#[utoipa::path(
    post,
    path = "/api/admin/banners",
    tag = "admin",
    request_body = CreateBannerRequest,
    responses(
        (status = 200, description = "Banner created", body = AdminBannerResponse),
        (status = 400, description = "Invalid dates or window"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_create_banner(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateBannerRequest>,
) -> Result<Json<ApiResponse<AdminBannerResponse>>, ApiError> {
    require_admin(&claims)?;

    let starts_at = parse_banner_datetime(&req.starts_at, "starts_at")?;
    let ends_at = parse_banner_datetime(&req.ends_at, "ends_at")?;

    let mut new_banner = NewBanner::new(req.title, req.image_url, req.position, starts_at, ends_at);
    if let Some(target_url) = req.target_url.filter(|u| !u.trim().is_empty()) {
        new_banner = new_banner.with_target_url(target_url);
    }
    if let Some(priority) = req.priority {
        new_banner = new_banner.with_priority(priority);
    }

    let banner = BannerRepository::new(state.db.pool())
        .create(&new_banner)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiResponse::new(banner_response(banner))))
}

/// PUT /api/admin/banners/:id - Update a banner.
pub async fn admin_update_banner(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(banner_id): Path<i64>,
    Json(req): Json<UpdateBannerRequest>,
) -> Result<Json<ApiResponse<AdminBannerResponse>>, ApiError> {
    require_admin(&claims)?;

    let mut update = BannerUpdate::new();
    if let Some(title) = req.title {
        update.title = Some(title);
    }
    if let Some(image_url) = req.image_url {
        update.image_url = Some(image_url);
    }
    if let Some(target_url) = empty_as_none(req.target_url) {
        update.target_url = Some(target_url);
    }
    if let Some(position) = req.position {
        update.position = Some(position);
    }
    if let Some(ref starts_at) = req.starts_at {
        update.starts_at = Some(parse_banner_datetime(starts_at, "starts_at")?);
    }
    if let Some(ref ends_at) = req.ends_at {
        update.ends_at = Some(parse_banner_datetime(ends_at, "ends_at")?);
    }
    if let Some(priority) = req.priority {
        update.priority = Some(priority);
    }
    if let Some(is_active) = req.is_active {
        update.is_active = Some(is_active);
    }

    let banner = BannerRepository::new(state.db.pool())
        .update(banner_id, &update)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found("Banner not found"))?;

    Ok(Json(ApiResponse::new(banner_response(banner))))
}

/// DELETE /api/admin/banners/:id - Delete a banner.
pub async fn admin_delete_banner(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(banner_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require_admin(&claims)?;

    let deleted = BannerRepository::new(state.db.pool())
        .delete(banner_id)
        .await
        .map_err(ApiError::from)?;
    if !deleted {
        return Err(ApiError::not_found("Banner not found"));
    }

    Ok(Json(ApiResponse::with_message("Banner deleted", ())))
}
