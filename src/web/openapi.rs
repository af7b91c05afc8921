//! OpenAPI documentation for the admin and cron surface.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::dto::{
    AdminArticleResponse, AdminBannerResponse, AdminFeedResponse, ArchiveRequest, CategoryResponse,
    CleanRepositoryRequest, CleanupReportResponse, CreateBannerRequest, CreateCategoryRequest,
    CreateFeedRequest, FeedEntryPreview, FeedSyncResponse, FeedTestResponse, FeedUrlRequest,
    FeedVerifyResponse, HighlightRequest, PaginationMeta, SetCategoryRequest, SyncFailureResponse,
    SyncReportResponse, UpdateBannerRequest, UpdateCategoryRequest, UpdateFeedRequest,
};
use super::handlers::{admin, cron};

/// OpenAPI document for the bhub API.
#[derive(OpenApi)]
#[openapi(
    paths(
        admin::admin_list_feeds,
        admin::admin_create_feed,
        admin::admin_sync_feed,
        admin::admin_test_feed,
        admin::admin_verify_feed,
        admin::admin_sync_all,
        admin::admin_clean_repository,
        admin::admin_list_articles,
        admin::admin_highlight_article,
        admin::admin_create_category,
        admin::admin_list_banners,
        admin::admin_create_banner,
        cron::cron_sync,
        cron::cron_clean,
    ),
    components(schemas(
        AdminArticleResponse,
        AdminBannerResponse,
        AdminFeedResponse,
        ArchiveRequest,
        CategoryResponse,
        CleanRepositoryRequest,
        CleanupReportResponse,
        CreateBannerRequest,
        CreateCategoryRequest,
        CreateFeedRequest,
        FeedEntryPreview,
        FeedSyncResponse,
        FeedTestResponse,
        FeedUrlRequest,
        FeedVerifyResponse,
        HighlightRequest,
        PaginationMeta,
        SetCategoryRequest,
        SyncFailureResponse,
        SyncReportResponse,
        UpdateBannerRequest,
        UpdateCategoryRequest,
        UpdateFeedRequest,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "admin", description = "Feed management, curation and cleanup"),
        (name = "cron", description = "Scheduler-driven jobs")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
