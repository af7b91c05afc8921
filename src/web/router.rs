//! Router configuration for the bhub API.

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{admin, articles, auth, banners, categories, cron, feeds, AppState};
use super::middleware::{create_cors_layer, jwt_auth, JwtState};
use super::openapi::ApiDoc;

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: &[String],
) -> Router {
    // Public read-only surface
    let public_routes = Router::new()
        .route("/articles", get(articles::list_articles))
        .route("/articles/highlighted", get(articles::list_highlighted))
        .route("/articles/:id", get(articles::get_article))
        .route("/articles/:id/similar", get(articles::similar_articles))
        .route("/categories", get(categories::list_categories))
        .route("/feeds", get(feeds::list_feeds))
        .route("/banners/position/:position", get(banners::banners_for_position))
        .route("/banners/:id/click", post(banners::record_click));

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/refresh", post(auth::refresh))
        .route("/me", get(auth::me));

    let admin_routes = Router::new()
        .route("/feeds", get(admin::admin_list_feeds).post(admin::admin_create_feed))
        .route(
            "/feeds/:id",
            get(admin::admin_get_feed)
                .put(admin::admin_update_feed)
                .delete(admin::admin_delete_feed),
        )
        .route("/feeds/:id/sync", post(admin::admin_sync_feed))
        .route("/feeds/test", post(admin::admin_test_feed))
        .route("/feeds/verify", post(admin::admin_verify_feed))
        .route("/sync-all", post(admin::admin_sync_all))
        .route("/repository/clean", post(admin::admin_clean_repository))
        .route("/articles", get(admin::admin_list_articles))
        .route("/articles/:id", delete(admin::admin_delete_article))
        .route("/articles/:id/highlight", put(admin::admin_highlight_article))
        .route("/articles/:id/archive", put(admin::admin_archive_article))
        .route("/articles/:id/category", put(admin::admin_set_article_category))
        .route("/categories", post(admin::admin_create_category))
        .route(
            "/categories/:id",
            put(admin::admin_update_category).delete(admin::admin_delete_category),
        )
        .route("/banners", get(admin::admin_list_banners).post(admin::admin_create_banner))
        .route(
            "/banners/:id",
            put(admin::admin_update_banner).delete(admin::admin_delete_banner),
        );

    let cron_routes = Router::new()
        .route("/sync", post(cron::cron_sync))
        .route("/clean", post(cron::cron_clean));

    let api_routes = Router::new()
        .merge(public_routes)
        .nest("/auth", auth_routes)
        .nest("/admin", admin_routes)
        .nest("/cron", cron_routes);

    let jwt_state_for_middleware = jwt_state.clone();

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state_for_middleware.clone();
                    jwt_auth(state, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Create the Swagger UI router serving the OpenAPI document.
pub fn create_swagger_router() -> Router {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_health_router() {
        let _router = create_health_router();
    }

    #[test]
    fn test_create_swagger_router() {
        let _router = create_swagger_router();
    }
}
