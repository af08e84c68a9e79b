// src/api/router.rs
// HTTP router composition

use axum::{
    Router,
    http::{HeaderValue, header},
    routing::get,
};
use std::path::Path;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::state::AppState;

/// Build the application router.
///
/// `/api/*` answers are never cacheable. When `static_dir` is given, any
/// unmatched path is served from it, with `/` mapping to `index.html`.
pub fn create_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_router = Router::new()
        .route("/random", get(handlers::random_quote))
        .route("/categories", get(handlers::list_categories))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_router);

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
