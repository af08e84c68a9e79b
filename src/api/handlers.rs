// src/api/handlers.rs
// REST API handlers

use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::error::ApiResult;
use crate::session::SessionId;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RandomQuery {
    /// Category name; the first category when omitted
    pub cat: Option<String>,
}

/// GET /api/random?cat=<category>
pub async fn random_quote(
    State(state): State<AppState>,
    session: SessionId,
    Query(query): Query<RandomQuery>,
) -> ApiResult<Response> {
    let payload = state
        .quotes
        .random_quote(session.as_str(), query.cat.as_deref())?;

    let mut response = Json(payload).into_response();
    if let Some(cookie) = session.cookie_header(state.session_max_age_secs) {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    Ok(response)
}

/// GET /api/categories
pub async fn list_categories(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.quotes.categories())
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.quotes.catalog();
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "categories": catalog.categories().len(),
        "quotes": catalog.total_quotes(),
        "sessions": state.sessions.len(),
    }))
}
