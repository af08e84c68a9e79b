// src/session/cookie.rs
// Session ID extraction from the request cookie

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, HeaderValue, header, request::Parts},
};
use std::convert::Infallible;
use uuid::Uuid;

/// Name of the cookie carrying the session ID
pub const SESSION_COOKIE: &str = "dq_session";

/// Session identity for the current request.
///
/// Taken from the `dq_session` cookie when it holds a valid UUID, otherwise
/// freshly generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId {
    id: String,
    is_new: bool,
}

impl SessionId {
    pub fn generate() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            is_new: true,
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .filter(|(name, _)| *name == SESSION_COOKIE)
            .filter_map(|(_, value)| Uuid::parse_str(value.trim()).ok())
            .next()
            .map(|uuid| Self {
                id: uuid.to_string(),
                is_new: false,
            })
            .unwrap_or_else(Self::generate)
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// `Set-Cookie` value refreshing the cookie's lifetime.
    ///
    /// Sent on every successful response, new session or not, so the browser
    /// keeps the cookie as long as the server keeps the session.
    pub fn cookie_header(&self, max_age_secs: i64) -> Option<HeaderValue> {
        let cookie = format!(
            "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}",
            self.id
        );
        HeaderValue::from_str(&cookie).ok()
    }
}

impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
