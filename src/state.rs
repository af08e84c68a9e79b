// src/state.rs
// Shared application state for the HTTP layer

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::quotes::QuoteService;
use crate::session::MemorySessionStore;

#[derive(Clone)]
pub struct AppState {
    /// Quote selection over the shared catalog
    pub quotes: QuoteService,

    /// Session records, kept concretely for expiry sweeps and health output
    pub sessions: Arc<MemorySessionStore>,

    /// Max-Age for newly issued session cookies
    pub session_max_age_secs: i64,
}

impl AppState {
    pub fn new(catalog: Catalog, session_ttl: chrono::Duration) -> Self {
        let sessions = Arc::new(MemorySessionStore::new(session_ttl));
        Self {
            quotes: QuoteService::new(Arc::new(catalog), sessions.clone()),
            sessions,
            session_max_age_secs: session_ttl.num_seconds(),
        }
    }
}
