// src/quotes.rs
// Quote request handling: category resolution, session state, selection

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::catalog::{Catalog, Quote};
use crate::error::{QuoteError, Result};
use crate::selector;
use crate::session::SessionStore;

/// A quote as returned to clients, tagged with where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotePayload {
    #[serde(flatten)]
    pub quote: Quote,
    pub category: String,
    pub index: usize,
}

/// Transport-independent quote service
#[derive(Clone)]
pub struct QuoteService {
    catalog: Arc<Catalog>,
    sessions: Arc<dyn SessionStore>,
}

impl QuoteService {
    pub fn new(catalog: Arc<Catalog>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { catalog, sessions }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn categories(&self) -> Vec<String> {
        self.catalog.categories().to_vec()
    }

    /// Serve a quote from `category` (or the first category) to `session_id`.
    ///
    /// Session state is written back only after a successful selection.
    pub fn random_quote(&self, session_id: &str, category: Option<&str>) -> Result<QuotePayload> {
        let category = match category.filter(|c| !c.is_empty()) {
            Some(name) => name,
            None => self
                .catalog
                .default_category()
                .ok_or_else(|| QuoteError::UnknownCategory(String::new()))?,
        };

        let item_count = self
            .catalog
            .item_count(category)
            .ok_or_else(|| QuoteError::UnknownCategory(category.to_string()))?;

        let mut record = self.sessions.load(session_id);
        let selection = selector::select(
            category,
            item_count,
            &record.state_for(category),
            &mut rand::rng(),
        )?;
        let index = selection.index;

        debug!(
            session = session_id,
            category,
            index,
            used = selection.state.used.len(),
            total = item_count,
            "Quote selected"
        );

        record.set_state(category, selection.state);
        self.sessions.save(session_id, record);

        let quote = self
            .catalog
            .item_at(category, index)
            .cloned()
            .ok_or_else(|| QuoteError::EmptyCategory(category.to_string()))?;

        Ok(QuotePayload {
            quote,
            category: category.to_string(),
            index,
        })
    }
}
