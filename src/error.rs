// src/error.rs
// Error types for catalog loading and quote selection

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while serving a quote request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    /// The client asked for a category the catalog does not define
    #[error("invalid category: {0}")]
    UnknownCategory(String),

    /// The category exists but holds no quotes
    #[error("no quotes in category: {0}")]
    EmptyCategory(String),
}

impl QuoteError {
    /// True when the failure is the caller's fault rather than a data defect
    pub fn is_client_error(&self) -> bool {
        matches!(self, QuoteError::UnknownCategory(_))
    }
}

/// Errors raised while loading the quote catalog at startup
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed catalog: {0}")]
    Malformed(String),

    #[error("catalog defines no categories")]
    NoCategories,
}

/// Convenience type alias for quote request results
pub type Result<T> = std::result::Result<T, QuoteError>;
