// src/lib.rs

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod quotes;
pub mod selector;
pub mod session;
pub mod state;

pub use catalog::{Catalog, Quote};
pub use error::{CatalogError, QuoteError};
pub use quotes::{QuotePayload, QuoteService};
pub use selector::{CategoryState, Selection, select};
