// src/catalog/mod.rs
// Read-only quote catalog: category name -> ordered quotes

mod quote;

pub use quote::Quote;

use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use crate::error::CatalogError;

/// Category name used when the source is a flat list of quotes
pub const DEFAULT_IMPLICIT_CATEGORY: &str = "ทั้งหมด";

/// Immutable catalog loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Category names in source order
    names: Vec<String>,
    /// Quotes per category, parallel to `names`
    quotes: Vec<Vec<Quote>>,
    /// Name -> position in `names`
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Load a catalog from a JSON file on disk
    pub fn load(path: &Path, implicit_category: &str) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&content, implicit_category)?;
        info!(
            path = %path.display(),
            categories = catalog.names.len(),
            quotes = catalog.total_quotes(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse a catalog from JSON text.
    ///
    /// Accepts either an array of quotes (stored under `implicit_category`)
    /// or an object mapping category names to arrays of quotes.
    pub fn from_json_str(json: &str, implicit_category: &str) -> Result<Self, CatalogError> {
        let raw: Value = serde_json::from_str(json)?;
        Self::from_value(&raw, implicit_category)
    }

    pub fn from_value(raw: &Value, implicit_category: &str) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        match raw {
            Value::Array(items) => {
                catalog.push(implicit_category.to_string(), parse_list(implicit_category, items)?);
            }
            Value::Object(map) => {
                if map.is_empty() {
                    return Err(CatalogError::NoCategories);
                }
                for (name, value) in map {
                    let items = value.as_array().ok_or_else(|| {
                        CatalogError::Malformed(format!(
                            "category '{name}' must be an array, got {}",
                            quote::kind(value)
                        ))
                    })?;
                    catalog.push(name.clone(), parse_list(name, items)?);
                }
            }
            other => {
                return Err(CatalogError::Malformed(format!(
                    "top level must be an array or object, got {}",
                    quote::kind(other)
                )));
            }
        }
        Ok(catalog)
    }

    /// Build a catalog directly from in-memory categories
    pub fn from_categories<I>(categories: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<Quote>)>,
    {
        let mut catalog = Self::default();
        for (name, quotes) in categories {
            catalog.push(name, quotes);
        }
        catalog
    }

    fn push(&mut self, name: String, quotes: Vec<Quote>) {
        if quotes.is_empty() {
            debug!(category = %name, "Category has no quotes");
        }
        // Later duplicates replace earlier ones but keep the first position
        if let Some(&pos) = self.index.get(&name) {
            self.quotes[pos] = quotes;
            return;
        }
        self.index.insert(name.clone(), self.names.len());
        self.names.push(name);
        self.quotes.push(quotes);
    }

    /// Category names in source order
    pub fn categories(&self) -> &[String] {
        &self.names
    }

    /// The first category, used when a request names none
    pub fn default_category(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }

    /// Number of quotes in a category, `None` if the category is unknown
    pub fn item_count(&self, category: &str) -> Option<usize> {
        self.index.get(category).map(|&pos| self.quotes[pos].len())
    }

    pub fn item_at(&self, category: &str, index: usize) -> Option<&Quote> {
        self.index
            .get(category)
            .and_then(|&pos| self.quotes[pos].get(index))
    }

    pub fn total_quotes(&self) -> usize {
        self.quotes.iter().map(Vec::len).sum()
    }
}

fn parse_list(category: &str, items: &[Value]) -> Result<Vec<Quote>, CatalogError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            Quote::from_json(item).map_err(|e| match e {
                CatalogError::Malformed(msg) => {
                    CatalogError::Malformed(format!("{category}[{i}]: {msg}"))
                }
                other => other,
            })
        })
        .collect()
}
