// src/catalog/quote.rs
// Quote record and lenient conversion from loosely shaped JSON

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CatalogError;

/// A single quotation. Every field defaults to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub en: String,
    #[serde(default)]
    pub th: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub work: String,
    #[serde(default)]
    pub info: String,
    #[serde(default, rename = "ref")]
    pub reference: String,
}

// Canonical key first, then accepted aliases
const EN_KEYS: &[&str] = &["en", "text", "quote"];
const TH_KEYS: &[&str] = &["th"];
const AUTHOR_KEYS: &[&str] = &["author", "by"];
const YEAR_KEYS: &[&str] = &["year"];
const WORK_KEYS: &[&str] = &["work", "source"];
const INFO_KEYS: &[&str] = &["info", "description"];
const REF_KEYS: &[&str] = &["ref", "link", "url"];

impl Quote {
    /// Build a quote from a JSON object, accepting field aliases and scalar values
    pub fn from_json(value: &Value) -> Result<Self, CatalogError> {
        let obj = value.as_object().ok_or_else(|| {
            CatalogError::Malformed(format!("quote record must be an object, got {}", kind(value)))
        })?;

        Ok(Self {
            en: field(obj, EN_KEYS)?,
            th: field(obj, TH_KEYS)?,
            author: field(obj, AUTHOR_KEYS)?,
            year: field(obj, YEAR_KEYS)?,
            work: field(obj, WORK_KEYS)?,
            info: field(obj, INFO_KEYS)?,
            reference: field(obj, REF_KEYS)?,
        })
    }
}

/// First present, non-null key wins
fn field(obj: &Map<String, Value>, keys: &[&str]) -> Result<String, CatalogError> {
    for key in keys {
        match obj.get(*key) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) => return Ok(s.clone()),
            Some(Value::Number(n)) => return Ok(n.to_string()),
            Some(Value::Bool(b)) => return Ok(b.to_string()),
            Some(other) => {
                return Err(CatalogError::Malformed(format!(
                    "field '{key}' must be a string, got {}",
                    kind(other)
                )));
            }
        }
    }
    Ok(String::new())
}

pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_default_empty() {
        let q = Quote::from_json(&json!({ "en": "Stay hungry." })).unwrap();
        assert_eq!(q.en, "Stay hungry.");
        assert_eq!(q.th, "");
        assert_eq!(q.reference, "");
    }

    #[test]
    fn test_aliases() {
        let q = Quote::from_json(&json!({
            "text": "Know thyself.",
            "by": "Socrates",
            "source": "Delphi",
            "description": "Inscribed at the temple",
            "url": "https://example.org"
        }))
        .unwrap();
        assert_eq!(q.en, "Know thyself.");
        assert_eq!(q.author, "Socrates");
        assert_eq!(q.work, "Delphi");
        assert_eq!(q.info, "Inscribed at the temple");
        assert_eq!(q.reference, "https://example.org");
    }

    #[test]
    fn test_canonical_beats_alias() {
        let q = Quote::from_json(&json!({ "en": "primary", "text": "alias", "link": "a", "ref": "b" })).unwrap();
        assert_eq!(q.en, "primary");
        assert_eq!(q.reference, "b");
    }

    #[test]
    fn test_null_falls_through_to_alias() {
        let q = Quote::from_json(&json!({ "en": null, "quote": "fallback" })).unwrap();
        assert_eq!(q.en, "fallback");
    }

    #[test]
    fn test_scalars_are_stringified() {
        let q = Quote::from_json(&json!({ "year": 1999, "info": true })).unwrap();
        assert_eq!(q.year, "1999");
        assert_eq!(q.info, "true");
    }

    #[test]
    fn test_nested_value_rejected() {
        let err = Quote::from_json(&json!({ "author": ["a", "b"] })).unwrap_err();
        assert!(err.to_string().contains("author"));
    }

    #[test]
    fn test_non_object_rejected() {
        let err = Quote::from_json(&json!("just text")).unwrap_err();
        assert!(err.to_string().contains("must be an object"));
    }

    #[test]
    fn test_serializes_ref_key() {
        let q = Quote {
            reference: "r".to_string(),
            ..Default::default()
        };
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(v["ref"], "r");
        assert!(v.get("reference").is_none());
    }
}
