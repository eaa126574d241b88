//! Document shape exchanged with the server.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A schemaless Solr document.
///
/// Only `id` is modeled as a named field; every other attribute rides
/// in `extra` and survives a decode/encode round trip untouched.
///
/// # Example
///
/// ```
/// use solrflow::SolrDocument;
///
/// let doc = SolrDocument::new("42")
///     .with_field("title", "A Mouse Tale")
///     .with_field("in_stock", true);
/// assert_eq!(doc.field("title"), Some(&serde_json::json!("A Mouse Tale")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolrDocument {
    /// Unique key; optional because the server can assign one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// All remaining fields, keyed by field name.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl SolrDocument {
    /// Create a document with the given unique key.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            extra: serde_json::Map::new(),
        }
    }

    /// Set an arbitrary field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Look up a field other than `id`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_omitted_when_absent() {
        let doc = SolrDocument::default().with_field("name", "anon");
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value, json!({"name": "anon"}));
    }

    #[test]
    fn test_unknown_fields_preserved_through_round_trip() {
        let raw = json!({
            "id": "1",
            "title": "Mouse",
            "price": 12.5,
            "tags": ["peripheral", "usb"],
            "_version_": 1_699_000_000_000_i64
        });
        let doc: SolrDocument = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(doc.id.as_deref(), Some("1"));
        assert_eq!(doc.field("tags"), Some(&json!(["peripheral", "usb"])));
        assert_eq!(serde_json::to_value(&doc).unwrap(), raw);
    }
}
