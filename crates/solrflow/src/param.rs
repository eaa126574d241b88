//! Wire parameter primitives.
//!
//! Solr's query interface is a flat set of string key/value pairs.
//! [`ParamValue`] captures the handful of shapes a value can take and
//! the exact rule for rendering each one; [`WireParams`] is the flat
//! mapping handed to the transport. Rendering is pure: the same value
//! always produces the same wire text.

use std::collections::BTreeMap;
use std::collections::btree_map;

/// A single parameter value and its wire rendering rule.
///
/// The rendering rule is part of the variant, not inferred from the
/// data: a list field is declared either repeated or comma-joined by
/// whichever model owns it.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Rendered as the lowercase literal `true` or `false`.
    Bool(bool),
    /// Rendered in decimal.
    Int(i64),
    /// Rendered with Rust's shortest-roundtrip float formatting.
    Float(f64),
    /// Rendered verbatim.
    String(String),
    /// Rendered as one `key=v` pair per element, order preserved.
    Repeated(Vec<String>),
    /// Rendered as a single comma-joined value.
    CommaSeparated(Vec<String>),
    /// Rendered as space-joined `field^weight` tokens.
    WeightedFields(Vec<(String, f32)>),
    /// A coordinate pair, rendered as `lat,lon`.
    Point(f64, f64),
}

impl ParamValue {
    /// Append this value to `out` as wire pairs under `key`.
    ///
    /// Every variant except [`ParamValue::Repeated`] contributes
    /// exactly one pair.
    pub fn append_pairs(&self, key: &str, out: &mut Vec<(String, String)>) {
        match self {
            ParamValue::Repeated(values) => {
                for value in values {
                    out.push((key.to_string(), value.clone()));
                }
            }
            other => out.push((key.to_string(), other.render())),
        }
    }

    /// Render this value as a single wire string.
    ///
    /// A [`ParamValue::Repeated`] list collapses to its comma-joined
    /// form here; use [`ParamValue::append_pairs`] where repetition
    /// matters.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            ParamValue::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            ParamValue::Int(i) => i.to_string(),
            ParamValue::Float(f) => f.to_string(),
            ParamValue::String(s) => s.clone(),
            ParamValue::Repeated(values) | ParamValue::CommaSeparated(values) => values.join(","),
            ParamValue::WeightedFields(weights) => weights
                .iter()
                .map(|(field, weight)| format!("{field}^{weight}"))
                .collect::<Vec<_>>()
                .join(" "),
            ParamValue::Point(lat, lon) => format!("{lat},{lon}"),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        // Solr counts fit comfortably in i64.
        ParamValue::Int(value as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        ParamValue::Float(f64::from(value))
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

/// The flat wire-parameter mapping produced by query composition.
///
/// Keys are Solr's documented parameter names (`q`, `fq`,
/// `facet.field`, …). Iteration order is deterministic (sorted by
/// key); the order of values inside a [`ParamValue::Repeated`] entry
/// is preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireParams {
    entries: BTreeMap<String, ParamValue>,
}

impl WireParams {
    /// Create an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, replacing any existing value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Insert a parameter only when the key is not already present.
    pub fn insert_if_absent(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.entry(key.into()).or_insert_with(|| value.into());
    }

    /// Look up a parameter by wire key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    /// Whether a wire key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Merge `overrides` into this set. On key collision the override
    /// wins; this is the caller-wins precedence seam of query
    /// composition.
    pub fn merge(&mut self, overrides: WireParams) {
        for (key, value) in overrides.entries {
            self.entries.insert(key, value);
        }
    }

    /// Number of distinct wire keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, ParamValue> {
        self.entries.iter()
    }

    /// Flatten to the `(key, value)` string pairs the transport
    /// URL-encodes. Repeated values expand to repeated keys.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.entries.len());
        for (key, value) in &self.entries {
            value.append_pairs(key, &mut pairs);
        }
        pairs
    }
}

impl<'a> IntoIterator for &'a WireParams {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = btree_map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
