//! Result grouping (field collapsing) configuration.
//!
//! Grouping collapses documents that share a field value
//! (<https://solr.apache.org/guide/solr/latest/query-guide/result-grouping.html>).
//! Options live under the `group.` namespace; attaching the block sets
//! the top-level `group=true` enable flag.

use crate::error::{Error, Result};
use crate::param::{ParamValue, WireParams};

/// Shape of the grouped response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupFormat {
    /// Nested structure showing groups explicitly.
    Grouped,
    /// Flat document list.
    Simple,
}

impl GroupFormat {
    /// Wire value for `group.format`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GroupFormat::Grouped => "grouped",
            GroupFormat::Simple => "simple",
        }
    }
}

/// Grouping feature block.
///
/// # Example
///
/// ```
/// use solrflow::GroupConfig;
///
/// let group = GroupConfig::new()
///     .with_field("author")
///     .with_limit(3)
///     .with_sort("date desc")
///     .with_ngroups(true);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupConfig {
    fields: Vec<String>,
    func: Option<String>,
    queries: Vec<String>,
    limit: Option<u32>,
    offset: Option<u64>,
    sort: Option<String>,
    format: Option<GroupFormat>,
    main: Option<bool>,
    ngroups: Option<bool>,
    truncate: Option<bool>,
    facet: Option<bool>,
    cache_percent: Option<u8>,
}

impl GroupConfig {
    /// Create an empty block. Attaching it still enables grouping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Group by a field (`group.field`); may be called more than once.
    /// The field must be single-valued and indexed.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Group by a function query (`group.func`). Not supported in
    /// distributed searches.
    #[must_use]
    pub fn with_func(mut self, func: impl Into<String>) -> Self {
        self.func = Some(func.into());
        self
    }

    /// Add a custom group defined by a query (`group.query`).
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.queries.push(query.into());
        self
    }

    /// Documents to return per group.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip the first N documents within each group.
    #[must_use]
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sort order within each group.
    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Response structure format.
    #[must_use]
    pub fn with_format(mut self, format: GroupFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Return the first field grouping as the main result list.
    #[must_use]
    pub fn with_main(mut self, main: bool) -> Self {
        self.main = Some(main);
        self
    }

    /// Include the total number of unique groups.
    #[must_use]
    pub fn with_ngroups(mut self, ngroups: bool) -> Self {
        self.ngroups = Some(ngroups);
        self
    }

    /// Base facet counts on one document per group.
    #[must_use]
    pub fn with_truncate(mut self, truncate: bool) -> Self {
        self.truncate = Some(truncate);
        self
    }

    /// Enable grouped faceting (can be expensive).
    #[must_use]
    pub fn with_facet(mut self, facet: bool) -> Self {
        self.facet = Some(facet);
        self
    }

    /// Grouping cache size as a percent of the result set, 0–100.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `percent` exceeds 100.
    pub fn with_cache_percent(mut self, percent: u8) -> Result<Self> {
        if percent > 100 {
            return Err(Error::config(format!(
                "group.cache.percent must be in 0..=100, got {percent}"
            )));
        }
        self.cache_percent = Some(percent);
        Ok(self)
    }

    /// Set `group=true` and emit every explicitly-set option under the
    /// `group.` namespace.
    pub fn flatten_into(&self, out: &mut WireParams) {
        out.insert("group", true);
        if !self.fields.is_empty() {
            out.insert("group.field", ParamValue::Repeated(self.fields.clone()));
        }
        if let Some(func) = &self.func {
            out.insert("group.func", func.clone());
        }
        if !self.queries.is_empty() {
            out.insert("group.query", ParamValue::Repeated(self.queries.clone()));
        }
        if let Some(limit) = self.limit {
            out.insert("group.limit", limit);
        }
        if let Some(offset) = self.offset {
            out.insert("group.offset", offset);
        }
        if let Some(sort) = &self.sort {
            out.insert("group.sort", sort.clone());
        }
        if let Some(format) = self.format {
            out.insert("group.format", format.as_str());
        }
        if let Some(main) = self.main {
            out.insert("group.main", main);
        }
        if let Some(ngroups) = self.ngroups {
            out.insert("group.ngroups", ngroups);
        }
        if let Some(truncate) = self.truncate {
            out.insert("group.truncate", truncate);
        }
        if let Some(facet) = self.facet {
            out.insert("group.facet", facet);
        }
        if let Some(percent) = self.cache_percent {
            out.insert("group.cache.percent", i64::from(percent));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn flatten(config: &GroupConfig) -> WireParams {
        let mut out = WireParams::new();
        config.flatten_into(&mut out);
        out
    }

    #[test]
    fn test_empty_block_still_sets_enable_flag() {
        let out = flatten(&GroupConfig::new());
        assert_eq!(out.get("group"), Some(&ParamValue::Bool(true)));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_field_grouping_wire_keys() {
        let out = flatten(
            &GroupConfig::new()
                .with_field("author")
                .with_limit(3)
                .with_sort("date desc")
                .with_ngroups(true),
        );
        assert_eq!(
            out.get("group.field"),
            Some(&ParamValue::Repeated(vec!["author".into()]))
        );
        assert_eq!(out.get("group.limit"), Some(&ParamValue::Int(3)));
        assert_eq!(
            out.get("group.sort"),
            Some(&ParamValue::String("date desc".into()))
        );
        assert_eq!(out.get("group.ngroups"), Some(&ParamValue::Bool(true)));
    }

    #[test]
    fn test_query_groups_repeated() {
        let out = flatten(
            &GroupConfig::new()
                .with_query("price:[0 TO 50]")
                .with_query("price:[50 TO 100]"),
        );
        assert_eq!(
            out.get("group.query"),
            Some(&ParamValue::Repeated(vec![
                "price:[0 TO 50]".into(),
                "price:[50 TO 100]".into()
            ]))
        );
    }

    #[test]
    fn test_cache_percent_validated_at_construction() {
        let ok = GroupConfig::new().with_cache_percent(100);
        assert!(ok.is_ok());

        let err = GroupConfig::new().with_cache_percent(101).unwrap_err();
        assert!(err.to_string().contains("group.cache.percent"));
        assert!(err.is_local());
    }
}
