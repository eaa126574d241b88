//! Faceting configuration.
//!
//! Faceting breaks search results down into value or range buckets
//! with counts
//! (<https://solr.apache.org/guide/solr/latest/query-guide/faceting.html>).
//! All options live under the `facet.` namespace; attaching the block
//! sets the top-level `facet=true` enable flag. Range facets use
//! Solr's per-field override form (`f.<field>.facet.range.start` …) so
//! each configured range stays independent.

use crate::param::{ParamValue, WireParams};

/// How to order facet field terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetSort {
    /// Most frequent first.
    Count,
    /// Lexicographic order.
    Index,
}

impl FacetSort {
    /// Wire value for `facet.sort`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FacetSort::Count => "count",
            FacetSort::Index => "index",
        }
    }
}

/// Faceting algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetMethod {
    /// Enumerate all terms; good for low-cardinality fields.
    Enum,
    /// Field cache; good for high-cardinality fields.
    FieldCache,
    /// Per-segment faceting for frequently updated indexes.
    PerSegment,
}

impl FacetMethod {
    /// Wire value for `facet.method`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FacetMethod::Enum => "enum",
            FacetMethod::FieldCache => "fc",
            FacetMethod::PerSegment => "fcs",
        }
    }
}

/// Extra range buckets to count beyond start/end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOther {
    /// Documents below the first range.
    Before,
    /// Documents above the last range.
    After,
    /// Documents between start and end.
    Between,
    /// No additional buckets.
    None,
    /// Before, after, and between.
    All,
}

impl RangeOther {
    /// Wire value for `facet.range.other`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RangeOther::Before => "before",
            RangeOther::After => "after",
            RangeOther::Between => "between",
            RangeOther::None => "none",
            RangeOther::All => "all",
        }
    }
}

/// Which range boundaries are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeInclude {
    /// All ranges include their lower bound.
    Lower,
    /// All ranges include their upper bound.
    Upper,
    /// First and last ranges include their edge bounds.
    Edge,
    /// Before/after ranges are inclusive.
    Outer,
    /// All of the above.
    All,
}

impl RangeInclude {
    /// Wire value for `facet.range.include`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RangeInclude::Lower => "lower",
            RangeInclude::Upper => "upper",
            RangeInclude::Edge => "edge",
            RangeInclude::Outer => "outer",
            RangeInclude::All => "all",
        }
    }
}

/// One range facet over a field: `[start, end)` buckets of width `gap`.
///
/// Bounds and gap are wire strings so numeric (`"0"`, `"100"`) and
/// date-math (`"NOW/DAY-30DAYS"`, `"+1DAY"`) ranges both work.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetRange {
    field: String,
    start: String,
    end: String,
    gap: String,
    hardend: Option<bool>,
    other: Option<RangeOther>,
    include: Option<RangeInclude>,
}

impl FacetRange {
    /// Range facet over `field` from `start` to `end` in `gap` steps.
    #[must_use]
    pub fn new(
        field: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
        gap: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            start: start.into(),
            end: end.into(),
            gap: gap.into(),
            hardend: None,
            other: None,
            include: None,
        }
    }

    /// Use the exact `end` as the upper bound of the last bucket.
    #[must_use]
    pub fn with_hardend(mut self, hardend: bool) -> Self {
        self.hardend = Some(hardend);
        self
    }

    /// Request additional before/after/between counts.
    #[must_use]
    pub fn with_other(mut self, other: RangeOther) -> Self {
        self.other = Some(other);
        self
    }

    /// Control boundary inclusiveness.
    #[must_use]
    pub fn with_include(mut self, include: RangeInclude) -> Self {
        self.include = Some(include);
        self
    }

    fn flatten_into(&self, out: &mut WireParams) {
        let prefix = format!("f.{}.facet.range", self.field);
        out.insert(format!("{prefix}.start"), self.start.clone());
        out.insert(format!("{prefix}.end"), self.end.clone());
        out.insert(format!("{prefix}.gap"), self.gap.clone());
        if let Some(hardend) = self.hardend {
            out.insert(format!("{prefix}.hardend"), hardend);
        }
        if let Some(other) = self.other {
            out.insert(format!("{prefix}.other"), other.as_str());
        }
        if let Some(include) = self.include {
            out.insert(format!("{prefix}.include"), include.as_str());
        }
    }
}

/// Faceting feature block.
///
/// # Example
///
/// ```
/// use solrflow::{FacetConfig, FacetRange, FacetSort};
///
/// let facet = FacetConfig::new()
///     .with_fields(["category", "brand"])
///     .with_limit(10)
///     .with_mincount(1)
///     .with_sort(FacetSort::Count)
///     .with_range(FacetRange::new("price", "0", "1000", "100"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacetConfig {
    queries: Vec<String>,
    fields: Vec<String>,
    prefix: Option<String>,
    contains: Option<String>,
    contains_ignore_case: Option<bool>,
    matches: Option<String>,
    sort: Option<FacetSort>,
    limit: Option<i64>,
    offset: Option<u64>,
    mincount: Option<u64>,
    missing: Option<bool>,
    method: Option<FacetMethod>,
    exists: Option<bool>,
    exclude_terms: Option<String>,
    pivot_fields: Vec<String>,
    pivot_mincount: Option<u64>,
    ranges: Vec<FacetRange>,
}

impl FacetConfig {
    /// Create an empty block. Attaching it still enables faceting.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an arbitrary facet query (`facet.query`), repeated.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.queries.push(query.into());
        self
    }

    /// Fields to facet on (`facet.field`), repeated.
    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Limit facet terms to those starting with this prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Limit facet terms to those containing this substring.
    #[must_use]
    pub fn with_contains(mut self, contains: impl Into<String>, ignore_case: bool) -> Self {
        self.contains = Some(contains.into());
        self.contains_ignore_case = Some(ignore_case);
        self
    }

    /// Only return facet terms matching this regular expression.
    #[must_use]
    pub fn with_matches(mut self, pattern: impl Into<String>) -> Self {
        self.matches = Some(pattern.into());
        self
    }

    /// Ordering of facet terms.
    #[must_use]
    pub fn with_sort(mut self, sort: FacetSort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Number of facet counts to return; `-1` for all.
    #[must_use]
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Offset into the facet list for paging.
    #[must_use]
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Minimum count for a facet term to be returned.
    #[must_use]
    pub fn with_mincount(mut self, mincount: u64) -> Self {
        self.mincount = Some(mincount);
        self
    }

    /// Include the count of results with no facet value.
    #[must_use]
    pub fn with_missing(mut self, missing: bool) -> Self {
        self.missing = Some(missing);
        self
    }

    /// Faceting algorithm to use.
    #[must_use]
    pub fn with_method(mut self, method: FacetMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Cap facet counts at 1 (`facet.exists`).
    #[must_use]
    pub fn with_exists(mut self, exists: bool) -> Self {
        self.exists = Some(exists);
        self
    }

    /// Terms to remove from facet counts (`facet.excludeTerms`).
    #[must_use]
    pub fn with_exclude_terms(mut self, terms: impl Into<String>) -> Self {
        self.exclude_terms = Some(terms.into());
        self
    }

    /// Fields for pivot (decision-tree) faceting, comma-joined.
    #[must_use]
    pub fn with_pivot_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pivot_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Minimum count for pivot facet inclusion.
    #[must_use]
    pub fn with_pivot_mincount(mut self, mincount: u64) -> Self {
        self.pivot_mincount = Some(mincount);
        self
    }

    /// Add a range facet; ranges are emitted in insertion order.
    #[must_use]
    pub fn with_range(mut self, range: FacetRange) -> Self {
        self.ranges.push(range);
        self
    }

    /// Set `facet=true` and emit every explicitly-set option under the
    /// `facet.` namespace.
    pub fn flatten_into(&self, out: &mut WireParams) {
        out.insert("facet", true);
        if !self.queries.is_empty() {
            out.insert("facet.query", ParamValue::Repeated(self.queries.clone()));
        }
        if !self.fields.is_empty() {
            out.insert("facet.field", ParamValue::Repeated(self.fields.clone()));
        }
        if let Some(prefix) = &self.prefix {
            out.insert("facet.prefix", prefix.clone());
        }
        if let Some(contains) = &self.contains {
            out.insert("facet.contains", contains.clone());
        }
        if let Some(ignore_case) = self.contains_ignore_case {
            out.insert("facet.contains.ignoreCase", ignore_case);
        }
        if let Some(matches) = &self.matches {
            out.insert("facet.matches", matches.clone());
        }
        if let Some(sort) = self.sort {
            out.insert("facet.sort", sort.as_str());
        }
        if let Some(limit) = self.limit {
            out.insert("facet.limit", limit);
        }
        if let Some(offset) = self.offset {
            out.insert("facet.offset", offset);
        }
        if let Some(mincount) = self.mincount {
            out.insert("facet.mincount", mincount);
        }
        if let Some(missing) = self.missing {
            out.insert("facet.missing", missing);
        }
        if let Some(method) = self.method {
            out.insert("facet.method", method.as_str());
        }
        if let Some(exists) = self.exists {
            out.insert("facet.exists", exists);
        }
        if let Some(terms) = &self.exclude_terms {
            out.insert("facet.excludeTerms", terms.clone());
        }
        if !self.pivot_fields.is_empty() {
            out.insert(
                "facet.pivot",
                ParamValue::CommaSeparated(self.pivot_fields.clone()),
            );
        }
        if let Some(mincount) = self.pivot_mincount {
            out.insert("facet.pivot.mincount", mincount);
        }
        if !self.ranges.is_empty() {
            out.insert(
                "facet.range",
                ParamValue::Repeated(self.ranges.iter().map(|r| r.field.clone()).collect()),
            );
            for range in &self.ranges {
                range.flatten_into(out);
            }
        }
    }
}
