//! Sparse (lexical) query parsers: standard Lucene syntax, DisMax,
//! Extended DisMax, and the terms parser.
//!
//! These are the only parser families that carry feature config
//! blocks: each of faceting, grouping, highlighting, and MoreLikeThis
//! can be attached independently, and all four can coexist on one
//! query.

use crate::common::CommonParams;
use crate::configs::{
    FacetConfig, FeatureConfigs, GroupConfig, HighlightConfig, MoreLikeThisConfig,
};
use crate::error::{Error, Result};
use crate::param::{ParamValue, WireParams};
use crate::query::local_params::LocalParams;
use crate::query::SolrQuery;

/// Default operator for combining query terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperator {
    /// All terms must match.
    And,
    /// Any term may match.
    Or,
}

impl QueryOperator {
    /// Wire value for `q.op`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QueryOperator::And => "AND",
            QueryOperator::Or => "OR",
        }
    }
}

/// Standard (Lucene-syntax) query parser.
///
/// Supports full Lucene syntax: field-specific terms, boolean
/// operators, wildcards, ranges, proximity, and boosts
/// (<https://solr.apache.org/guide/solr/latest/query-guide/standard-query-parser.html>).
///
/// # Example
///
/// ```
/// use solrflow::{CommonParams, FacetConfig, SolrQuery, StandardQuery};
///
/// let query = StandardQuery::new("title:mouse")
///     .with_common(CommonParams::new().with_rows(5))
///     .with_facet(FacetConfig::new().with_fields(["category"]));
///
/// let params = query.build();
/// assert!(params.contains_key("facet.field"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StandardQuery {
    query: String,
    operator: Option<QueryOperator>,
    default_field: Option<String>,
    split_on_whitespace: Option<bool>,
    common: CommonParams,
    features: FeatureConfigs,
}

impl StandardQuery {
    /// Create a query from a Lucene-syntax query string.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            operator: None,
            default_field: None,
            split_on_whitespace: None,
            common: CommonParams::default(),
            features: FeatureConfigs::default(),
        }
    }

    /// Default operator for query expressions (`q.op`).
    #[must_use]
    pub fn with_operator(mut self, operator: QueryOperator) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Default searchable field (`df`).
    #[must_use]
    pub fn with_default_field(mut self, field: impl Into<String>) -> Self {
        self.default_field = Some(field.into());
        self
    }

    /// Analyze each whitespace-separated term separately (`sow`).
    #[must_use]
    pub fn with_split_on_whitespace(mut self, split: bool) -> Self {
        self.split_on_whitespace = Some(split);
        self
    }

    /// Attach the common parameter block.
    #[must_use]
    pub fn with_common(mut self, common: CommonParams) -> Self {
        self.common = common;
        self
    }

    /// Attach a faceting block.
    #[must_use]
    pub fn with_facet(mut self, facet: FacetConfig) -> Self {
        self.features.facet = Some(facet);
        self
    }

    /// Attach a grouping block.
    #[must_use]
    pub fn with_group(mut self, group: GroupConfig) -> Self {
        self.features.group = Some(group);
        self
    }

    /// Attach a highlighting block.
    #[must_use]
    pub fn with_highlight(mut self, highlight: HighlightConfig) -> Self {
        self.features.highlight = Some(highlight);
        self
    }

    /// Attach a MoreLikeThis block.
    #[must_use]
    pub fn with_more_like_this(mut self, mlt: MoreLikeThisConfig) -> Self {
        self.features.more_like_this = Some(mlt);
        self
    }
}

impl SolrQuery for StandardQuery {
    fn build(&self) -> WireParams {
        let mut out = WireParams::new();
        self.common.flatten_into(&mut out);
        out.insert("q", self.query.clone());
        if let Some(operator) = self.operator {
            out.insert("q.op", operator.as_str());
        }
        if let Some(field) = &self.default_field {
            out.insert("df", field.clone());
        }
        if let Some(split) = self.split_on_whitespace {
            out.insert("sow", split);
        }
        self.features.flatten_into(&mut out);
        out
    }
}

/// Fields shared between the DisMax and Extended DisMax parsers.
#[derive(Debug, Clone, Default, PartialEq)]
struct DisMaxCore {
    query: String,
    alternate_query: Option<String>,
    query_fields: Vec<(String, f32)>,
    query_slop: Option<u32>,
    min_match: Option<String>,
    phrase_fields: Vec<(String, f32)>,
    phrase_slop: Option<u32>,
    tie_breaker: Option<f32>,
    boost_queries: Vec<String>,
    boost_functions: Vec<String>,
}

impl DisMaxCore {
    fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    fn set_tie_breaker(&mut self, tie: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&tie) {
            return Err(Error::config(format!(
                "tie breaker must be in [0, 1], got {tie}"
            )));
        }
        self.tie_breaker = Some(tie);
        Ok(())
    }

    fn flatten_into(&self, out: &mut WireParams) {
        out.insert("q", self.query.clone());
        if let Some(alt) = &self.alternate_query {
            out.insert("q.alt", alt.clone());
        }
        if !self.query_fields.is_empty() {
            out.insert("qf", ParamValue::WeightedFields(self.query_fields.clone()));
        }
        if let Some(slop) = self.query_slop {
            out.insert("qs", slop);
        }
        if let Some(mm) = &self.min_match {
            out.insert("mm", mm.clone());
        }
        if !self.phrase_fields.is_empty() {
            out.insert("pf", ParamValue::WeightedFields(self.phrase_fields.clone()));
        }
        if let Some(slop) = self.phrase_slop {
            out.insert("ps", slop);
        }
        if let Some(tie) = self.tie_breaker {
            out.insert("tie", tie);
        }
        if !self.boost_queries.is_empty() {
            out.insert("bq", ParamValue::Repeated(self.boost_queries.clone()));
        }
        if !self.boost_functions.is_empty() {
            out.insert("bf", ParamValue::Repeated(self.boost_functions.clone()));
        }
    }
}

/// DisMax query parser: forgiving syntax for user-facing search, with
/// term distribution across weighted fields
/// (<https://solr.apache.org/guide/solr/latest/query-guide/dismax-query-parser.html>).
///
/// # Example
///
/// ```
/// use solrflow::{DisMaxQuery, SolrQuery};
///
/// let query = DisMaxQuery::new("apache solr")
///     .with_query_field("title", 2.0)
///     .with_query_field("body", 1.0)
///     .with_min_match("75%");
///
/// let pairs = query.build().to_query_pairs();
/// assert!(pairs.contains(&("defType".to_string(), "dismax".to_string())));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DisMaxQuery {
    core: DisMaxCore,
    common: CommonParams,
    features: FeatureConfigs,
}

impl DisMaxQuery {
    /// Create a DisMax query from user query text.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            core: DisMaxCore::new(query),
            common: CommonParams::default(),
            features: FeatureConfigs::default(),
        }
    }

    /// Alternate query used when `q` is blank (`q.alt`).
    #[must_use]
    pub fn with_alternate_query(mut self, query: impl Into<String>) -> Self {
        self.core.alternate_query = Some(query.into());
        self
    }

    /// Add a query field with its boost (`qf`).
    #[must_use]
    pub fn with_query_field(mut self, field: impl Into<String>, boost: f32) -> Self {
        self.core.query_fields.push((field.into(), boost));
        self
    }

    /// Slop for query fields (`qs`).
    #[must_use]
    pub fn with_query_slop(mut self, slop: u32) -> Self {
        self.core.query_slop = Some(slop);
        self
    }

    /// Minimum-should-match expression (`mm`), e.g. `"75%"`.
    #[must_use]
    pub fn with_min_match(mut self, mm: impl Into<String>) -> Self {
        self.core.min_match = Some(mm.into());
        self
    }

    /// Add a phrase field with its boost (`pf`).
    #[must_use]
    pub fn with_phrase_field(mut self, field: impl Into<String>, boost: f32) -> Self {
        self.core.phrase_fields.push((field.into(), boost));
        self
    }

    /// Slop for phrase fields (`ps`).
    #[must_use]
    pub fn with_phrase_slop(mut self, slop: u32) -> Self {
        self.core.phrase_slop = Some(slop);
        self
    }

    /// Tie breaker between field scores (`tie`), in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `tie` is outside `[0, 1]`.
    pub fn with_tie_breaker(mut self, tie: f32) -> Result<Self> {
        self.core.set_tie_breaker(tie)?;
        Ok(self)
    }

    /// Add a boost query (`bq`), repeated.
    #[must_use]
    pub fn with_boost_query(mut self, query: impl Into<String>) -> Self {
        self.core.boost_queries.push(query.into());
        self
    }

    /// Add a boost function (`bf`), repeated.
    #[must_use]
    pub fn with_boost_function(mut self, function: impl Into<String>) -> Self {
        self.core.boost_functions.push(function.into());
        self
    }

    /// Attach the common parameter block.
    #[must_use]
    pub fn with_common(mut self, common: CommonParams) -> Self {
        self.common = common;
        self
    }

    /// Attach a faceting block.
    #[must_use]
    pub fn with_facet(mut self, facet: FacetConfig) -> Self {
        self.features.facet = Some(facet);
        self
    }

    /// Attach a grouping block.
    #[must_use]
    pub fn with_group(mut self, group: GroupConfig) -> Self {
        self.features.group = Some(group);
        self
    }

    /// Attach a highlighting block.
    #[must_use]
    pub fn with_highlight(mut self, highlight: HighlightConfig) -> Self {
        self.features.highlight = Some(highlight);
        self
    }

    /// Attach a MoreLikeThis block.
    #[must_use]
    pub fn with_more_like_this(mut self, mlt: MoreLikeThisConfig) -> Self {
        self.features.more_like_this = Some(mlt);
        self
    }
}

impl SolrQuery for DisMaxQuery {
    fn build(&self) -> WireParams {
        let mut out = WireParams::new();
        self.common.flatten_into(&mut out);
        self.core.flatten_into(&mut out);
        out.insert("defType", "dismax");
        self.features.flatten_into(&mut out);
        out
    }
}

/// Extended DisMax (eDisMax) query parser: DisMax error tolerance
/// plus full Lucene syntax, bigram/trigram phrase boosting, and
/// stopword-aware minimum match
/// (<https://solr.apache.org/guide/solr/latest/query-guide/edismax-query-parser.html>).
#[derive(Debug, Clone, PartialEq)]
pub struct EDisMaxQuery {
    core: DisMaxCore,
    split_on_whitespace: Option<bool>,
    min_match_auto_relax: Option<bool>,
    lowercase_operators: Option<bool>,
    phrase_fields_bigram: Vec<(String, f32)>,
    phrase_slop_bigram: Option<u32>,
    phrase_fields_trigram: Vec<(String, f32)>,
    phrase_slop_trigram: Option<u32>,
    stopwords: Option<bool>,
    user_fields: Vec<String>,
    common: CommonParams,
    features: FeatureConfigs,
}

impl EDisMaxQuery {
    /// Create an eDisMax query from user query text.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            core: DisMaxCore::new(query),
            split_on_whitespace: None,
            min_match_auto_relax: None,
            lowercase_operators: None,
            phrase_fields_bigram: Vec::new(),
            phrase_slop_bigram: None,
            phrase_fields_trigram: Vec::new(),
            phrase_slop_trigram: None,
            stopwords: None,
            user_fields: Vec::new(),
            common: CommonParams::default(),
            features: FeatureConfigs::default(),
        }
    }

    /// Alternate query used when `q` is blank (`q.alt`).
    #[must_use]
    pub fn with_alternate_query(mut self, query: impl Into<String>) -> Self {
        self.core.alternate_query = Some(query.into());
        self
    }

    /// Add a query field with its boost (`qf`).
    #[must_use]
    pub fn with_query_field(mut self, field: impl Into<String>, boost: f32) -> Self {
        self.core.query_fields.push((field.into(), boost));
        self
    }

    /// Slop for query fields (`qs`).
    #[must_use]
    pub fn with_query_slop(mut self, slop: u32) -> Self {
        self.core.query_slop = Some(slop);
        self
    }

    /// Minimum-should-match expression (`mm`).
    #[must_use]
    pub fn with_min_match(mut self, mm: impl Into<String>) -> Self {
        self.core.min_match = Some(mm.into());
        self
    }

    /// Add a phrase field with its boost (`pf`).
    #[must_use]
    pub fn with_phrase_field(mut self, field: impl Into<String>, boost: f32) -> Self {
        self.core.phrase_fields.push((field.into(), boost));
        self
    }

    /// Slop for phrase fields (`ps`).
    #[must_use]
    pub fn with_phrase_slop(mut self, slop: u32) -> Self {
        self.core.phrase_slop = Some(slop);
        self
    }

    /// Tie breaker between field scores (`tie`), in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `tie` is outside `[0, 1]`.
    pub fn with_tie_breaker(mut self, tie: f32) -> Result<Self> {
        self.core.set_tie_breaker(tie)?;
        Ok(self)
    }

    /// Add a boost query (`bq`), repeated.
    #[must_use]
    pub fn with_boost_query(mut self, query: impl Into<String>) -> Self {
        self.core.boost_queries.push(query.into());
        self
    }

    /// Add a boost function (`bf`), repeated.
    #[must_use]
    pub fn with_boost_function(mut self, function: impl Into<String>) -> Self {
        self.core.boost_functions.push(function.into());
        self
    }

    /// Analyze each whitespace-separated term separately (`sow`).
    #[must_use]
    pub fn with_split_on_whitespace(mut self, split: bool) -> Self {
        self.split_on_whitespace = Some(split);
        self
    }

    /// Relax `mm` automatically when stopword removal is uneven
    /// (`mm.autoRelax`).
    #[must_use]
    pub fn with_min_match_auto_relax(mut self, relax: bool) -> Self {
        self.min_match_auto_relax = Some(relax);
        self
    }

    /// Treat lowercase `and`/`or` as operators.
    #[must_use]
    pub fn with_lowercase_operators(mut self, enabled: bool) -> Self {
        self.lowercase_operators = Some(enabled);
        self
    }

    /// Add a bigram phrase field with its boost (`pf2`).
    #[must_use]
    pub fn with_phrase_field_bigram(mut self, field: impl Into<String>, boost: f32) -> Self {
        self.phrase_fields_bigram.push((field.into(), boost));
        self
    }

    /// Slop for bigram phrase fields (`ps2`).
    #[must_use]
    pub fn with_phrase_slop_bigram(mut self, slop: u32) -> Self {
        self.phrase_slop_bigram = Some(slop);
        self
    }

    /// Add a trigram phrase field with its boost (`pf3`).
    #[must_use]
    pub fn with_phrase_field_trigram(mut self, field: impl Into<String>, boost: f32) -> Self {
        self.phrase_fields_trigram.push((field.into(), boost));
        self
    }

    /// Slop for trigram phrase fields (`ps3`).
    #[must_use]
    pub fn with_phrase_slop_trigram(mut self, slop: u32) -> Self {
        self.phrase_slop_trigram = Some(slop);
        self
    }

    /// Respect the stopword filter in the query analyzer.
    #[must_use]
    pub fn with_stopwords(mut self, respect: bool) -> Self {
        self.stopwords = Some(respect);
        self
    }

    /// Fields users may query explicitly (`uf`), space-joined.
    #[must_use]
    pub fn with_user_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.user_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Attach the common parameter block.
    #[must_use]
    pub fn with_common(mut self, common: CommonParams) -> Self {
        self.common = common;
        self
    }

    /// Attach a faceting block.
    #[must_use]
    pub fn with_facet(mut self, facet: FacetConfig) -> Self {
        self.features.facet = Some(facet);
        self
    }

    /// Attach a grouping block.
    #[must_use]
    pub fn with_group(mut self, group: GroupConfig) -> Self {
        self.features.group = Some(group);
        self
    }

    /// Attach a highlighting block.
    #[must_use]
    pub fn with_highlight(mut self, highlight: HighlightConfig) -> Self {
        self.features.highlight = Some(highlight);
        self
    }

    /// Attach a MoreLikeThis block.
    #[must_use]
    pub fn with_more_like_this(mut self, mlt: MoreLikeThisConfig) -> Self {
        self.features.more_like_this = Some(mlt);
        self
    }
}

impl SolrQuery for EDisMaxQuery {
    fn build(&self) -> WireParams {
        let mut out = WireParams::new();
        self.common.flatten_into(&mut out);
        self.core.flatten_into(&mut out);
        out.insert("defType", "edismax");
        if let Some(split) = self.split_on_whitespace {
            out.insert("sow", split);
        }
        if let Some(relax) = self.min_match_auto_relax {
            out.insert("mm.autoRelax", relax);
        }
        if let Some(enabled) = self.lowercase_operators {
            out.insert("lowercaseOperators", enabled);
        }
        if !self.phrase_fields_bigram.is_empty() {
            out.insert(
                "pf2",
                ParamValue::WeightedFields(self.phrase_fields_bigram.clone()),
            );
        }
        if let Some(slop) = self.phrase_slop_bigram {
            out.insert("ps2", slop);
        }
        if !self.phrase_fields_trigram.is_empty() {
            out.insert(
                "pf3",
                ParamValue::WeightedFields(self.phrase_fields_trigram.clone()),
            );
        }
        if let Some(slop) = self.phrase_slop_trigram {
            out.insert("ps3", slop);
        }
        if let Some(respect) = self.stopwords {
            out.insert("stopwords", respect);
        }
        if !self.user_fields.is_empty() {
            out.insert("uf", self.user_fields.join(" "));
        }
        self.features.flatten_into(&mut out);
        out
    }
}

/// How the terms parser executes the membership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermsMethod {
    /// Boolean or set query chosen by term count; the default.
    TermsFilter,
    /// Boolean query; scales poorly with many terms.
    BooleanQuery,
    /// Automaton-based matching.
    Automaton,
    /// Doc-values filtering; requires docValues on the field.
    DocValuesTermsFilter,
}

impl TermsMethod {
    /// Wire value for the `method` local param.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TermsMethod::TermsFilter => "termsFilter",
            TermsMethod::BooleanQuery => "booleanQuery",
            TermsMethod::Automaton => "automaton",
            TermsMethod::DocValuesTermsFilter => "docValuesTermsFilter",
        }
    }
}

/// Terms query parser: efficient membership matching of many discrete
/// values in one field.
///
/// The terms expression is rendered as a filter query
/// (`fq={!terms f=field}v1,v2,…`) appended after any common filters,
/// so the main query stays available and defaults to `*:*`.
///
/// # Example
///
/// ```
/// use solrflow::{SolrQuery, TermsQuery};
///
/// let query = TermsQuery::new("tags", ["rust", "search", "solr"]).unwrap();
/// let pairs = query.build().to_query_pairs();
/// assert!(pairs.contains(&("q".to_string(), "*:*".to_string())));
/// assert!(pairs.contains(&("fq".to_string(), "{!terms f=tags}rust,search,solr".to_string())));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TermsQuery {
    field: String,
    terms: Vec<String>,
    query: String,
    separator: Option<String>,
    method: Option<TermsMethod>,
    common: CommonParams,
}

impl TermsQuery {
    /// Match documents where `field` contains any of `terms`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `terms` is empty.
    pub fn new<I, S>(field: impl Into<String>, terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let terms: Vec<String> = terms.into_iter().map(Into::into).collect();
        if terms.is_empty() {
            return Err(Error::config("terms query requires at least one term"));
        }
        Ok(Self {
            field: field.into(),
            terms,
            query: "*:*".to_string(),
            separator: None,
            method: None,
            common: CommonParams::default(),
        })
    }

    /// Main query to run alongside the terms filter; defaults to
    /// `*:*`.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Separator used to join the terms into the payload; defaults to
    /// a comma. Joins only, never emitted as a header argument.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Query implementation method.
    #[must_use]
    pub fn with_method(mut self, method: TermsMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Attach the common parameter block.
    #[must_use]
    pub fn with_common(mut self, common: CommonParams) -> Self {
        self.common = common;
        self
    }
}

impl SolrQuery for TermsQuery {
    fn build(&self) -> WireParams {
        let mut out = WireParams::new();
        self.common.flatten_into(&mut out);

        let mut lp = LocalParams::new("terms").arg("f", &self.field);
        if let Some(method) = self.method {
            lp = lp.arg("method", method.as_str());
        }
        let separator = self.separator.as_deref().unwrap_or(",");
        let expr = lp.payload(self.terms.join(separator)).render();

        let mut filters = match out.get("fq") {
            Some(ParamValue::Repeated(values)) => values.clone(),
            _ => Vec::new(),
        };
        filters.push(expr);
        out.insert("fq", ParamValue::Repeated(filters));
        out.insert("q", self.query.clone());
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::common::CommonParams;
    use crate::configs::{FacetConfig, GroupConfig, HighlightConfig, MoreLikeThisConfig};

    #[test]
    fn test_standard_query_minimal() {
        let params = StandardQuery::new("title:mouse").build();
        assert_eq!(params.get("q"), Some(&ParamValue::String("title:mouse".into())));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_standard_query_with_options() {
        let params = StandardQuery::new("apache solr")
            .with_operator(QueryOperator::And)
            .with_default_field("content")
            .with_split_on_whitespace(true)
            .build();
        assert_eq!(params.get("q.op"), Some(&ParamValue::String("AND".into())));
        assert_eq!(params.get("df"), Some(&ParamValue::String("content".into())));
        assert_eq!(params.get("sow"), Some(&ParamValue::Bool(true)));
    }

    #[test]
    fn test_standard_query_scenario_with_facet() {
        // Sparse(query="title:mouse", rows=5, facet=Facet(fields=["category"]))
        let params = StandardQuery::new("title:mouse")
            .with_common(CommonParams::new().with_rows(5))
            .with_facet(FacetConfig::new().with_fields(["category"]))
            .build();

        assert_eq!(params.get("q"), Some(&ParamValue::String("title:mouse".into())));
        assert_eq!(params.get("rows"), Some(&ParamValue::Int(5)));
        assert_eq!(params.get("facet"), Some(&ParamValue::Bool(true)));
        assert_eq!(
            params.get("facet.field"),
            Some(&ParamValue::Repeated(vec!["category".into()]))
        );
    }

    #[test]
    fn test_all_four_features_coexist() {
        let params = StandardQuery::new("*:*")
            .with_facet(FacetConfig::new())
            .with_group(GroupConfig::new().with_field("author"))
            .with_highlight(HighlightConfig::new())
            .with_more_like_this(MoreLikeThisConfig::new())
            .build();

        assert_eq!(params.get("facet"), Some(&ParamValue::Bool(true)));
        assert_eq!(params.get("group"), Some(&ParamValue::Bool(true)));
        assert_eq!(params.get("hl"), Some(&ParamValue::Bool(true)));
        assert_eq!(params.get("mlt"), Some(&ParamValue::Bool(true)));
    }

    #[test]
    fn test_build_is_idempotent() {
        let query = DisMaxQuery::new("apache solr")
            .with_query_field("title", 2.0)
            .with_min_match("75%");
        assert_eq!(query.build(), query.build());
    }

    #[test]
    fn test_dismax_sets_def_type_and_weighted_fields() {
        let params = DisMaxQuery::new("apache solr")
            .with_query_field("title", 2.0)
            .with_query_field("body", 1.0)
            .with_phrase_field("title", 50.0)
            .build();

        assert_eq!(params.get("defType"), Some(&ParamValue::String("dismax".into())));
        assert_eq!(
            params.get("qf"),
            Some(&ParamValue::WeightedFields(vec![
                ("title".into(), 2.0),
                ("body".into(), 1.0)
            ]))
        );
        let pairs = params.to_query_pairs();
        assert!(pairs.contains(&("qf".to_string(), "title^2 body^1".to_string())));
        assert!(pairs.contains(&("pf".to_string(), "title^50".to_string())));
    }

    #[test]
    fn test_dismax_tie_breaker_range_validated() {
        assert!(DisMaxQuery::new("q").with_tie_breaker(0.0).is_ok());
        assert!(DisMaxQuery::new("q").with_tie_breaker(1.0).is_ok());

        let err = DisMaxQuery::new("q").with_tie_breaker(1.5).unwrap_err();
        assert!(err.is_local());
        assert!(err.to_string().contains("tie breaker"));
        assert!(DisMaxQuery::new("q").with_tie_breaker(-0.1).is_err());
    }

    #[test]
    fn test_dismax_boost_lists_repeated() {
        let params = DisMaxQuery::new("q")
            .with_boost_query("category:electronics^5")
            .with_boost_query("inStock:true^2")
            .with_boost_function("recip(rord(date),1,1000,1000)")
            .build();
        assert_eq!(
            params.get("bq"),
            Some(&ParamValue::Repeated(vec![
                "category:electronics^5".into(),
                "inStock:true^2".into()
            ]))
        );
        assert!(params.contains_key("bf"));
    }

    #[test]
    fn test_edismax_extends_dismax() {
        let params = EDisMaxQuery::new("title:solr OR content:search")
            .with_query_field("title", 5.0)
            .with_phrase_field_bigram("title", 20.0)
            .with_phrase_slop_bigram(1)
            .with_phrase_field_trigram("title", 30.0)
            .with_min_match_auto_relax(true)
            .with_user_fields(["title", "text"])
            .build();

        assert_eq!(params.get("defType"), Some(&ParamValue::String("edismax".into())));
        let pairs = params.to_query_pairs();
        assert!(pairs.contains(&("pf2".to_string(), "title^20".to_string())));
        assert!(pairs.contains(&("ps2".to_string(), "1".to_string())));
        assert!(pairs.contains(&("pf3".to_string(), "title^30".to_string())));
        assert!(pairs.contains(&("mm.autoRelax".to_string(), "true".to_string())));
        assert!(pairs.contains(&("uf".to_string(), "title text".to_string())));
    }

    #[test]
    fn test_terms_query_renders_filter_query() {
        let params = TermsQuery::new("categoryId", ["8", "6", "7"])
            .unwrap()
            .with_method(TermsMethod::BooleanQuery)
            .build();
        let pairs = params.to_query_pairs();
        assert!(pairs.contains(&("q".to_string(), "*:*".to_string())));
        assert!(pairs.contains(&(
            "fq".to_string(),
            "{!terms f=categoryId method=booleanQuery}8,6,7".to_string()
        )));
    }

    #[test]
    fn test_terms_separator_joins_payload_only() {
        use crate::query::local_params::LocalParams;

        let params = TermsQuery::new("categoryId", ["8", "6", "7"])
            .unwrap()
            .with_separator(" ")
            .build();
        let expr = params
            .to_query_pairs()
            .into_iter()
            .find(|(k, _)| k == "fq")
            .map(|(_, v)| v)
            .unwrap();
        assert_eq!(expr, "{!terms f=categoryId}8 6 7");

        // The separator must not appear as a header argument.
        let lp = LocalParams::parse(&expr).unwrap();
        assert_eq!(lp.get("separator"), None);
        assert_eq!(lp.payload_str(), "8 6 7");
    }

    #[test]
    fn test_terms_filter_appends_after_common_filters() {
        let params = TermsQuery::new("tags", ["a", "b"])
            .unwrap()
            .with_common(CommonParams::new().with_filter("inStock:true"))
            .build();
        assert_eq!(
            params.get("fq"),
            Some(&ParamValue::Repeated(vec![
                "inStock:true".into(),
                "{!terms f=tags}a,b".into()
            ]))
        );
        assert_eq!(params.get("q"), Some(&ParamValue::String("*:*".into())));
    }

    #[test]
    fn test_terms_main_query_settable() {
        let params = TermsQuery::new("tags", ["a"])
            .unwrap()
            .with_query("title:mouse")
            .build();
        assert_eq!(params.get("q"), Some(&ParamValue::String("title:mouse".into())));
    }

    #[test]
    fn test_terms_query_requires_terms() {
        let err = TermsQuery::new("tags", Vec::<String>::new()).unwrap_err();
        assert!(err.is_local());
    }

    #[test]
    fn test_common_params_flow_through_sparse_build() {
        let params = StandardQuery::new("*:*")
            .with_common(
                CommonParams::new()
                    .with_start(10)
                    .with_filter("inStock:true"),
            )
            .build();
        assert_eq!(params.get("start"), Some(&ParamValue::Int(10)));
        assert_eq!(
            params.get("fq"),
            Some(&ParamValue::Repeated(vec!["inStock:true".into()]))
        );
    }
}
