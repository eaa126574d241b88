//! MoreLikeThis configuration.
//!
//! MoreLikeThis finds documents similar to the results of the main
//! query by analyzing their interesting terms
//! (<https://solr.apache.org/guide/solr/latest/query-guide/morelikethis.html>).
//! Options live under the `mlt.` namespace; attaching the block sets
//! the top-level `mlt=true` enable flag.

use crate::param::{ParamValue, WireParams};

/// What information about matched terms Solr returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterestingTerms {
    /// Return nothing about the terms.
    None,
    /// Return the term names.
    List,
    /// Return terms with their boost values.
    Details,
}

impl InterestingTerms {
    /// Wire value for `mlt.interestingTerms`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            InterestingTerms::None => "none",
            InterestingTerms::List => "list",
            InterestingTerms::Details => "details",
        }
    }
}

/// MoreLikeThis feature block.
///
/// # Example
///
/// ```
/// use solrflow::MoreLikeThisConfig;
///
/// let mlt = MoreLikeThisConfig::new()
///     .with_fields(["title", "content"])
///     .with_min_term_freq(2)
///     .with_min_doc_freq(5)
///     .with_max_query_terms(25);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoreLikeThisConfig {
    fields: Vec<String>,
    min_term_freq: Option<u32>,
    min_doc_freq: Option<u32>,
    max_doc_freq: Option<u32>,
    max_doc_freq_pct: Option<u8>,
    min_word_len: Option<u32>,
    max_word_len: Option<u32>,
    max_query_terms: Option<u32>,
    max_tokens_parsed: Option<u32>,
    boost: Option<bool>,
    query_fields: Vec<(String, f32)>,
    interesting_terms: Option<InterestingTerms>,
    match_include: Option<bool>,
    match_offset: Option<u64>,
}

impl MoreLikeThisConfig {
    /// Create an empty block. Attaching it still enables MoreLikeThis.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fields to analyze for similarity (`mlt.fl`), comma-joined.
    /// Fields with term vectors perform best.
    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Minimum occurrences in the source document (`mlt.mintf`).
    #[must_use]
    pub fn with_min_term_freq(mut self, freq: u32) -> Self {
        self.min_term_freq = Some(freq);
        self
    }

    /// Minimum documents a term must appear in (`mlt.mindf`).
    #[must_use]
    pub fn with_min_doc_freq(mut self, freq: u32) -> Self {
        self.min_doc_freq = Some(freq);
        self
    }

    /// Maximum documents a term may appear in (`mlt.maxdf`).
    #[must_use]
    pub fn with_max_doc_freq(mut self, freq: u32) -> Self {
        self.max_doc_freq = Some(freq);
        self
    }

    /// Maximum document frequency as a percentage (`mlt.maxdfpct`).
    #[must_use]
    pub fn with_max_doc_freq_pct(mut self, pct: u8) -> Self {
        self.max_doc_freq_pct = Some(pct);
        self
    }

    /// Minimum word length in characters (`mlt.minwl`).
    #[must_use]
    pub fn with_min_word_len(mut self, len: u32) -> Self {
        self.min_word_len = Some(len);
        self
    }

    /// Maximum word length in characters (`mlt.maxwl`).
    #[must_use]
    pub fn with_max_word_len(mut self, len: u32) -> Self {
        self.max_word_len = Some(len);
        self
    }

    /// Maximum interesting terms used in the query (`mlt.maxqt`).
    #[must_use]
    pub fn with_max_query_terms(mut self, terms: u32) -> Self {
        self.max_query_terms = Some(terms);
        self
    }

    /// Maximum tokens analyzed per field without term vectors
    /// (`mlt.maxntp`).
    #[must_use]
    pub fn with_max_tokens_parsed(mut self, tokens: u32) -> Self {
        self.max_tokens_parsed = Some(tokens);
        self
    }

    /// Boost the query by each term's relevance (`mlt.boost`).
    #[must_use]
    pub fn with_boost(mut self, boost: bool) -> Self {
        self.boost = Some(boost);
        self
    }

    /// Query fields with boosts (`mlt.qf`), rendered as
    /// `field^weight` tokens. Fields must also appear in the `fields`
    /// list.
    #[must_use]
    pub fn with_query_field(mut self, field: impl Into<String>, weight: f32) -> Self {
        self.query_fields.push((field.into(), weight));
        self
    }

    /// What term information to return.
    #[must_use]
    pub fn with_interesting_terms(mut self, terms: InterestingTerms) -> Self {
        self.interesting_terms = Some(terms);
        self
    }

    /// Include the source document in results (`mlt.match.include`).
    #[must_use]
    pub fn with_match_include(mut self, include: bool) -> Self {
        self.match_include = Some(include);
        self
    }

    /// Which result document seeds the similarity query
    /// (`mlt.match.offset`).
    #[must_use]
    pub fn with_match_offset(mut self, offset: u64) -> Self {
        self.match_offset = Some(offset);
        self
    }

    /// Set `mlt=true` and emit every explicitly-set option under the
    /// `mlt.` namespace.
    pub fn flatten_into(&self, out: &mut WireParams) {
        out.insert("mlt", true);
        if !self.fields.is_empty() {
            out.insert("mlt.fl", ParamValue::CommaSeparated(self.fields.clone()));
        }
        if let Some(freq) = self.min_term_freq {
            out.insert("mlt.mintf", freq);
        }
        if let Some(freq) = self.min_doc_freq {
            out.insert("mlt.mindf", freq);
        }
        if let Some(freq) = self.max_doc_freq {
            out.insert("mlt.maxdf", freq);
        }
        if let Some(pct) = self.max_doc_freq_pct {
            out.insert("mlt.maxdfpct", i64::from(pct));
        }
        if let Some(len) = self.min_word_len {
            out.insert("mlt.minwl", len);
        }
        if let Some(len) = self.max_word_len {
            out.insert("mlt.maxwl", len);
        }
        if let Some(terms) = self.max_query_terms {
            out.insert("mlt.maxqt", terms);
        }
        if let Some(tokens) = self.max_tokens_parsed {
            out.insert("mlt.maxntp", tokens);
        }
        if let Some(boost) = self.boost {
            out.insert("mlt.boost", boost);
        }
        if !self.query_fields.is_empty() {
            out.insert(
                "mlt.qf",
                ParamValue::WeightedFields(self.query_fields.clone()),
            );
        }
        if let Some(terms) = self.interesting_terms {
            out.insert("mlt.interestingTerms", terms.as_str());
        }
        if let Some(include) = self.match_include {
            out.insert("mlt.match.include", include);
        }
        if let Some(offset) = self.match_offset {
            out.insert("mlt.match.offset", offset);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn flatten(config: &MoreLikeThisConfig) -> WireParams {
        let mut out = WireParams::new();
        config.flatten_into(&mut out);
        out
    }

    #[test]
    fn test_empty_block_still_sets_enable_flag() {
        let out = flatten(&MoreLikeThisConfig::new());
        assert_eq!(out.get("mlt"), Some(&ParamValue::Bool(true)));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_frequency_options_use_short_wire_names() {
        let out = flatten(
            &MoreLikeThisConfig::new()
                .with_min_term_freq(2)
                .with_min_doc_freq(5)
                .with_max_query_terms(25)
                .with_min_word_len(4),
        );
        assert_eq!(out.get("mlt.mintf"), Some(&ParamValue::Int(2)));
        assert_eq!(out.get("mlt.mindf"), Some(&ParamValue::Int(5)));
        assert_eq!(out.get("mlt.maxqt"), Some(&ParamValue::Int(25)));
        assert_eq!(out.get("mlt.minwl"), Some(&ParamValue::Int(4)));
    }

    #[test]
    fn test_query_fields_rendered_weighted() {
        let out = flatten(
            &MoreLikeThisConfig::new()
                .with_query_field("title", 2.0)
                .with_query_field("content", 1.0),
        );
        let pairs = out.to_query_pairs();
        assert!(pairs.contains(&("mlt.qf".to_string(), "title^2 content^1".to_string())));
    }

    #[test]
    fn test_interesting_terms_wire_values() {
        assert_eq!(InterestingTerms::None.as_str(), "none");
        assert_eq!(InterestingTerms::List.as_str(), "list");
        assert_eq!(InterestingTerms::Details.as_str(), "details");
    }
}
