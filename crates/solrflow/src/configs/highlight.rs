//! Highlighting configuration.
//!
//! Highlighting returns snippets of matching documents with query
//! terms emphasized
//! (<https://solr.apache.org/guide/solr/latest/query-guide/highlighting.html>).
//! Options live under the `hl.` namespace; attaching the block sets
//! the top-level `hl=true` enable flag.

use crate::param::{ParamValue, WireParams};

/// Highlighting implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightMethod {
    /// Most accurate; recommended.
    Unified,
    /// Legacy highlighter, works with any field configuration.
    Original,
    /// Fast for large documents; requires term vectors.
    FastVector,
}

impl HighlightMethod {
    /// Wire value for `hl.method`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HighlightMethod::Unified => "unified",
            HighlightMethod::Original => "original",
            HighlightMethod::FastVector => "fastVector",
        }
    }
}

/// Snippet text encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightEncoder {
    /// No escaping.
    Plain,
    /// HTML-escape snippet text outside the highlight tags.
    Html,
}

impl HighlightEncoder {
    /// Wire value for `hl.encoder`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HighlightEncoder::Plain => "",
            HighlightEncoder::Html => "html",
        }
    }
}

/// Highlighting feature block.
///
/// # Example
///
/// ```
/// use solrflow::{HighlightConfig, HighlightMethod};
///
/// let highlight = HighlightConfig::new()
///     .with_method(HighlightMethod::Unified)
///     .with_fields(["title", "content"])
///     .with_snippets(3)
///     .with_fragsize(150)
///     .with_tags("<mark>", "</mark>");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightConfig {
    method: Option<HighlightMethod>,
    fields: Vec<String>,
    query: Option<String>,
    query_parser: Option<String>,
    require_field_match: Option<bool>,
    use_phrase_highlighter: Option<bool>,
    highlight_multi_term: Option<bool>,
    snippets: Option<u32>,
    fragsize: Option<u32>,
    tag_pre: Option<String>,
    tag_post: Option<String>,
    encoder: Option<HighlightEncoder>,
}

impl HighlightConfig {
    /// Create an empty block. Attaching it still enables highlighting.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlighting implementation to use.
    #[must_use]
    pub fn with_method(mut self, method: HighlightMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Fields to generate snippets for (`hl.fl`), comma-joined.
    /// Fields must be stored.
    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Query used for highlighting instead of the main query (`hl.q`).
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Query parser for the highlight query (`hl.qparser`).
    #[must_use]
    pub fn with_query_parser(mut self, parser: impl Into<String>) -> Self {
        self.query_parser = Some(parser.into());
        self
    }

    /// Only highlight terms in the field they matched.
    #[must_use]
    pub fn with_require_field_match(mut self, require: bool) -> Self {
        self.require_field_match = Some(require);
        self
    }

    /// Highlight complete phrases accurately.
    #[must_use]
    pub fn with_use_phrase_highlighter(mut self, enabled: bool) -> Self {
        self.use_phrase_highlighter = Some(enabled);
        self
    }

    /// Highlight wildcard, fuzzy, and range query matches.
    #[must_use]
    pub fn with_highlight_multi_term(mut self, enabled: bool) -> Self {
        self.highlight_multi_term = Some(enabled);
        self
    }

    /// Maximum snippets per field (`hl.snippets`).
    #[must_use]
    pub fn with_snippets(mut self, snippets: u32) -> Self {
        self.snippets = Some(snippets);
        self
    }

    /// Snippet size in characters (`hl.fragsize`); 0 highlights the
    /// whole field.
    #[must_use]
    pub fn with_fragsize(mut self, fragsize: u32) -> Self {
        self.fragsize = Some(fragsize);
        self
    }

    /// Markup placed before and after each highlighted term
    /// (`hl.tag.pre` / `hl.tag.post`).
    #[must_use]
    pub fn with_tags(mut self, pre: impl Into<String>, post: impl Into<String>) -> Self {
        self.tag_pre = Some(pre.into());
        self.tag_post = Some(post.into());
        self
    }

    /// Snippet text encoder.
    #[must_use]
    pub fn with_encoder(mut self, encoder: HighlightEncoder) -> Self {
        self.encoder = Some(encoder);
        self
    }

    /// Set `hl=true` and emit every explicitly-set option under the
    /// `hl.` namespace.
    pub fn flatten_into(&self, out: &mut WireParams) {
        out.insert("hl", true);
        if let Some(method) = self.method {
            out.insert("hl.method", method.as_str());
        }
        if !self.fields.is_empty() {
            out.insert("hl.fl", ParamValue::CommaSeparated(self.fields.clone()));
        }
        if let Some(query) = &self.query {
            out.insert("hl.q", query.clone());
        }
        if let Some(parser) = &self.query_parser {
            out.insert("hl.qparser", parser.clone());
        }
        if let Some(require) = self.require_field_match {
            out.insert("hl.requireFieldMatch", require);
        }
        if let Some(enabled) = self.use_phrase_highlighter {
            out.insert("hl.usePhraseHighlighter", enabled);
        }
        if let Some(enabled) = self.highlight_multi_term {
            out.insert("hl.highlightMultiTerm", enabled);
        }
        if let Some(snippets) = self.snippets {
            out.insert("hl.snippets", snippets);
        }
        if let Some(fragsize) = self.fragsize {
            out.insert("hl.fragsize", fragsize);
        }
        if let Some(pre) = &self.tag_pre {
            out.insert("hl.tag.pre", pre.clone());
        }
        if let Some(post) = &self.tag_post {
            out.insert("hl.tag.post", post.clone());
        }
        if let Some(encoder) = self.encoder {
            out.insert("hl.encoder", encoder.as_str());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn flatten(config: &HighlightConfig) -> WireParams {
        let mut out = WireParams::new();
        config.flatten_into(&mut out);
        out
    }

    #[test]
    fn test_empty_block_still_sets_enable_flag() {
        let out = flatten(&HighlightConfig::new());
        assert_eq!(out.get("hl"), Some(&ParamValue::Bool(true)));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_fields_comma_joined_under_hl_fl() {
        let out = flatten(&HighlightConfig::new().with_fields(["title", "content"]));
        let pairs = out.to_query_pairs();
        assert!(pairs.contains(&("hl.fl".to_string(), "title,content".to_string())));
    }

    #[test]
    fn test_options_use_exact_wire_names() {
        let out = flatten(
            &HighlightConfig::new()
                .with_method(HighlightMethod::FastVector)
                .with_snippets(3)
                .with_fragsize(150)
                .with_tags("<mark>", "</mark>")
                .with_require_field_match(true),
        );
        assert_eq!(
            out.get("hl.method"),
            Some(&ParamValue::String("fastVector".into()))
        );
        assert_eq!(out.get("hl.snippets"), Some(&ParamValue::Int(3)));
        assert_eq!(out.get("hl.fragsize"), Some(&ParamValue::Int(150)));
        assert_eq!(
            out.get("hl.tag.pre"),
            Some(&ParamValue::String("<mark>".into()))
        );
        assert_eq!(
            out.get("hl.tag.post"),
            Some(&ParamValue::String("</mark>".into()))
        );
        assert_eq!(
            out.get("hl.requireFieldMatch"),
            Some(&ParamValue::Bool(true))
        );
    }
}
