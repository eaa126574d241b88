//! Dense vector search: KNN, server-side text-to-vector encoding, and
//! similarity-threshold traversal.
//!
//! All three variants render the query as a local-params expression
//! over a `DenseVectorField`, e.g. `{!knn f=embedding topK=10}[0.1,0.2]`.
//! Feature blocks (faceting, grouping, highlighting, MoreLikeThis) do
//! not apply here; only the common parameter block is carried.

use crate::common::CommonParams;
use crate::error::{Error, Result};
use crate::param::WireParams;
use crate::query::local_params::{render_vector, LocalParams};
use crate::query::SolrQuery;

/// Which dense parser runs and the knobs specific to it.
#[derive(Debug, Clone, PartialEq)]
enum DenseVariant {
    /// `{!knn}`: top-K nearest neighbors of a raw query vector.
    Knn { vector: Vec<f32>, top_k: Option<u32> },
    /// `{!knn_text_to_vector}`: the server encodes the query text with
    /// a named model before the KNN search.
    TextToVector {
        text: String,
        model: String,
        top_k: Option<u32>,
    },
    /// `{!vectorSimilarity}`: return every document above a similarity
    /// threshold instead of a fixed K.
    Similarity {
        vector: Vec<f32>,
        min_traverse: Option<f32>,
        min_return: Option<f32>,
    },
}

/// Query against a `DenseVectorField`.
///
/// # Example
///
/// ```
/// use solrflow::{DenseVectorQuery, SolrQuery};
///
/// let query = DenseVectorQuery::knn("embedding", vec![0.1, 0.2, 0.3])
///     .unwrap()
///     .with_top_k(5)
///     .unwrap();
///
/// let pairs = query.build().to_query_pairs();
/// assert!(pairs.contains(&("q".to_string(), "{!knn f=embedding topK=5}[0.1,0.2,0.3]".to_string())));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DenseVectorQuery {
    field: String,
    variant: DenseVariant,
    pre_filters: Vec<String>,
    include_tags: Vec<String>,
    exclude_tags: Vec<String>,
    common: CommonParams,
}

impl DenseVectorQuery {
    /// Top-K nearest-neighbor search with a raw query vector.
    ///
    /// The default K of 10 is Solr's, emitted explicitly so the
    /// request does not depend on server defaults.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `vector` is empty.
    pub fn knn(field: impl Into<String>, vector: Vec<f32>) -> Result<Self> {
        if vector.is_empty() {
            return Err(Error::config("query vector must not be empty"));
        }
        Ok(Self {
            field: field.into(),
            variant: DenseVariant::Knn {
                vector,
                top_k: Some(10),
            },
            pre_filters: Vec::new(),
            include_tags: Vec::new(),
            exclude_tags: Vec::new(),
            common: CommonParams::default(),
        })
    }

    /// KNN search where the server encodes `text` with `model`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `text` or `model` is empty.
    pub fn knn_from_text(
        field: impl Into<String>,
        text: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        let text = text.into();
        let model = model.into();
        if text.is_empty() {
            return Err(Error::config("query text must not be empty"));
        }
        if model.is_empty() {
            return Err(Error::config("encoding model must not be empty"));
        }
        Ok(Self {
            field: field.into(),
            variant: DenseVariant::TextToVector {
                text,
                model,
                top_k: Some(10),
            },
            pre_filters: Vec::new(),
            include_tags: Vec::new(),
            exclude_tags: Vec::new(),
            common: CommonParams::default(),
        })
    }

    /// Similarity-threshold search: every document whose similarity to
    /// `vector` clears the return threshold.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `vector` is empty.
    pub fn vector_similarity(field: impl Into<String>, vector: Vec<f32>) -> Result<Self> {
        if vector.is_empty() {
            return Err(Error::config("query vector must not be empty"));
        }
        Ok(Self {
            field: field.into(),
            variant: DenseVariant::Similarity {
                vector,
                min_traverse: None,
                min_return: None,
            },
            pre_filters: Vec::new(),
            include_tags: Vec::new(),
            exclude_tags: Vec::new(),
            common: CommonParams::default(),
        })
    }

    /// Number of neighbors to return (`topK`); KNN variants only.
    ///
    /// # Errors
    ///
    /// Returns a configuration error on a similarity-threshold query,
    /// which has no K.
    pub fn with_top_k(mut self, top_k: u32) -> Result<Self> {
        match &mut self.variant {
            DenseVariant::Knn { top_k: k, .. } | DenseVariant::TextToVector { top_k: k, .. } => {
                *k = Some(top_k);
                Ok(self)
            }
            DenseVariant::Similarity { .. } => Err(Error::config(
                "topK does not apply to a vector similarity query",
            )),
        }
    }

    /// Similarity threshold for graph traversal (`minTraverse`);
    /// similarity queries only.
    ///
    /// # Errors
    ///
    /// Returns a configuration error on a KNN query.
    pub fn with_min_traverse(mut self, threshold: f32) -> Result<Self> {
        match &mut self.variant {
            DenseVariant::Similarity { min_traverse, .. } => {
                *min_traverse = Some(threshold);
                Ok(self)
            }
            _ => Err(Error::config(
                "minTraverse only applies to a vector similarity query",
            )),
        }
    }

    /// Similarity threshold for inclusion in results (`minReturn`);
    /// similarity queries only.
    ///
    /// # Errors
    ///
    /// Returns a configuration error on a KNN query.
    pub fn with_min_return(mut self, threshold: f32) -> Result<Self> {
        match &mut self.variant {
            DenseVariant::Similarity { min_return, .. } => {
                *min_return = Some(threshold);
                Ok(self)
            }
            _ => Err(Error::config(
                "minReturn only applies to a vector similarity query",
            )),
        }
    }

    /// Restrict the vector search to documents matching this query
    /// before the traversal runs (`preFilter`); may be given more than
    /// once.
    #[must_use]
    pub fn with_pre_filter(mut self, filter: impl Into<String>) -> Self {
        self.pre_filters.push(filter.into());
        self
    }

    /// Tagged `fq` clauses to include as pre-filters (`includeTags`).
    #[must_use]
    pub fn with_include_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Tagged `fq` clauses to exclude from pre-filtering
    /// (`excludeTags`).
    #[must_use]
    pub fn with_exclude_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Attach the common parameter block.
    #[must_use]
    pub fn with_common(mut self, common: CommonParams) -> Self {
        self.common = common;
        self
    }

    fn filter_args(&self, mut lp: LocalParams) -> LocalParams {
        for filter in &self.pre_filters {
            lp = lp.arg("preFilter", filter);
        }
        if !self.include_tags.is_empty() {
            lp = lp.arg("includeTags", self.include_tags.join(","));
        }
        if !self.exclude_tags.is_empty() {
            lp = lp.arg("excludeTags", self.exclude_tags.join(","));
        }
        lp
    }
}

impl SolrQuery for DenseVectorQuery {
    fn build(&self) -> WireParams {
        let mut out = WireParams::new();
        self.common.flatten_into(&mut out);

        let lp = match &self.variant {
            DenseVariant::Knn { vector, top_k } => {
                let mut lp = LocalParams::new("knn").arg("f", &self.field);
                if let Some(k) = top_k {
                    lp = lp.arg("topK", k.to_string());
                }
                self.filter_args(lp).payload(render_vector(vector))
            }
            DenseVariant::TextToVector { text, model, top_k } => {
                let mut lp = LocalParams::new("knn_text_to_vector")
                    .arg("model", model)
                    .arg("f", &self.field);
                if let Some(k) = top_k {
                    lp = lp.arg("topK", k.to_string());
                }
                self.filter_args(lp).payload(text.clone())
            }
            DenseVariant::Similarity {
                vector,
                min_traverse,
                min_return,
            } => {
                let mut lp = LocalParams::new("vectorSimilarity").arg("f", &self.field);
                if let Some(threshold) = min_traverse {
                    lp = lp.arg("minTraverse", threshold.to_string());
                }
                if let Some(threshold) = min_return {
                    lp = lp.arg("minReturn", threshold.to_string());
                }
                self.filter_args(lp).payload(render_vector(vector))
            }
        };

        out.insert("q", lp.render());
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::common::CommonParams;

    fn q_value(params: &WireParams) -> String {
        params
            .to_query_pairs()
            .into_iter()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v)
            .unwrap()
    }

    #[test]
    fn test_knn_defaults_top_k_to_ten() {
        let params = DenseVectorQuery::knn("embedding", vec![1.0, 0.0]).unwrap().build();
        assert_eq!(q_value(&params), "{!knn f=embedding topK=10}[1,0]");
    }

    #[test]
    fn test_knn_rejects_empty_vector() {
        let err = DenseVectorQuery::knn("embedding", Vec::new()).unwrap_err();
        assert!(err.is_local());
        assert!(err.to_string().contains("vector"));
    }

    #[test]
    fn test_knn_with_pre_filter_and_tags() {
        let params = DenseVectorQuery::knn("vec", vec![0.5, 0.25])
            .unwrap()
            .with_top_k(3)
            .unwrap()
            .with_pre_filter("inStock:true")
            .with_exclude_tags(["taggedFilter"])
            .build();
        assert_eq!(
            q_value(&params),
            "{!knn f=vec topK=3 preFilter=inStock:true excludeTags=taggedFilter}[0.5,0.25]"
        );
    }

    #[test]
    fn test_text_to_vector_carries_model_and_text_payload() {
        let params = DenseVectorQuery::knn_from_text("embedding", "wireless mouse", "bert-mini")
            .unwrap()
            .with_top_k(5)
            .unwrap()
            .build();
        assert_eq!(
            q_value(&params),
            "{!knn_text_to_vector model=bert-mini f=embedding topK=5}wireless mouse"
        );
    }

    #[test]
    fn test_text_to_vector_requires_text_and_model() {
        assert!(DenseVectorQuery::knn_from_text("f", "", "model").is_err());
        assert!(DenseVectorQuery::knn_from_text("f", "text", "").is_err());
    }

    #[test]
    fn test_similarity_thresholds() {
        let params = DenseVectorQuery::vector_similarity("embedding", vec![0.1, 0.2])
            .unwrap()
            .with_min_traverse(0.5)
            .unwrap()
            .with_min_return(0.7)
            .unwrap()
            .build();
        assert_eq!(
            q_value(&params),
            "{!vectorSimilarity f=embedding minTraverse=0.5 minReturn=0.7}[0.1,0.2]"
        );
    }

    #[test]
    fn test_variant_incompatible_setters_rejected() {
        let sim = DenseVectorQuery::vector_similarity("f", vec![1.0]).unwrap();
        assert!(sim.with_top_k(5).is_err());

        let knn = DenseVectorQuery::knn("f", vec![1.0]).unwrap();
        assert!(knn.clone().with_min_traverse(0.5).is_err());
        assert!(knn.with_min_return(0.5).is_err());
    }

    #[test]
    fn test_rendered_local_params_round_trip() {
        use crate::query::local_params::{parse_vector, LocalParams};

        let params = DenseVectorQuery::knn("embedding", vec![0.25, -1.5, 3.0])
            .unwrap()
            .with_top_k(7)
            .unwrap()
            .build();

        let lp = LocalParams::parse(&q_value(&params)).unwrap();
        assert_eq!(lp.parser_name(), "knn");
        assert_eq!(lp.get("f"), Some("embedding"));
        assert_eq!(lp.get("topK"), Some("7"));
        assert_eq!(parse_vector(lp.payload_str()).unwrap(), vec![0.25, -1.5, 3.0]);
    }

    #[test]
    fn test_common_params_carried() {
        let params = DenseVectorQuery::knn("embedding", vec![1.0])
            .unwrap()
            .with_common(CommonParams::new().with_rows(20).with_filter("type:doc"))
            .build();
        assert!(params.contains_key("rows"));
        assert!(params.contains_key("fq"));
    }
}
