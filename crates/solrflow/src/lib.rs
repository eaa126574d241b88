//! Typed client for Apache Solr's HTTP query interface.
//!
//! Queries are built as typed values and flattened deterministically
//! into the `key=value` parameters Solr expects, so the exact wire
//! request is inspectable before anything is sent. Responses decode
//! into typed structures, with documents deserializing into any
//! `serde::Deserialize` type.
//!
//! # Features
//!
//! - Sparse parsers: standard Lucene syntax, DisMax, eDisMax, terms
//! - Dense vector search: KNN, text-to-vector, similarity thresholds
//! - Spatial filtering with `geofilt` and `bbox`
//! - Faceting, grouping, highlighting, and MoreLikeThis blocks that
//!   attach to any sparse query
//! - Typed response decoding, including facet counts, highlight
//!   snippets, grouped results, and MoreLikeThis matches
//!
//! # Example
//!
//! ```no_run
//! use solrflow::{
//!     CommonParams, FacetConfig, SolrClient, SolrDocument, StandardQuery,
//! };
//!
//! # async fn run() -> solrflow::Result<()> {
//! let client = SolrClient::new("http://localhost:8983/solr", "products");
//!
//! let query = StandardQuery::new("title:mouse")
//!     .with_common(CommonParams::new().with_rows(5))
//!     .with_facet(FacetConfig::new().with_fields(["category"]));
//!
//! let response = client.search::<SolrDocument>(&query).await?;
//! for doc in &response.docs {
//!     println!("{:?}", doc.id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod common;
pub mod configs;
pub mod document;
pub mod error;
pub mod param;
pub mod query;
pub mod response;

pub use auth::SolrAuth;
pub use client::SolrClient;
pub use common::{CommonParams, DebugMode, EchoParams};
pub use configs::{
    FacetConfig, FacetMethod, FacetRange, FacetSort, GroupConfig, GroupFormat, HighlightConfig,
    HighlightEncoder, HighlightMethod, InterestingTerms, MoreLikeThisConfig, RangeInclude,
    RangeOther,
};
pub use document::SolrDocument;
pub use error::{Error, Result};
pub use param::{ParamValue, WireParams};
pub use query::dense::DenseVectorQuery;
pub use query::local_params::LocalParams;
pub use query::sparse::{
    DisMaxQuery, EDisMaxQuery, QueryOperator, StandardQuery, TermsMethod, TermsQuery,
};
pub use query::spatial::{SpatialQuery, SpatialScore};
pub use query::{compose, SolrQuery};
pub use response::{
    DocList, FacetBucket, FacetCounts, Group, GroupedField, QueryResponse, RangeFacet,
};
