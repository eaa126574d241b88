//! Typed decoding of the Solr JSON response envelope.
//!
//! The envelope is decoded structurally: documents deserialize into a
//! caller-chosen type, optional blocks (facets, highlighting,
//! grouping, MoreLikeThis) decode to `None` when the server omitted
//! them, and anything Solr returns in a shape this crate does not
//! model rides along as raw JSON.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// One term bucket of a field facet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetBucket {
    /// The facet term.
    pub value: String,
    /// Documents matching the term.
    pub count: u64,
}

/// One range facet, per field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RangeFacet {
    /// Range start counts as (lower-bound, count) buckets.
    pub counts: Vec<FacetBucket>,
    /// The gap the ranges were computed with.
    pub gap: Option<Value>,
    /// Range start as returned by the server.
    pub start: Option<Value>,
    /// Range end as returned by the server.
    pub end: Option<Value>,
    /// Count below the first range, when requested.
    pub before: Option<u64>,
    /// Count above the last range, when requested.
    pub after: Option<u64>,
    /// Count inside all ranges, when requested.
    pub between: Option<u64>,
}

/// The `facet_counts` block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FacetCounts {
    /// Counts for `facet.query` expressions, keyed by query string.
    pub queries: BTreeMap<String, u64>,
    /// Term buckets per `facet.field`, in server order.
    pub fields: BTreeMap<String, Vec<FacetBucket>>,
    /// Range buckets per `facet.range` field.
    pub ranges: BTreeMap<String, RangeFacet>,
    /// Pivot facets, unmodeled.
    pub pivots: Option<Value>,
    /// Interval facets, unmodeled.
    pub intervals: Option<Value>,
    /// Heatmap facets, unmodeled.
    pub heatmaps: Option<Value>,
}

/// A list of documents with its own pagination counters, as found in
/// the main `response` block, grouped doclists, and MoreLikeThis
/// matches.
#[derive(Debug, Clone, PartialEq)]
pub struct DocList<T> {
    /// Total matches for this list.
    pub num_found: u64,
    /// Offset of the first returned document.
    pub start: u64,
    /// Whether `num_found` is exact or a lower bound.
    pub num_found_exact: Option<bool>,
    /// Highest score in the list, when scores were requested.
    pub max_score: Option<f64>,
    /// The decoded documents.
    pub docs: Vec<T>,
}

/// One group of a grouped result.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<T> {
    /// The grouping value; `None` for documents missing the field.
    pub group_value: Option<Value>,
    /// Documents in this group.
    pub doclist: DocList<T>,
}

/// Grouped results for one `group.field` or `group.query` key.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedField<T> {
    /// Total documents matched before grouping.
    pub matches: u64,
    /// Number of distinct groups, when `group.ngroups` was requested.
    pub ngroups: Option<u64>,
    /// The groups, in server order; empty in simple format.
    pub groups: Vec<Group<T>>,
    /// Flat doclist returned by simple format.
    pub doclist: Option<DocList<T>>,
}

/// A decoded query response.
///
/// `T` is the document type; use [`crate::SolrDocument`] for
/// schemaless access or any `Deserialize` struct for typed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse<T> {
    /// Status code from the response header; 0 on success.
    pub status: i64,
    /// Server-side elapsed time in milliseconds (`QTime`).
    pub query_time: Option<i64>,
    /// Total matches. For grouped responses without a main doclist
    /// this is the sum over all grouped doclists.
    pub num_found: u64,
    /// Offset of the first returned document.
    pub start: u64,
    /// Whether `num_found` is exact or a lower bound.
    pub num_found_exact: Option<bool>,
    /// Highest score among returned documents, when requested.
    pub max_score: Option<f64>,
    /// Documents from the main `response` block.
    pub docs: Vec<T>,
    /// Facet results, when faceting was enabled.
    pub facet_counts: Option<FacetCounts>,
    /// Snippets keyed by document id, then by field.
    pub highlighting: Option<BTreeMap<String, BTreeMap<String, Vec<String>>>>,
    /// Grouped results keyed by grouping field or query.
    pub grouped: Option<BTreeMap<String, GroupedField<T>>>,
    /// Similar documents keyed by source document id.
    pub more_like_this: Option<BTreeMap<String, DocList<T>>>,
    /// MoreLikeThis interesting terms, shape depends on
    /// `mlt.interestingTerms`.
    pub interesting_terms: Option<Value>,
}

impl<T: DeserializeOwned> QueryResponse<T> {
    /// Decode a full response body.
    ///
    /// # Errors
    ///
    /// Returns a decode error when neither a `response` nor a
    /// `grouped` block is present, or when any document fails to
    /// deserialize into `T`; the failing payload is attached.
    pub fn from_json(body: Value) -> Result<Self> {
        let header = body.get("responseHeader");
        let status = header
            .and_then(|h| h.get("status"))
            .and_then(Value::as_i64)
            .unwrap_or(0);
        let query_time = header.and_then(|h| h.get("QTime")).and_then(Value::as_i64);

        let main = match body.get("response") {
            Some(block) => Some(decode_doclist::<T>(block)?),
            None => None,
        };
        let grouped = match body.get("grouped") {
            Some(block) => Some(decode_grouped::<T>(block)?),
            None => None,
        };
        if main.is_none() && grouped.is_none() {
            return Err(Error::decode(
                "body has neither a `response` nor a `grouped` block",
                Some(body),
            ));
        }

        let (num_found, start, num_found_exact, max_score, docs) = match main {
            Some(list) => (
                list.num_found,
                list.start,
                list.num_found_exact,
                list.max_score,
                list.docs,
            ),
            None => {
                let total = grouped
                    .iter()
                    .flat_map(|g| g.values())
                    .map(grouped_num_found)
                    .sum();
                (total, 0, None, None, Vec::new())
            }
        };

        let facet_counts = match body.get("facet_counts") {
            Some(block) => Some(decode_facet_counts(block)?),
            None => None,
        };
        let highlighting = match body.get("highlighting") {
            Some(block) => Some(decode_highlighting(block)?),
            None => None,
        };
        let more_like_this = match body.get("moreLikeThis") {
            Some(block) => Some(decode_more_like_this::<T>(block)?),
            None => None,
        };
        let interesting_terms = body.get("interestingTerms").cloned();

        Ok(Self {
            status,
            query_time,
            num_found,
            start,
            num_found_exact,
            max_score,
            docs,
            facet_counts,
            highlighting,
            grouped,
            more_like_this,
            interesting_terms,
        })
    }
}

fn grouped_num_found<T>(field: &GroupedField<T>) -> u64 {
    let from_groups: u64 = field.groups.iter().map(|g| g.doclist.num_found).sum();
    let from_doclist = field.doclist.as_ref().map_or(0, |d| d.num_found);
    from_groups + from_doclist
}

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a serde_json::Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| Error::decode(format!("`{what}` is not a JSON object"), Some(value.clone())))
}

fn coerce_count(value: &Value, what: &str) -> Result<u64> {
    value
        .as_u64()
        .ok_or_else(|| Error::decode(format!("`{what}` is not a count"), Some(value.clone())))
}

fn decode_doclist<T: DeserializeOwned>(value: &Value) -> Result<DocList<T>> {
    let obj = as_object(value, "response")?;
    let num_found = obj
        .get("numFound")
        .map(|v| coerce_count(v, "numFound"))
        .transpose()?
        .unwrap_or(0);
    let start = obj
        .get("start")
        .map(|v| coerce_count(v, "start"))
        .transpose()?
        .unwrap_or(0);
    let num_found_exact = obj.get("numFoundExact").and_then(Value::as_bool);
    let max_score = obj.get("maxScore").and_then(Value::as_f64);

    let raw_docs = match obj.get("docs") {
        Some(Value::Array(docs)) => docs.as_slice(),
        Some(other) => {
            return Err(Error::decode(
                "`docs` is not an array",
                Some(other.clone()),
            ))
        }
        None => &[],
    };
    let mut docs = Vec::with_capacity(raw_docs.len());
    for raw in raw_docs {
        let doc = serde_json::from_value::<T>(raw.clone()).map_err(|err| {
            Error::decode(format!("document does not fit the target type: {err}"), Some(raw.clone()))
        })?;
        docs.push(doc);
    }

    Ok(DocList {
        num_found,
        start,
        num_found_exact,
        max_score,
        docs,
    })
}

fn decode_grouped<T: DeserializeOwned>(value: &Value) -> Result<BTreeMap<String, GroupedField<T>>> {
    let obj = as_object(value, "grouped")?;
    let mut out = BTreeMap::new();
    for (key, field_value) in obj {
        let field = as_object(field_value, "grouped field")?;
        let matches = field
            .get("matches")
            .map(|v| coerce_count(v, "matches"))
            .transpose()?
            .unwrap_or(0);
        let ngroups = field
            .get("ngroups")
            .map(|v| coerce_count(v, "ngroups"))
            .transpose()?;

        let mut groups = Vec::new();
        if let Some(raw_groups) = field.get("groups") {
            let raw_groups = raw_groups.as_array().ok_or_else(|| {
                Error::decode("`groups` is not an array", Some(raw_groups.clone()))
            })?;
            for raw in raw_groups {
                let group = as_object(raw, "group")?;
                let doclist = group.get("doclist").ok_or_else(|| {
                    Error::decode("group has no `doclist`", Some(raw.clone()))
                })?;
                groups.push(Group {
                    group_value: group.get("groupValue").filter(|v| !v.is_null()).cloned(),
                    doclist: decode_doclist::<T>(doclist)?,
                });
            }
        }
        let doclist = match field.get("doclist") {
            Some(block) => Some(decode_doclist::<T>(block)?),
            None => None,
        };

        out.insert(
            key.clone(),
            GroupedField {
                matches,
                ngroups,
                groups,
                doclist,
            },
        );
    }
    Ok(out)
}

/// Facet field counts arrive either as a flat `[term, count, …]` array
/// or as an object, depending on `json.nl`.
fn decode_facet_buckets(value: &Value, what: &str) -> Result<Vec<FacetBucket>> {
    match value {
        Value::Array(items) => {
            if items.len() % 2 != 0 {
                return Err(Error::decode(
                    format!("`{what}` flat list has an odd number of entries"),
                    Some(value.clone()),
                ));
            }
            let mut buckets = Vec::with_capacity(items.len() / 2);
            for pair in items.chunks_exact(2) {
                let term = match &pair[0] {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                buckets.push(FacetBucket {
                    value: term,
                    count: coerce_count(&pair[1], what)?,
                });
            }
            Ok(buckets)
        }
        Value::Object(map) => map
            .iter()
            .map(|(term, count)| {
                Ok(FacetBucket {
                    value: term.clone(),
                    count: coerce_count(count, what)?,
                })
            })
            .collect(),
        other => Err(Error::decode(
            format!("`{what}` is neither a flat list nor an object"),
            Some(other.clone()),
        )),
    }
}

fn decode_range_facet(value: &Value) -> Result<RangeFacet> {
    let obj = as_object(value, "facet_ranges entry")?;
    let counts = match obj.get("counts") {
        Some(counts) => decode_facet_buckets(counts, "facet_ranges counts")?,
        None => Vec::new(),
    };
    Ok(RangeFacet {
        counts,
        gap: obj.get("gap").cloned(),
        start: obj.get("start").cloned(),
        end: obj.get("end").cloned(),
        before: obj.get("before").and_then(Value::as_u64),
        after: obj.get("after").and_then(Value::as_u64),
        between: obj.get("between").and_then(Value::as_u64),
    })
}

fn decode_facet_counts(value: &Value) -> Result<FacetCounts> {
    let obj = as_object(value, "facet_counts")?;
    let mut out = FacetCounts::default();

    if let Some(queries) = obj.get("facet_queries") {
        for (query, count) in as_object(queries, "facet_queries")? {
            out.queries
                .insert(query.clone(), coerce_count(count, "facet_queries")?);
        }
    }
    if let Some(fields) = obj.get("facet_fields") {
        for (field, buckets) in as_object(fields, "facet_fields")? {
            out.fields
                .insert(field.clone(), decode_facet_buckets(buckets, "facet_fields")?);
        }
    }
    if let Some(ranges) = obj.get("facet_ranges") {
        for (field, range) in as_object(ranges, "facet_ranges")? {
            out.ranges.insert(field.clone(), decode_range_facet(range)?);
        }
    }
    out.pivots = obj.get("facet_pivot").cloned();
    out.intervals = obj.get("facet_intervals").cloned();
    out.heatmaps = obj.get("facet_heatmaps").cloned();
    Ok(out)
}

fn decode_highlighting(value: &Value) -> Result<BTreeMap<String, BTreeMap<String, Vec<String>>>> {
    let obj = as_object(value, "highlighting")?;
    let mut out = BTreeMap::new();
    for (doc_id, fields) in obj {
        let mut per_field = BTreeMap::new();
        for (field, snippets) in as_object(fields, "highlighting entry")? {
            let snippets: Vec<String> = serde_json::from_value(snippets.clone()).map_err(|_| {
                Error::decode(
                    format!("highlight snippets for `{field}` are not strings"),
                    Some(snippets.clone()),
                )
            })?;
            per_field.insert(field.clone(), snippets);
        }
        out.insert(doc_id.clone(), per_field);
    }
    Ok(out)
}

fn decode_more_like_this<T: DeserializeOwned>(
    value: &Value,
) -> Result<BTreeMap<String, DocList<T>>> {
    let obj = as_object(value, "moreLikeThis")?;
    let mut out = BTreeMap::new();
    for (doc_id, list) in obj {
        out.insert(doc_id.clone(), decode_doclist::<T>(list)?);
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::SolrDocument;
    use serde::Deserialize;
    use serde_json::json;

    fn envelope(inner: Value) -> Value {
        let mut body = json!({
            "responseHeader": {"status": 0, "QTime": 7}
        });
        body.as_object_mut()
            .unwrap()
            .extend(inner.as_object().unwrap().clone());
        body
    }

    #[test]
    fn test_basic_envelope_decodes() {
        let body = envelope(json!({
            "response": {
                "numFound": 2,
                "start": 0,
                "numFoundExact": true,
                "docs": [{"id": "1", "title": "Mouse"}, {"id": "2"}]
            }
        }));
        let resp = QueryResponse::<SolrDocument>::from_json(body).unwrap();
        assert_eq!(resp.status, 0);
        assert_eq!(resp.query_time, Some(7));
        assert_eq!(resp.num_found, 2);
        assert_eq!(resp.num_found_exact, Some(true));
        assert_eq!(resp.docs.len(), 2);
        assert_eq!(resp.docs[0].id.as_deref(), Some("1"));
        assert!(resp.facet_counts.is_none());
        assert!(resp.highlighting.is_none());
        assert!(resp.grouped.is_none());
        assert!(resp.more_like_this.is_none());
    }

    #[test]
    fn test_typed_documents() {
        #[derive(Debug, Deserialize)]
        struct Product {
            id: String,
            price: f64,
        }
        let body = envelope(json!({
            "response": {"numFound": 1, "start": 0, "docs": [{"id": "p1", "price": 9.99}]}
        }));
        let resp = QueryResponse::<Product>::from_json(body).unwrap();
        assert_eq!(resp.docs[0].id, "p1");
        assert!((resp.docs[0].price - 9.99).abs() < f64::EPSILON);
    }

    #[test]
    fn test_document_decode_failure_carries_payload() {
        #[derive(Debug, Deserialize)]
        struct Strict {
            #[allow(dead_code)]
            id: i64,
        }
        let body = envelope(json!({
            "response": {"numFound": 1, "start": 0, "docs": [{"id": "not-a-number"}]}
        }));
        let err = QueryResponse::<Strict>::from_json(body).unwrap_err();
        assert_eq!(err.payload(), Some(&json!({"id": "not-a-number"})));
    }

    #[test]
    fn test_missing_response_and_grouped_is_an_error() {
        let err =
            QueryResponse::<SolrDocument>::from_json(json!({"responseHeader": {"status": 0}}))
                .unwrap_err();
        assert!(err.to_string().contains("grouped"));
    }

    #[test]
    fn test_facet_fields_flat_list_form() {
        let body = envelope(json!({
            "response": {"numFound": 0, "start": 0, "docs": []},
            "facet_counts": {
                "facet_queries": {"price:[0 TO 10]": 3},
                "facet_fields": {"category": ["electronics", 5, "books", 2]},
                "facet_ranges": {
                    "price": {
                        "counts": ["0.0", 4, "50.0", 1],
                        "gap": 50.0,
                        "start": 0.0,
                        "end": 100.0,
                        "before": 0,
                        "after": 2
                    }
                }
            }
        }));
        let resp = QueryResponse::<SolrDocument>::from_json(body).unwrap();
        let facets = resp.facet_counts.unwrap();
        assert_eq!(facets.queries["price:[0 TO 10]"], 3);
        assert_eq!(
            facets.fields["category"],
            vec![
                FacetBucket { value: "electronics".into(), count: 5 },
                FacetBucket { value: "books".into(), count: 2 }
            ]
        );
        let range = &facets.ranges["price"];
        assert_eq!(range.counts.len(), 2);
        assert_eq!(range.after, Some(2));
        assert_eq!(range.gap, Some(json!(50.0)));
    }

    #[test]
    fn test_facet_fields_map_form() {
        let body = envelope(json!({
            "response": {"numFound": 0, "start": 0, "docs": []},
            "facet_counts": {"facet_fields": {"category": {"electronics": 5, "books": 2}}}
        }));
        let resp = QueryResponse::<SolrDocument>::from_json(body).unwrap();
        let buckets = &resp.facet_counts.unwrap().fields["category"];
        assert!(buckets.contains(&FacetBucket { value: "books".into(), count: 2 }));
    }

    #[test]
    fn test_odd_flat_facet_list_rejected() {
        let body = envelope(json!({
            "response": {"numFound": 0, "start": 0, "docs": []},
            "facet_counts": {"facet_fields": {"category": ["electronics", 5, "books"]}}
        }));
        let err = QueryResponse::<SolrDocument>::from_json(body).unwrap_err();
        assert!(err.to_string().contains("odd number"));
    }

    #[test]
    fn test_highlighting_decodes() {
        let body = envelope(json!({
            "response": {"numFound": 1, "start": 0, "docs": [{"id": "1"}]},
            "highlighting": {"1": {"title": ["A <em>Mouse</em> Tale"]}}
        }));
        let resp = QueryResponse::<SolrDocument>::from_json(body).unwrap();
        let hl = resp.highlighting.unwrap();
        assert_eq!(hl["1"]["title"], vec!["A <em>Mouse</em> Tale"]);
    }

    #[test]
    fn test_grouped_response_sums_num_found() {
        let body = envelope(json!({
            "grouped": {
                "author": {
                    "matches": 10,
                    "ngroups": 2,
                    "groups": [
                        {
                            "groupValue": "carroll",
                            "doclist": {"numFound": 6, "start": 0, "docs": [{"id": "1"}]}
                        },
                        {
                            "groupValue": null,
                            "doclist": {"numFound": 4, "start": 0, "docs": [{"id": "2"}]}
                        }
                    ]
                }
            }
        }));
        let resp = QueryResponse::<SolrDocument>::from_json(body).unwrap();
        assert_eq!(resp.num_found, 10);
        assert_eq!(resp.start, 0);
        assert!(resp.docs.is_empty());

        let grouped = resp.grouped.unwrap();
        let author = &grouped["author"];
        assert_eq!(author.matches, 10);
        assert_eq!(author.ngroups, Some(2));
        assert_eq!(author.groups[0].group_value, Some(json!("carroll")));
        assert_eq!(author.groups[1].group_value, None);
        assert_eq!(author.groups[0].doclist.docs[0].id.as_deref(), Some("1"));
    }

    #[test]
    fn test_grouped_simple_format_doclist() {
        let body = envelope(json!({
            "grouped": {
                "author": {
                    "matches": 3,
                    "doclist": {"numFound": 3, "start": 0, "docs": [{"id": "1"}]}
                }
            }
        }));
        let resp = QueryResponse::<SolrDocument>::from_json(body).unwrap();
        assert_eq!(resp.num_found, 3);
        let author = &resp.grouped.unwrap()["author"];
        assert!(author.groups.is_empty());
        assert_eq!(author.doclist.as_ref().unwrap().num_found, 3);
    }

    #[test]
    fn test_more_like_this_decodes_per_source_doc() {
        let body = envelope(json!({
            "response": {"numFound": 1, "start": 0, "docs": [{"id": "1"}]},
            "moreLikeThis": {
                "1": {"numFound": 2, "start": 0, "docs": [{"id": "7"}, {"id": "9"}]}
            },
            "interestingTerms": ["title:mouse", 1.0]
        }));
        let resp = QueryResponse::<SolrDocument>::from_json(body).unwrap();
        let mlt = resp.more_like_this.unwrap();
        assert_eq!(mlt["1"].num_found, 2);
        assert_eq!(mlt["1"].docs[1].id.as_deref(), Some("9"));
        assert_eq!(resp.interesting_terms, Some(json!(["title:mouse", 1.0])));
    }

    #[test]
    fn test_missing_header_defaults() {
        let resp = QueryResponse::<SolrDocument>::from_json(json!({
            "response": {"numFound": 0, "start": 0, "docs": []}
        }))
        .unwrap();
        assert_eq!(resp.status, 0);
        assert_eq!(resp.query_time, None);
    }
}
