//! Common query parameters shared by every parser family.
//!
//! Mirrors Solr's common query parameter set
//! (<https://solr.apache.org/guide/solr/latest/query-guide/common-query-parameters.html>).
//! Every field is optional; [`CommonParams::flatten_into`] emits only
//! the fields that were explicitly set, each under its exact wire key.

use crate::param::{ParamValue, WireParams};

/// Debug sections Solr can include in a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugMode {
    /// Parsed query and rewritten query information.
    Query,
    /// Timing of each search component.
    Timing,
    /// Score explanations for returned documents.
    Results,
    /// All of the above.
    All,
}

impl DebugMode {
    /// Wire value for the `debug` parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DebugMode::Query => "query",
            DebugMode::Timing => "timing",
            DebugMode::Results => "results",
            DebugMode::All => "all",
        }
    }
}

/// What request parameters Solr echoes back in the response header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoParams {
    /// Echo only parameters given in the request.
    Explicit,
    /// Echo request plus handler-default parameters.
    All,
    /// Echo nothing.
    None,
}

impl EchoParams {
    /// Wire value for the `echoParams` parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EchoParams::Explicit => "explicit",
            EchoParams::All => "all",
            EchoParams::None => "none",
        }
    }
}

/// Paging, sorting, filtering and resource-budget parameters common to
/// every query parser.
///
/// Built once per request, then consumed by a parser-family model's
/// `build()`. Unsigned types make negative offsets and row counts
/// unrepresentable.
///
/// # Example
///
/// ```
/// use solrflow::CommonParams;
///
/// let common = CommonParams::new()
///     .with_rows(20)
///     .with_sort("price asc")
///     .with_filter("inStock:true")
///     .with_fields(["id", "title", "price"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonParams {
    sort: Option<String>,
    start: Option<u64>,
    rows: Option<u32>,
    filters: Vec<String>,
    fields: Option<Vec<String>>,
    debug: Vec<DebugMode>,
    explain_other: Option<String>,
    time_allowed: Option<u64>,
    cpu_allowed: Option<u64>,
    mem_allowed: Option<f64>,
    max_hits_allowed: Option<u64>,
    segment_terminate_early: Option<bool>,
    multi_threaded: Option<bool>,
    partial_results: Option<bool>,
    omit_header: Option<bool>,
    echo_params: Option<EchoParams>,
    writer_type: Option<String>,
    min_exact_count: Option<u64>,
    log_params_list: Option<String>,
    query_uuid: Option<String>,
    can_cancel: Option<bool>,
}

impl CommonParams {
    /// Create an empty block; nothing is emitted until set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort expression, e.g. `"score desc"` or `"price asc, id desc"`.
    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Offset into the result set for paging.
    #[must_use]
    pub fn with_start(mut self, start: u64) -> Self {
        self.start = Some(start);
        self
    }

    /// Number of documents to return.
    #[must_use]
    pub fn with_rows(mut self, rows: u32) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Append one filter query (`fq`). Filters are emitted as repeated
    /// keys in insertion order.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filters.push(filter.into());
        self
    }

    /// Append several filter queries at once.
    #[must_use]
    pub fn with_filters<I, S>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.extend(filters.into_iter().map(Into::into));
        self
    }

    /// Fields to return (`fl`), comma-joined on the wire.
    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Request a debug section; may be called more than once.
    #[must_use]
    pub fn with_debug(mut self, mode: DebugMode) -> Self {
        self.debug.push(mode);
        self
    }

    /// Lucene query for additional explain info (`explainOther`).
    #[must_use]
    pub fn with_explain_other(mut self, query: impl Into<String>) -> Self {
        self.explain_other = Some(query.into());
        self
    }

    /// Time budget in milliseconds (`timeAllowed`). Passed through to
    /// Solr; not enforced locally.
    #[must_use]
    pub fn with_time_allowed(mut self, millis: u64) -> Self {
        self.time_allowed = Some(millis);
        self
    }

    /// CPU budget in milliseconds (`cpuAllowed`).
    #[must_use]
    pub fn with_cpu_allowed(mut self, millis: u64) -> Self {
        self.cpu_allowed = Some(millis);
        self
    }

    /// Memory budget in MiB for the search thread (`memAllowed`).
    #[must_use]
    pub fn with_mem_allowed(mut self, mebibytes: f64) -> Self {
        self.mem_allowed = Some(mebibytes);
        self
    }

    /// Maximum number of hits to iterate through (`maxHitsAllowed`).
    #[must_use]
    pub fn with_max_hits_allowed(mut self, hits: u64) -> Self {
        self.max_hits_allowed = Some(hits);
        self
    }

    /// Enable early segment termination (`segmentTerminateEarly`).
    #[must_use]
    pub fn with_segment_terminate_early(mut self, enabled: bool) -> Self {
        self.segment_terminate_early = Some(enabled);
        self
    }

    /// Allow multi-threaded search (`multiThreaded`).
    #[must_use]
    pub fn with_multi_threaded(mut self, enabled: bool) -> Self {
        self.multi_threaded = Some(enabled);
        self
    }

    /// Return partial results when a budget is hit (`partialResults`).
    #[must_use]
    pub fn with_partial_results(mut self, enabled: bool) -> Self {
        self.partial_results = Some(enabled);
        self
    }

    /// Exclude the response header (`omitHeader`).
    #[must_use]
    pub fn with_omit_header(mut self, omit: bool) -> Self {
        self.omit_header = Some(omit);
        self
    }

    /// Control parameter echoing in the response header.
    #[must_use]
    pub fn with_echo_params(mut self, echo: EchoParams) -> Self {
        self.echo_params = Some(echo);
        self
    }

    /// Response writer (`wt`), e.g. `"json"` or `"xml"`. The client
    /// defaults it to `json` when unset.
    #[must_use]
    pub fn with_writer_type(mut self, writer: impl Into<String>) -> Self {
        self.writer_type = Some(writer.into());
        self
    }

    /// Count hits exactly up to this value (`minExactCount`).
    #[must_use]
    pub fn with_min_exact_count(mut self, count: u64) -> Self {
        self.min_exact_count = Some(count);
        self
    }

    /// Comma-separated allowlist of parameter names to log.
    #[must_use]
    pub fn with_log_params_list(mut self, list: impl Into<String>) -> Self {
        self.log_params_list = Some(list.into());
        self
    }

    /// Custom UUID for cancellable queries (`queryUUID`).
    #[must_use]
    pub fn with_query_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.query_uuid = Some(uuid.into());
        self
    }

    /// Mark the query cancellable (`canCancel`).
    #[must_use]
    pub fn with_cancellable(mut self, cancellable: bool) -> Self {
        self.can_cancel = Some(cancellable);
        self
    }

    /// Emit every explicitly-set field under its wire key.
    pub fn flatten_into(&self, out: &mut WireParams) {
        if let Some(sort) = &self.sort {
            out.insert("sort", sort.clone());
        }
        if let Some(start) = self.start {
            out.insert("start", start);
        }
        if let Some(rows) = self.rows {
            out.insert("rows", rows);
        }
        if !self.filters.is_empty() {
            out.insert("fq", ParamValue::Repeated(self.filters.clone()));
        }
        if let Some(fields) = &self.fields {
            out.insert("fl", ParamValue::CommaSeparated(fields.clone()));
        }
        if !self.debug.is_empty() {
            out.insert(
                "debug",
                ParamValue::Repeated(
                    self.debug.iter().map(|m| m.as_str().to_string()).collect(),
                ),
            );
        }
        if let Some(explain_other) = &self.explain_other {
            out.insert("explainOther", explain_other.clone());
        }
        if let Some(time_allowed) = self.time_allowed {
            out.insert("timeAllowed", time_allowed);
        }
        if let Some(cpu_allowed) = self.cpu_allowed {
            out.insert("cpuAllowed", cpu_allowed);
        }
        if let Some(mem_allowed) = self.mem_allowed {
            out.insert("memAllowed", mem_allowed);
        }
        if let Some(max_hits) = self.max_hits_allowed {
            out.insert("maxHitsAllowed", max_hits);
        }
        if let Some(enabled) = self.segment_terminate_early {
            out.insert("segmentTerminateEarly", enabled);
        }
        if let Some(enabled) = self.multi_threaded {
            out.insert("multiThreaded", enabled);
        }
        if let Some(enabled) = self.partial_results {
            out.insert("partialResults", enabled);
        }
        if let Some(omit) = self.omit_header {
            out.insert("omitHeader", omit);
        }
        if let Some(echo) = self.echo_params {
            out.insert("echoParams", echo.as_str());
        }
        if let Some(writer) = &self.writer_type {
            out.insert("wt", writer.clone());
        }
        if let Some(count) = self.min_exact_count {
            out.insert("minExactCount", count);
        }
        if let Some(list) = &self.log_params_list {
            out.insert("logParamsList", list.clone());
        }
        if let Some(uuid) = &self.query_uuid {
            out.insert("queryUUID", uuid.clone());
        }
        if let Some(cancellable) = self.can_cancel {
            out.insert("canCancel", cancellable);
        }
    }
}
