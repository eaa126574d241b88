//! Asynchronous HTTP client for one Solr collection.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::auth::SolrAuth;
use crate::document::SolrDocument;
use crate::error::{Error, Result};
use crate::param::WireParams;
use crate::query::SolrQuery;
use crate::response::QueryResponse;

/// Client bound to one Solr base URL and collection.
///
/// # Example
///
/// ```no_run
/// use solrflow::{SolrClient, SolrDocument, StandardQuery};
///
/// # async fn run() -> solrflow::Result<()> {
/// let client = SolrClient::new("http://localhost:8983/solr", "products");
/// let response = client
///     .search::<SolrDocument>(&StandardQuery::new("title:mouse"))
///     .await?;
/// println!("{} matches", response.num_found);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SolrClient {
    base_url: String,
    collection: String,
    auth: Option<SolrAuth>,
    client: reqwest::Client,
}

impl SolrClient {
    /// Create a client for `collection` at `base_url`, e.g.
    /// `http://localhost:8983/solr`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            collection: collection.into(),
            auth: None,
            client: reqwest::Client::new(),
        }
    }

    /// Attach credentials sent with every request.
    #[must_use]
    pub fn with_auth(mut self, auth: SolrAuth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set a request timeout.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the underlying HTTP client
    /// cannot be built.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| Error::config(format!("cannot build HTTP client: {err}")))?;
        Ok(self)
    }

    /// Use a preconfigured HTTP client, e.g. with proxy or TLS
    /// settings.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// The collection this client talks to.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn collection_url(&self, handler: &str) -> String {
        format!("{}/{}/{handler}", self.base_url, self.collection)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Some(auth) => request.header(reqwest::header::AUTHORIZATION, auth.header_value()),
            None => request,
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let text = response.text().await?;
        let body: Option<Value> = serde_json::from_str(&text).ok();
        if !status.is_success() {
            let message = body
                .as_ref()
                .and_then(|b| b.pointer("/error/msg"))
                .and_then(Value::as_str)
                .map_or_else(|| text.clone(), ToString::to_string);
            return Err(Error::remote(status.as_u16(), message, body));
        }
        body.ok_or_else(|| Error::decode("response body is not JSON", None))
    }

    /// Whether the collection answers its ping handler with
    /// `status: "OK"`.
    ///
    /// Network and HTTP failures report as `false` rather than
    /// erroring, so this is safe to poll at startup.
    pub async fn ping(&self) -> bool {
        let url = self.collection_url("admin/ping");
        let request = self.apply_auth(self.client.get(&url).query(&[("wt", "json")]));
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(error = %err, url = %url, "ping failed");
                return false;
            }
        };
        if !response.status().is_success() {
            return false;
        }
        match response.json::<Value>().await {
            Ok(body) => body.get("status").and_then(Value::as_str) == Some("OK"),
            Err(err) => {
                tracing::debug!(error = %err, url = %url, "ping body not JSON");
                false
            }
        }
    }

    /// Run a typed search.
    ///
    /// # Errors
    ///
    /// Fails on network errors, non-success HTTP statuses, or a
    /// response body that does not decode into `T`.
    pub async fn search<T: DeserializeOwned>(
        &self,
        query: &impl SolrQuery,
    ) -> Result<QueryResponse<T>> {
        self.search_raw(query.build()).await
    }

    /// Run a typed search with ad-hoc parameter overrides; an override
    /// with a key the query also sets wins.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::search`].
    pub async fn search_with_overrides<T: DeserializeOwned>(
        &self,
        query: &impl SolrQuery,
        overrides: WireParams,
    ) -> Result<QueryResponse<T>> {
        self.search_raw(crate::query::compose(query, overrides)).await
    }

    /// Run a search from already-flattened wire parameters.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::search`].
    pub async fn search_raw<T: DeserializeOwned>(
        &self,
        mut params: WireParams,
    ) -> Result<QueryResponse<T>> {
        params.insert_if_absent("wt", "json");
        let pairs = params.to_query_pairs();
        let url = self.collection_url("select");
        tracing::debug!(url = %url, params = pairs.len(), "running search");

        let request = self.apply_auth(self.client.get(&url).query(&pairs));
        let body = Self::check_status(request.send().await?).await?;
        QueryResponse::from_json(body)
    }

    /// Index documents, committing when `commit` is set.
    ///
    /// # Errors
    ///
    /// Fails on network errors or a non-success HTTP status.
    pub async fn add(&self, docs: &[SolrDocument], commit: bool) -> Result<()> {
        let url = self.collection_url("update/json/docs");
        let request = self
            .apply_auth(self.client.post(&url))
            .query(&[("commit", commit.to_string())])
            .json(docs);
        Self::check_status(request.send().await?).await?;
        Ok(())
    }

    /// Delete every document matching a query.
    ///
    /// # Errors
    ///
    /// Fails on network errors or a non-success HTTP status.
    pub async fn delete_by_query(&self, query: &str, commit: bool) -> Result<()> {
        self.update_command(json!({"delete": {"query": query}}), commit)
            .await
    }

    /// Delete documents by unique key.
    ///
    /// # Errors
    ///
    /// Fails on network errors or a non-success HTTP status.
    pub async fn delete_by_ids(&self, ids: &[&str], commit: bool) -> Result<()> {
        self.update_command(json!({"delete": ids}), commit).await
    }

    /// Commit pending changes so they become visible to searches.
    ///
    /// # Errors
    ///
    /// Fails on network errors or a non-success HTTP status.
    pub async fn commit(&self) -> Result<()> {
        let url = self.collection_url("update");
        let request = self
            .apply_auth(self.client.get(&url))
            .query(&[("commit", "true"), ("wt", "json")]);
        Self::check_status(request.send().await?).await?;
        Ok(())
    }

    async fn update_command(&self, command: Value, commit: bool) -> Result<()> {
        let url = self.collection_url("update");
        let request = self
            .apply_auth(self.client.post(&url))
            .query(&[("commit", commit.to_string()), ("wt", "json".to_string())])
            .json(&command);
        Self::check_status(request.send().await?).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = SolrClient::new("http://localhost:8983/solr/", "products");
        assert_eq!(
            client.collection_url("select"),
            "http://localhost:8983/solr/products/select"
        );
    }

    #[test]
    fn test_debug_does_not_leak_credentials() {
        let client = SolrClient::new("http://localhost:8983/solr", "products")
            .with_auth(SolrAuth::basic("solr", "hunter2"));
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_collection_accessor() {
        let client = SolrClient::new("http://localhost:8983/solr", "products");
        assert_eq!(client.collection(), "products");
    }
}
