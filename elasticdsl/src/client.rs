//! Search engine client
//!
//! [`SearchClient`] maps search and administrative operations onto REST
//! calls over a [`Transport`]. The transport is injected, so several clients
//! (for example one per cluster node) can share one HTTP session.

use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{require, Error};
use crate::mapping::TypeMapping;
use crate::request::SearchRequest;
use crate::transport::{Method, Transport, TransportOptions, TransportResponse};

/// Index creation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexSettings {
    pub number_of_shards: u32,
    pub number_of_replicas: u32,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            number_of_shards: 5,
            number_of_replicas: 1,
        }
    }
}

impl IndexSettings {
    pub fn new(number_of_shards: u32, number_of_replicas: u32) -> Self {
        Self {
            number_of_shards,
            number_of_replicas,
        }
    }
}

/// CouchDB river registration
///
/// Index type, database and river name default to the index name.
#[derive(Debug, Clone, PartialEq)]
pub struct CouchDbRiver {
    index: String,
    index_type: Option<String>,
    db: Option<String>,
    river_name: Option<String>,
    host: String,
    port: u16,
    user: Option<String>,
    password: Option<String>,
    filter: Option<String>,
    script: Option<String>,
}

impl CouchDbRiver {
    pub fn new(index: &str) -> crate::Result<Self> {
        require(index, "index")?;
        Ok(Self {
            index: index.to_string(),
            index_type: None,
            db: None,
            river_name: None,
            host: "localhost".to_string(),
            port: 5984,
            user: None,
            password: None,
            filter: None,
            script: None,
        })
    }

    pub fn index_type(mut self, index_type: impl Into<String>) -> Self {
        self.index_type = Some(index_type.into());
        self
    }

    pub fn db(mut self, db: impl Into<String>) -> Self {
        self.db = Some(db.into());
        self
    }

    pub fn river_name(mut self, name: impl Into<String>) -> Self {
        self.river_name = Some(name.into());
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Credentials are only sent when both parts are present.
    pub fn credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn script(mut self, script: impl Into<String>) -> Self {
        self.script = Some(script.into());
        self
    }

    /// Name the river is registered under
    pub fn name(&self) -> &str {
        non_blank(&self.river_name).unwrap_or(self.index.as_str())
    }

    pub fn to_document(&self) -> Value {
        let mut couchdb = Map::new();
        couchdb.insert("host".to_string(), json!(self.host));
        couchdb.insert("port".to_string(), json!(self.port));
        couchdb.insert(
            "db".to_string(),
            json!(non_blank(&self.db).unwrap_or(self.index.as_str())),
        );
        if let Some(filter) = non_blank(&self.filter) {
            couchdb.insert("filter".to_string(), json!(filter));
        }
        if let (Some(user), Some(password)) = (non_blank(&self.user), non_blank(&self.password)) {
            couchdb.insert("user".to_string(), json!(user));
            couchdb.insert("password".to_string(), json!(password));
        }
        if let Some(script) = non_blank(&self.script) {
            couchdb.insert("script".to_string(), json!(script));
        }

        json!({
            "type": "couchdb",
            "couchdb": couchdb,
            "index": {
                "index": self.index,
                "type": non_blank(&self.index_type).unwrap_or(self.index.as_str()),
            }
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Client for one search engine endpoint
#[derive(Debug, Clone)]
pub struct SearchClient {
    config: ClientConfig,
    base: Url,
    transport: Arc<Transport>,
}

impl SearchClient {
    /// Client with its own transport built from `config`
    pub fn new(config: ClientConfig) -> crate::Result<Self> {
        let transport = Transport::shared(TransportOptions::from(&config));
        Self::with_transport(config, transport)
    }

    /// Client over an existing, possibly shared, transport
    pub fn with_transport(config: ClientConfig, transport: Arc<Transport>) -> crate::Result<Self> {
        config.validate()?;
        let base = Url::parse(&config.base_url())?;
        if base.cannot_be_a_base() {
            return Err(Error::InvalidValue {
                field: "host",
                reason: format!("'{}' is not a usable base URL", base),
            });
        }
        Ok(Self {
            config,
            base,
            transport,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    /// Base URL with `segments` appended, each percent-encoded
    pub fn endpoint(&self, segments: &[&str]) -> crate::Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidValue {
                field: "host",
                reason: format!("'{}' is not a usable base URL", self.base),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn simple_search_url(&self, segments: &[&str], key: &str, term: &str) -> crate::Result<Url> {
        require(key, "key")?;
        require(term, "term")?;
        let mut url = self.endpoint(segments)?;
        url.query_pairs_mut()
            .append_pair("q", &format!("{}:{}", key, term));
        Ok(url)
    }

    /// `GET /{index}/{type}/_search?q={key}:{term}`
    pub async fn search_simple(
        &self,
        index: &str,
        doc_type: &str,
        key: &str,
        term: &str,
    ) -> crate::Result<TransportResponse> {
        require(index, "index")?;
        require(doc_type, "type")?;
        let url = self.simple_search_url(&[index, doc_type, "_search"], key, term)?;
        Ok(self.transport.get(url.as_str()).await)
    }

    /// `GET /{index}/_search?q={key}:{term}`
    pub async fn search_index_simple(
        &self,
        index: &str,
        key: &str,
        term: &str,
    ) -> crate::Result<TransportResponse> {
        require(index, "index")?;
        let url = self.simple_search_url(&[index, "_search"], key, term)?;
        Ok(self.transport.get(url.as_str()).await)
    }

    /// Search every index
    pub async fn search_all(&self, request: &SearchRequest) -> crate::Result<TransportResponse> {
        let url = self.endpoint(&["_search"])?;
        Ok(self.transport.post(url.as_str(), Some(request)).await)
    }

    pub async fn search_advanced(
        &self,
        index: &str,
        doc_type: &str,
        request: &SearchRequest,
    ) -> crate::Result<TransportResponse> {
        require(index, "index")?;
        require(doc_type, "type")?;
        let url = self.endpoint(&[index, doc_type, "_search"])?;
        Ok(self.transport.post(url.as_str(), Some(request)).await)
    }

    pub async fn search_index_advanced(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> crate::Result<TransportResponse> {
        require(index, "index")?;
        let url = self.endpoint(&[index, "_search"])?;
        Ok(self.transport.post(url.as_str(), Some(request)).await)
    }

    /// Index a document under an engine-assigned id
    pub async fn doc_create<D: Serialize + ?Sized>(
        &self,
        index: &str,
        doc_type: &str,
        document: &D,
    ) -> crate::Result<TransportResponse> {
        require(index, "index")?;
        require(doc_type, "type")?;
        let url = self.endpoint(&[index, doc_type, ""])?;
        Ok(self.transport.post(url.as_str(), Some(document)).await)
    }

    pub async fn index_create(
        &self,
        index: &str,
        settings: IndexSettings,
    ) -> crate::Result<TransportResponse> {
        require(index, "index")?;
        tracing::info!(
            "Creating index {} (shards={}, replicas={})",
            index,
            settings.number_of_shards,
            settings.number_of_replicas
        );
        let url = self.endpoint(&[index])?;
        let body = json!({ "settings": settings });
        Ok(self.transport.put(url.as_str(), Some(&body)).await)
    }

    pub async fn index_delete(&self, index: &str) -> crate::Result<TransportResponse> {
        require(index, "index")?;
        tracing::info!("Deleting index {}", index);
        let url = self.endpoint(&[index])?;
        Ok(self.transport.delete(url.as_str()).await)
    }

    pub async fn index_open(&self, index: &str) -> crate::Result<TransportResponse> {
        require(index, "index")?;
        let url = self.endpoint(&[index, "_open"])?;
        Ok(self.transport.post::<Value>(url.as_str(), None).await)
    }

    pub async fn index_close(&self, index: &str) -> crate::Result<TransportResponse> {
        require(index, "index")?;
        let url = self.endpoint(&[index, "_close"])?;
        Ok(self.transport.post::<Value>(url.as_str(), None).await)
    }

    /// Names of all indices, read from the cluster state.
    ///
    /// The outer error is a builder/URL error; the inner `Err` carries the
    /// untouched response of a call that did not return 200.
    pub async fn index_list(
        &self,
    ) -> crate::Result<std::result::Result<Vec<String>, TransportResponse>> {
        let url = self.endpoint(&["_cluster", "state", ""])?;
        let response = self.transport.get(url.as_str()).await;
        if response.status.code() != 200 {
            return Ok(Err(response));
        }
        Ok(Ok(object_keys(
            response.body.pointer("/metadata/indices"),
        )))
    }

    /// Document types with a mapping in `index`
    pub async fn type_list(
        &self,
        index: &str,
    ) -> crate::Result<std::result::Result<Vec<String>, TransportResponse>> {
        require(index, "index")?;
        let url = self.endpoint(&[index, "_mapping"])?;
        let response = self.transport.get(url.as_str()).await;
        if response.status.code() != 200 {
            return Ok(Err(response));
        }
        Ok(Ok(object_keys(response.body.get(index))))
    }

    /// `PUT /{index}/{type}/_mapping`
    pub async fn map(
        &self,
        index: &str,
        doc_type: &str,
        mapping: &TypeMapping,
    ) -> crate::Result<TransportResponse> {
        require(index, "index")?;
        require(doc_type, "type")?;
        let url = self.endpoint(&[index, doc_type, "_mapping"])?;
        let body = mapping.to_body(doc_type);
        Ok(self.transport.put(url.as_str(), Some(&body)).await)
    }

    pub async fn river_couchdb_create(&self, river: &CouchDbRiver) -> crate::Result<TransportResponse> {
        tracing::info!("Registering CouchDB river {}", river.name());
        let url = self.endpoint(&["_river", river.name(), "_meta"])?;
        let body = river.to_document();
        Ok(self.transport.post(url.as_str(), Some(&body)).await)
    }

    /// Remove a river. The index it fed is left in place.
    pub async fn river_couchdb_delete(&self, name: &str) -> crate::Result<TransportResponse> {
        require(name, "river")?;
        let url = self.endpoint(&["_river", name])?;
        Ok(self.transport.delete(url.as_str()).await)
    }

    /// Send `data` to an arbitrary path relative to the base URL.
    pub async fn raw(
        &self,
        path: &str,
        method: Method,
        data: Option<&Value>,
    ) -> crate::Result<TransportResponse> {
        let url = self.raw_url(path)?;
        Ok(self.transport.send(method, url.as_str(), data).await)
    }

    /// Resolve `path` against the base URL; it must stay on the engine's origin.
    fn raw_url(&self, path: &str) -> crate::Result<Url> {
        let url = self.base.join(path.trim_start_matches('/'))?;
        if url.origin() != self.base.origin() {
            return Err(Error::InvalidValue {
                field: "path",
                reason: format!("'{}' leaves the engine at {}", path, self.base),
            });
        }
        Ok(url)
    }
}

fn object_keys(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_object)
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}
