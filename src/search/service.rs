//! Search service: query assembly, dispatch and result shaping

use crate::metrics::{SEARCH_BACKEND_ERRORS_TOTAL, SEARCH_DURATION_SECONDS, SEARCH_REQUESTS_TOTAL};
use crate::search::builder::{
    split_table_keywords, table_suggest_body, user_suggest_body, DatadocQuery, TableQuery,
};
use crate::search::client::{ElasticsearchClient, SearchBackend};
use crate::search::config::{IndexTarget, SearchConfig, SearchDomain};
use crate::search::error::SearchResult;
use crate::search::filter::Filter;
use crate::search::results::{
    extract_hits, extract_total, table_suggestions, user_suggestions, SearchRecord,
    UserSuggestion,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

/// Filter injected to scope data doc searches to one environment
pub const ENVIRONMENT_FILTER: &str = "environment_id";

/// Filter injected to scope table searches to one metastore
pub const METASTORE_FILTER: &str = "metastore_id";

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Total matches reported by the engine
    pub count: u64,
    pub data: Vec<SearchRecord>,
}

impl SearchPage {
    fn from_raw(raw: &Value) -> Self {
        Self {
            count: extract_total(raw),
            data: extract_hits(raw),
        }
    }
}

/// Search and suggest over the configured indices.
///
/// Backend failures never surface from here: they are logged and the caller
/// receives an empty result.
pub struct SearchService {
    config: SearchConfig,
    backend: Arc<dyn SearchBackend>,
}

impl SearchService {
    pub fn new(config: SearchConfig, backend: Arc<dyn SearchBackend>) -> Self {
        Self { config, backend }
    }

    /// Create a service talking to Elasticsearch over HTTP
    pub fn from_config(config: SearchConfig) -> SearchResult<Self> {
        let client = ElasticsearchClient::new(&config)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    /// Search data docs within one environment
    pub async fn search_datadocs(&self, environment_id: i64, query: DatadocQuery) -> SearchPage {
        let query =
            query.with_filter(Filter::new(ENVIRONMENT_FILTER, environment_id.to_string()));
        let raw = self.dispatch(SearchDomain::Datadocs, &query.build()).await;
        SearchPage::from_raw(&raw)
    }

    /// Search tables within one metastore
    pub async fn search_tables(&self, metastore_id: i64, mut query: TableQuery) -> SearchPage {
        query.keywords = split_table_keywords(&query.keywords);
        let query = query.with_filter(Filter::new(METASTORE_FILTER, metastore_id.to_string()));
        let raw = self.dispatch(SearchDomain::Tables, &query.build()).await;
        SearchPage::from_raw(&raw)
    }

    /// Complete table names by prefix, as `schema.name`
    pub async fn suggest_tables(&self, metastore_id: i64, prefix: &str, limit: usize) -> Vec<String> {
        let body = table_suggest_body(prefix, metastore_id, limit);
        let raw = self.dispatch(SearchDomain::Tables, &body).await;
        table_suggestions(&raw)
    }

    /// Complete user names by prefix
    pub async fn suggest_users(&self, name: Option<&str>, limit: usize) -> Vec<UserSuggestion> {
        let body = user_suggest_body(name, limit);
        let raw = self.dispatch(SearchDomain::Users, &body).await;
        user_suggestions(&raw)
    }

    /// Send a document to the domain's index.
    ///
    /// Any failure is logged and replaced by an empty object. No retries.
    async fn dispatch<B: Serialize>(&self, domain: SearchDomain, body: &B) -> Value {
        let target = self.config.target(domain);
        let label = domain.as_str();
        SEARCH_REQUESTS_TOTAL.with_label_values(&[label]).inc();

        let start = Instant::now();
        let result = self.execute(target, body).await;
        SEARCH_DURATION_SECONDS
            .with_label_values(&[label])
            .observe(start.elapsed().as_secs_f64());

        match result {
            Ok(raw) => raw,
            Err(e) => {
                SEARCH_BACKEND_ERRORS_TOTAL.with_label_values(&[label]).inc();
                warn!(
                    domain = %domain,
                    index = %target.index_name,
                    error = %e,
                    "Got Elasticsearch exception"
                );
                empty_result()
            }
        }
    }

    async fn execute<B: Serialize>(&self, target: &IndexTarget, body: &B) -> SearchResult<Value> {
        let body = serde_json::to_value(body)?;
        self.backend.search(target, &body).await
    }
}

fn empty_result() -> Value {
    Value::Object(serde_json::Map::new())
}
