//! Search backend client

use crate::search::config::{IndexTarget, SearchConfig};
use crate::search::error::{SearchError, SearchResult};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Executes query documents against an index
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run `body` against `target` and return the raw engine response
    async fn search(&self, target: &IndexTarget, body: &Value) -> SearchResult<Value>;
}

/// Elasticsearch over its REST API
#[derive(Clone)]
pub struct ElasticsearchClient {
    client: Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
}

impl ElasticsearchClient {
    /// Create a client from configuration. The timeout applies to every request.
    pub fn new(config: &SearchConfig) -> SearchResult<Self> {
        if config.url.trim().is_empty() {
            return Err(SearchError::InvalidConfiguration(
                "elasticsearch url must not be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                SearchError::InvalidConfiguration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password(),
        })
    }

    /// `_search` endpoint for a target; the type segment is omitted when empty
    pub fn search_url(&self, target: &IndexTarget) -> String {
        if target.type_name.is_empty() {
            format!("{}/{}/_search", self.base_url, target.index_name)
        } else {
            format!(
                "{}/{}/{}/_search",
                self.base_url, target.index_name, target.type_name
            )
        }
    }
}

#[async_trait]
impl SearchBackend for ElasticsearchClient {
    async fn search(&self, target: &IndexTarget, body: &Value) -> SearchResult<Value> {
        let url = self.search_url(target);
        debug!(url = %url, "Dispatching search request");

        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body);

        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_ref());
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(
                        url = %url,
                        status = status.as_u16(),
                        error = %e,
                        "Failed to read error response body"
                    );
                    String::new()
                }
            };
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SearchError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::config::SearchConfigBuilder;

    #[test]
    fn test_search_url_with_type() {
        let client =
            ElasticsearchClient::new(&SearchConfigBuilder::new().url("http://es:9200/").build())
                .unwrap();
        assert_eq!(
            client.search_url(&IndexTarget::new("tables_v1", "tables")),
            "http://es:9200/tables_v1/tables/_search"
        );
    }

    #[test]
    fn test_search_url_without_type() {
        let client =
            ElasticsearchClient::new(&SearchConfigBuilder::new().url("http://es:9200").build())
                .unwrap();
        assert_eq!(
            client.search_url(&IndexTarget::new("users_v1", "")),
            "http://es:9200/users_v1/_search"
        );
    }

    #[test]
    fn test_empty_url_rejected() {
        let result = ElasticsearchClient::new(&SearchConfigBuilder::new().url(" ").build());
        assert!(matches!(result, Err(SearchError::InvalidConfiguration(_))));
    }
}
