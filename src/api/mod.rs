pub mod extractors;
pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::auth::{AccessPolicy, StaticAccessPolicy};
use crate::config::Config;
use crate::error::Result;
use crate::search::SearchService;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchService>,
    pub access: Arc<dyn AccessPolicy>,
    pub started_at: Instant,
}

impl AppState {
    /// State with an allow-all access policy
    pub fn new(search: Arc<SearchService>) -> Self {
        Self {
            search,
            access: Arc::new(StaticAccessPolicy::allow_all()),
            started_at: Instant::now(),
        }
    }

    /// Build the Elasticsearch-backed service and access policy from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let search = SearchService::from_config(config.elasticsearch.clone())?;
        Ok(Self::new(Arc::new(search))
            .with_access_policy(Arc::new(StaticAccessPolicy::from_config(&config.access))))
    }

    /// Set the access policy
    pub fn with_access_policy(mut self, access: Arc<dyn AccessPolicy>) -> Self {
        self.access = access;
        self
    }
}
