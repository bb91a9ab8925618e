//! Access checks for environment- and metastore-scoped searches

use crate::config::AccessConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::collections::HashSet;

/// Decides whether the caller may search a scope
#[async_trait]
pub trait AccessPolicy: Send + Sync {
    /// Fail unless every environment is accessible
    async fn verify_environment_permission(&self, environment_ids: &[i64]) -> Result<()>;

    /// Fail unless the metastore is accessible
    async fn verify_metastore_permission(&self, metastore_id: i64) -> Result<()>;
}

/// Allow-list policy loaded from configuration.
///
/// `None` means every id is allowed.
#[derive(Debug, Clone, Default)]
pub struct StaticAccessPolicy {
    environments: Option<HashSet<i64>>,
    metastores: Option<HashSet<i64>>,
}

impl StaticAccessPolicy {
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AccessConfig) -> Self {
        Self {
            environments: config
                .allowed_environment_ids
                .as_ref()
                .map(|ids| ids.iter().copied().collect()),
            metastores: config
                .allowed_metastore_ids
                .as_ref()
                .map(|ids| ids.iter().copied().collect()),
        }
    }

    pub fn with_environments(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.environments = Some(ids.into_iter().collect());
        self
    }

    pub fn with_metastores(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.metastores = Some(ids.into_iter().collect());
        self
    }
}

fn allowed(set: &Option<HashSet<i64>>, id: i64) -> bool {
    set.as_ref().map_or(true, |ids| ids.contains(&id))
}

#[async_trait]
impl AccessPolicy for StaticAccessPolicy {
    async fn verify_environment_permission(&self, environment_ids: &[i64]) -> Result<()> {
        match environment_ids
            .iter()
            .find(|id| !allowed(&self.environments, **id))
        {
            Some(id) => Err(AppError::Authorization(format!(
                "No permission for environment {}",
                id
            ))),
            None => Ok(()),
        }
    }

    async fn verify_metastore_permission(&self, metastore_id: i64) -> Result<()> {
        if allowed(&self.metastores, metastore_id) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "No permission for metastore {}",
                metastore_id
            )))
        }
    }
}
