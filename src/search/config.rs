//! Search backend configuration

use serde::{Deserialize, Serialize};

/// Logical search domain, each backed by its own index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchDomain {
    Datadocs,
    Tables,
    Users,
}

impl SearchDomain {
    /// Label used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchDomain::Datadocs => "datadocs",
            SearchDomain::Tables => "tables",
            SearchDomain::Users => "users",
        }
    }
}

impl std::fmt::Display for SearchDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index/type pair a query is sent to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexTarget {
    pub index_name: String,

    /// Mapping type. Empty for clusters without mapping types.
    #[serde(default)]
    pub type_name: String,
}

impl IndexTarget {
    pub fn new(index_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Index targets for every search domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicesConfig {
    #[serde(default = "default_datadocs_index")]
    pub datadocs: IndexTarget,

    #[serde(default = "default_tables_index")]
    pub tables: IndexTarget,

    #[serde(default = "default_users_index")]
    pub users: IndexTarget,
}

impl Default for IndicesConfig {
    fn default() -> Self {
        Self {
            datadocs: default_datadocs_index(),
            tables: default_tables_index(),
            users: default_users_index(),
        }
    }
}

/// Elasticsearch connection and index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the hosted cluster
    #[serde(default = "default_url")]
    pub url: String,

    /// Request timeout applied by the HTTP client (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Basic auth user name
    #[serde(default)]
    pub username: Option<String>,

    /// Environment variable holding the basic auth password
    #[serde(default)]
    pub password_env: Option<String>,

    #[serde(default)]
    pub indices: IndicesConfig,
}

impl SearchConfig {
    /// Index target for a domain
    pub fn target(&self, domain: SearchDomain) -> &IndexTarget {
        match domain {
            SearchDomain::Datadocs => &self.indices.datadocs,
            SearchDomain::Tables => &self.indices.tables,
            SearchDomain::Users => &self.indices.users,
        }
    }

    /// Resolve the basic auth password from the configured environment variable
    pub fn password(&self) -> Option<String> {
        self.password_env
            .as_ref()
            .and_then(|var| std::env::var(var).ok())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            username: None,
            password_env: None,
            indices: IndicesConfig::default(),
        }
    }
}

/// Builder for SearchConfig
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.config.url = url.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.config.username = Some(username.into());
        self
    }

    pub fn password_env(mut self, var: impl Into<String>) -> Self {
        self.config.password_env = Some(var.into());
        self
    }

    pub fn index(mut self, domain: SearchDomain, target: IndexTarget) -> Self {
        match domain {
            SearchDomain::Datadocs => self.config.indices.datadocs = target,
            SearchDomain::Tables => self.config.indices.tables = target,
            SearchDomain::Users => self.config.indices.users = target,
        }
        self
    }

    pub fn build(self) -> SearchConfig {
        self.config
    }
}

impl Default for SearchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn default_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_datadocs_index() -> IndexTarget {
    IndexTarget::new("search_datadocs_v1", "datadocs")
}

fn default_tables_index() -> IndexTarget {
    IndexTarget::new("search_tables_v1", "tables")
}

fn default_users_index() -> IndexTarget {
    IndexTarget::new("search_users_v1", "user")
}
