//! HTTP search and suggest endpoints over Elasticsearch.
//!
//! Requests for data docs, tables and users are turned into typed query
//! documents ([`search`]), sent to the cluster, and the hits are flattened into
//! `{count, data}` pages. Cluster failures degrade to empty results.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod search;

pub use config::Config;
pub use error::{AppError, Result};
