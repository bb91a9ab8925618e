use crate::api::extractors::SearchParams;
use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::search::{
    DatadocQuery, Filter, SearchPage, SortOrder, SortSpec, TableQuery, UserSuggestion,
};
use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// A parameter given either as a single value or as a list
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// Build a sort from `sort_key` / `sort_order`.
///
/// An empty scalar key means no sort.
fn sort_spec(
    keys: Option<OneOrMany<String>>,
    orders: Option<OneOrMany<SortOrder>>,
) -> Option<SortSpec> {
    let keys = match keys? {
        OneOrMany::One(key) if key.is_empty() => return None,
        keys => keys.into_vec(),
    };
    if keys.is_empty() {
        return None;
    }
    Some(SortSpec::zipped(keys, orders.map(OneOrMany::into_vec)))
}

fn default_search_limit() -> usize {
    1000
}

fn default_suggest_limit() -> usize {
    10
}

#[derive(Debug, Deserialize)]
pub struct DatadocSearchParams {
    pub environment_id: i64,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default)]
    pub sort_key: Option<OneOrMany<String>>,
    #[serde(default)]
    pub sort_order: Option<OneOrMany<SortOrder>>,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

/// Search data docs in one environment
pub async fn search_datadoc(
    State(state): State<AppState>,
    SearchParams(params): SearchParams<DatadocSearchParams>,
) -> Result<Json<SearchPage>> {
    state
        .access
        .verify_environment_permission(&[params.environment_id])
        .await?;

    let mut query = DatadocQuery::new(params.keywords.unwrap_or_default())
        .with_limit(params.limit)
        .with_offset(params.offset);
    query.filters = params.filters;
    if let Some(sort) = sort_spec(params.sort_key, params.sort_order) {
        query = query.with_sort(sort);
    }

    debug!(environment_id = params.environment_id, "Searching data docs");
    let page = state
        .search
        .search_datadocs(params.environment_id, query)
        .await;
    Ok(Json(page))
}

#[derive(Debug, Deserialize)]
pub struct TableSearchParams {
    pub metastore_id: i64,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default)]
    pub sort_key: Option<OneOrMany<String>>,
    #[serde(default)]
    pub sort_order: Option<OneOrMany<SortOrder>>,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub concise: bool,
}

/// Search tables in one metastore
pub async fn search_tables(
    State(state): State<AppState>,
    SearchParams(params): SearchParams<TableSearchParams>,
) -> Result<Json<SearchPage>> {
    state
        .access
        .verify_metastore_permission(params.metastore_id)
        .await?;

    let mut query = TableQuery::new(params.keywords.unwrap_or_default())
        .with_limit(params.limit)
        .with_offset(params.offset)
        .with_concise(params.concise);
    query.filters = params.filters;
    if let Some(sort) = sort_spec(params.sort_key, params.sort_order) {
        query = query.with_sort(sort);
    }

    debug!(metastore_id = params.metastore_id, "Searching tables");
    let page = state.search.search_tables(params.metastore_id, query).await;
    Ok(Json(page))
}

#[derive(Debug, Deserialize)]
pub struct TableSuggestParams {
    pub prefix: String,
    #[serde(default = "default_suggest_limit")]
    pub limit: usize,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TableSuggestResponse {
    pub data: Vec<String>,
}

/// Complete table names by prefix
pub async fn suggest_tables(
    State(state): State<AppState>,
    Path(metastore_id): Path<i64>,
    SearchParams(params): SearchParams<TableSuggestParams>,
) -> Result<Json<TableSuggestResponse>> {
    state.access.verify_metastore_permission(metastore_id).await?;

    let data = state
        .search
        .suggest_tables(metastore_id, &params.prefix, params.limit)
        .await;
    Ok(Json(TableSuggestResponse { data }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UserSuggestParams {
    #[serde(default)]
    pub name: Option<String>,
    /// Defaults to 10 when absent or null
    #[serde(default)]
    #[validate(range(max = 100, message = "Requesting too many users"))]
    pub limit: Option<usize>,
    /// Accepted for compatibility; completion suggesters cannot skip results
    #[serde(default)]
    pub offset: Option<usize>,
}

/// Complete user names by prefix
pub async fn suggest_user(
    State(state): State<AppState>,
    SearchParams(params): SearchParams<UserSuggestParams>,
) -> Result<Json<Vec<UserSuggestion>>> {
    params.validate()?;

    let users = state
        .search
        .suggest_users(
            params.name.as_deref(),
            params.limit.unwrap_or_else(default_suggest_limit),
        )
        .await;
    Ok(Json(users))
}

/// Prometheus metrics endpoint
pub async fn metrics() -> (StatusCode, String) {
    (StatusCode::OK, crate::metrics::gather_metrics())
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
