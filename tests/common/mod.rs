//! Shared helpers for the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use datahub_search::api::{build_router, AppState};
use datahub_search::auth::StaticAccessPolicy;
use datahub_search::search::{
    IndexTarget, SearchBackend, SearchConfig, SearchError, SearchResult, SearchService,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Backend that records every request and answers with a fixed response
pub struct RecordingBackend {
    response: Value,
    calls: Mutex<Vec<(IndexTarget, Value)>>,
}

impl RecordingBackend {
    pub fn new(response: Value) -> Arc<Self> {
        Arc::new(Self {
            response,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(IndexTarget, Value)> {
        self.calls.lock().unwrap().clone()
    }

    /// Body of the only request sent
    pub fn single_body(&self) -> Value {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one backend request");
        calls[0].1.clone()
    }
}

#[async_trait]
impl SearchBackend for RecordingBackend {
    async fn search(&self, target: &IndexTarget, body: &Value) -> SearchResult<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((target.clone(), body.clone()));
        Ok(self.response.clone())
    }
}

/// Backend that always fails
pub struct FailingBackend;

#[async_trait]
impl SearchBackend for FailingBackend {
    async fn search(&self, _target: &IndexTarget, _body: &Value) -> SearchResult<Value> {
        Err(SearchError::Transport("connection refused".to_string()))
    }
}

/// Router over `backend` with the given access policy
pub fn app_with(backend: Arc<dyn SearchBackend>, policy: StaticAccessPolicy) -> Router {
    let service = SearchService::new(SearchConfig::default(), backend);
    let state = AppState::new(Arc::new(service)).with_access_policy(Arc::new(policy));
    build_router(state)
}

/// Router over `backend` that allows every scope
pub fn app(backend: Arc<dyn SearchBackend>) -> Router {
    app_with(backend, StaticAccessPolicy::allow_all())
}

/// URI carrying `params` as a JSON query value
pub fn params_uri(path: &str, params: &Value) -> String {
    let url = reqwest::Url::parse_with_params(
        &format!("http://localhost{}", path),
        &[("params", params.to_string())],
    )
    .unwrap();
    format!("{}?{}", url.path(), url.query().unwrap_or_default())
}

/// Send a GET and decode the JSON response
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// A search response with the given hits
pub fn hits_response(total: Value, hits: Value) -> Value {
    serde_json::json!({
        "took": 3,
        "hits": {
            "total": total,
            "hits": hits,
        }
    })
}
