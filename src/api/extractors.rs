//! Query-string parameter extraction.
//!
//! Endpoints take their arguments either as plain `key=value` pairs or as a
//! single `params` value holding a JSON object. The JSON form is needed for
//! list-valued arguments such as `filters`.

use crate::error::{AppError, Result};
use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{request::Parts, Uri},
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Extracts `T` from the request query string
#[derive(Debug, Clone)]
pub struct SearchParams<T>(pub T);

#[derive(Debug, Deserialize)]
struct ParamsEnvelope {
    params: Option<String>,
}

/// Parse `T` from a URI, preferring the JSON `params` value when present
pub fn parse_params<T: DeserializeOwned>(uri: &Uri) -> Result<T> {
    let Query(envelope) = Query::<ParamsEnvelope>::try_from_uri(uri)
        .map_err(|e| AppError::Validation(e.body_text()))?;

    match envelope.params {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| AppError::Validation(format!("Invalid params: {}", e))),
        None => Query::<T>::try_from_uri(uri)
            .map(|Query(params)| params)
            .map_err(|e| AppError::Validation(e.body_text())),
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for SearchParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parse_params(&parts.uri).map(SearchParams)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Example {
        id: i64,
        #[serde(default)]
        tags: Vec<String>,
    }

    #[test]
    fn test_plain_query_pairs() {
        let uri: Uri = "/x?id=4".parse().unwrap();
        assert_eq!(
            parse_params::<Example>(&uri).unwrap(),
            Example { id: 4, tags: vec![] }
        );
    }

    #[test]
    fn test_json_params_value() {
        let uri: Uri = "/x?params=%7B%22id%22%3A5%2C%22tags%22%3A%5B%22a%22%5D%7D"
            .parse()
            .unwrap();
        assert_eq!(
            parse_params::<Example>(&uri).unwrap(),
            Example {
                id: 5,
                tags: vec!["a".to_string()]
            }
        );
    }

    #[test]
    fn test_missing_required_field_is_validation_error() {
        let uri: Uri = "/x".parse().unwrap();
        let err = parse_params::<Example>(&uri).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_malformed_json_is_validation_error() {
        let uri: Uri = "/x?params=%7Bnope".parse().unwrap();
        let err = parse_params::<Example>(&uri).unwrap_err();
        assert!(err.to_string().contains("Invalid params"));
    }
}
