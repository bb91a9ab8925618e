//! Search service tests against a mocked Elasticsearch HTTP API

use datahub_search::search::*;
use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;

fn config_for(url: &str) -> SearchConfig {
    SearchConfigBuilder::new().url(url).timeout_secs(5).build()
}

fn service_for(url: &str) -> SearchService {
    SearchService::from_config(config_for(url)).unwrap()
}

#[tokio::test]
async fn test_datadoc_search_round_trip() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/search_datadocs_v1/datadocs/_search")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "_source": ["id", "title", "owner_uid", "created_at"],
            "size": 20,
            "from": 40
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "hits": {
                    "total": 41,
                    "hits": [{"_source": {"id": 1, "title": "Weekly report"}, "highlight": {}}]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let page = service_for(&server.url())
        .search_datadocs(
            3,
            DatadocQuery::new("weekly").with_limit(20).with_offset(40),
        )
        .await;

    mock.assert_async().await;
    assert_eq!(page.count, 41);
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0]["title"], "Weekly report");
    assert!(!page.data[0].contains_key(HIGHLIGHT_KEY));
}

#[tokio::test]
async fn test_object_total_form() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/search_tables_v1/tables/_search")
        .with_status(200)
        .with_body(
            json!({"hits": {"total": {"value": 7, "relation": "eq"}, "hits": []}}).to_string(),
        )
        .create_async()
        .await;

    let page = service_for(&server.url())
        .search_tables(1, TableQuery::new(""))
        .await;

    assert_eq!(page, SearchPage { count: 7, data: vec![] });
}

#[tokio::test]
async fn test_server_error_degrades_to_empty_page() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/search_tables_v1/tables/_search")
        .with_status(500)
        .with_body(r#"{"error": "search_phase_execution_exception"}"#)
        .expect(1)
        .create_async()
        .await;

    let page = service_for(&server.url())
        .search_tables(1, TableQuery::new("orders"))
        .await;

    mock.assert_async().await;
    assert_eq!(page, SearchPage::default());
}

#[tokio::test]
async fn test_client_reports_status_errors() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/idx/_search")
        .with_status(503)
        .with_body("unavailable")
        .create_async()
        .await;

    let client = ElasticsearchClient::new(&config_for(&server.url())).unwrap();
    let err = client
        .search(&IndexTarget::new("idx", ""), &json!({}))
        .await
        .unwrap_err();

    match err {
        SearchError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "unavailable");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_client_reports_undecodable_body() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/idx/doc/_search")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let client = ElasticsearchClient::new(&config_for(&server.url())).unwrap();
    let err = client
        .search(&IndexTarget::new("idx", "doc"), &json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, SearchError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_cluster_degrades() {
    let service = SearchService::from_config(
        SearchConfigBuilder::new()
            .url("http://127.0.0.1:1")
            .timeout_secs(1)
            .build(),
    )
    .unwrap();

    assert!(service.suggest_tables(1, "def", 10).await.is_empty());
    assert!(service.suggest_users(Some("al"), 10).await.is_empty());
}

#[tokio::test]
async fn test_basic_auth_and_untyped_index() {
    std::env::set_var("DATAHUB_SEARCH_TEST_PASSWORD", "secret");

    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/users_v2/_search")
        .match_header("authorization", Matcher::Regex("^Basic ".to_string()))
        .match_body(Matcher::Json(json!({
            "suggest": {"suggest": {
                "text": "bob",
                "completion": {"field": "suggest", "size": 5}
            }}
        })))
        .with_status(200)
        .with_body(
            json!({"suggest": {"suggest": [{"options": [
                {"_source": {"id": 9, "username": "bob", "fullname": "Bob"}}
            ]}]}})
            .to_string(),
        )
        .create_async()
        .await;

    let config = SearchConfigBuilder::new()
        .url(server.url())
        .username("search")
        .password_env("DATAHUB_SEARCH_TEST_PASSWORD")
        .index(SearchDomain::Users, IndexTarget::new("users_v2", ""))
        .build();
    let service = SearchService::from_config(config).unwrap();

    let users = service.suggest_users(Some("Bob"), 5).await;

    mock.assert_async().await;
    assert_eq!(
        users,
        vec![UserSuggestion {
            id: json!(9),
            username: json!("bob"),
            fullname: json!("Bob"),
        }]
    );
}

#[tokio::test]
async fn test_service_over_custom_backend() {
    struct Canned;

    #[async_trait::async_trait]
    impl SearchBackend for Canned {
        async fn search(
            &self,
            target: &IndexTarget,
            _body: &serde_json::Value,
        ) -> SearchResult<serde_json::Value> {
            assert_eq!(target.index_name, "search_tables_v1");
            Ok(json!({"suggest": {"suggest": [{"options": [
                {"_source": {"schema": "main", "name": "orders"}}
            ]}]}}))
        }
    }

    let service = SearchService::new(SearchConfig::default(), Arc::new(Canned));
    assert_eq!(
        service.suggest_tables(2, "ord", 10).await,
        vec!["main.orders".to_string()]
    );
}
