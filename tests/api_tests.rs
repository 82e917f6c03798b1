use async_trait::async_trait;
use axum::{
    Json, Router,
    body::Body,
    http::{Request, StatusCode},
    routing::get,
};
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

use keyscout::analyzer::KeywordExtractor;
use keyscout::api::create_router;
use keyscout::api::handlers::INTERNAL_ERROR_MESSAGE;
use keyscout::data_models::SearchResult;
use keyscout::keyword_engine::KeywordEngine;
use keyscout::scorer::Scorer;
use keyscout::search::{SearchError, SearchProvider, SerpstackClient};

mod test_helpers {
    use super::*;

    pub struct CannedSearch(pub Vec<SearchResult>);

    #[async_trait]
    impl SearchProvider for CannedSearch {
        async fn search(&self, _query: &str) -> Result<Vec<SearchResult>, SearchError> {
            Ok(self.0.clone())
        }
    }

    pub fn router_with(search: Option<Arc<dyn SearchProvider>>) -> Router {
        let engine = KeywordEngine::new(search, KeywordExtractor::default(), Scorer::default());
        create_router(Arc::new(engine), Path::new("static"))
    }

    pub fn canned_router(results: Vec<SearchResult>) -> Router {
        router_with(Some(Arc::new(CannedSearch(results))))
    }

    pub fn analyze_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn spawn_serpstack_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/search")
    }
}

use test_helpers::*;

#[tokio::test]
async fn test_missing_url_is_bad_request() {
    let (status, body) = send(canned_router(Vec::new()), analyze_request("{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "URL is required"}));
}

#[tokio::test]
async fn test_null_and_blank_url_are_bad_request() {
    for payload in [r#"{"url": null}"#, r#"{"url": ""}"#, r#"{"url": "  "}"#] {
        let (status, body) = send(canned_router(Vec::new()), analyze_request(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
        assert_eq!(body["error"], "URL is required");
    }
}

#[tokio::test]
async fn test_empty_body_is_missing_url() {
    let (status, body) = send(canned_router(Vec::new()), analyze_request("")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "URL is required"}));
}

#[tokio::test]
async fn test_body_without_json_content_type_is_missing_url() {
    for payload in ["", r#"{"url": "https://example.com"}"#] {
        let request = Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .body(Body::from(payload))
            .unwrap();
        let (status, body) = send(canned_router(Vec::new()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload:?}");
        assert_eq!(body, json!({"error": "URL is required"}));
    }
}

#[tokio::test]
async fn test_malformed_body_is_bad_request_without_parser_detail() {
    for payload in ["{not json", r#"{"url": 123}"#, "[1, 2]"] {
        let (status, body) = send(canned_router(Vec::new()), analyze_request(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
        assert_eq!(body, json!({"error": "Invalid request body"}));
    }
}

#[tokio::test]
async fn test_invalid_url_is_bad_request() {
    let (status, body) = send(
        canned_router(Vec::new()),
        analyze_request(r#"{"url": "http://"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid URL");
}

#[tokio::test]
async fn test_missing_api_key_is_server_error() {
    let (status, body) = send(
        router_with(None),
        analyze_request(r#"{"url": "https://example.com"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "SERPSTACK_API_KEY is not configured"}));
}

#[tokio::test]
async fn test_zero_results_is_ok_with_empty_keywords() {
    let (status, body) = send(
        canned_router(Vec::new()),
        analyze_request(r#"{"url": "https://example.com"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "https://example.com");
    assert_eq!(body["keywords"], json!([]));
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_success_response_shape() {
    let results = vec![SearchResult::new(
        "Example Garden Tools",
        "Durable garden tools for every garden.",
        "https://example.com/garden-tools",
    )];
    let (status, body) = send(
        canned_router(results),
        analyze_request(r#"{"url": "https://www.example.com"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let keywords = body["keywords"].as_array().unwrap();
    assert!(!keywords.is_empty());
    assert!(keywords.len() <= 100);
    for kw in keywords {
        assert!(kw["keyword"].is_string());
        assert!(kw["searchVolume"].is_u64());
        assert!(kw["difficulty"].is_u64());
        assert!(kw["competition"].is_f64());
        let priority = kw["priorityScore"].as_u64().unwrap();
        assert!((10..=100).contains(&priority));
    }
    // 30 length + 20 domain + 1 appearance
    assert_eq!(keywords[0]["keyword"], "example garden tools");
    assert_eq!(keywords[0]["priorityScore"], 60);
}

#[tokio::test]
async fn test_upstream_status_and_message_are_forwarded() {
    let stub = Router::new().route(
        "/search",
        get(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": {"code": 101, "info": "Invalid access key."}})),
            )
        }),
    );
    let base_url = spawn_serpstack_stub(stub).await;
    let client = SerpstackClient::new(reqwest::Client::new(), &base_url, "bad-key", 100);

    let (status, body) = send(
        router_with(Some(Arc::new(client))),
        analyze_request(r#"{"url": "https://example.com"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "API Error: Invalid access key."}));
}

#[tokio::test]
async fn test_unexpected_failure_is_generic() {
    let stub = Router::new().route("/search", get(|| async { "garbage" }));
    let base_url = spawn_serpstack_stub(stub).await;
    let client = SerpstackClient::new(reqwest::Client::new(), &base_url, "key", 100);

    let (status, body) = send(
        router_with(Some(Arc::new(client))),
        analyze_request(r#"{"url": "https://example.com"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": INTERNAL_ERROR_MESSAGE}));
}

#[tokio::test]
async fn test_serves_static_front_end() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = canned_router(Vec::new()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let page = String::from_utf8_lossy(&bytes);
    assert!(page.contains("/api/analyze"));
    assert!(page.contains("Top SEO Keywords"));
    assert!(page.contains("catch (err)"));
}
