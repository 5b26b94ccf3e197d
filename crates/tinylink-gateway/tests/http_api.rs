use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tinylink_core::{ShortCode, Shortener, ShortenerError, StorageError};
use tinylink_gateway::{App, AppState};
use tinylink_generator::HashGenerator;
use tinylink_shortener::{ServiceSettings, ShortenerService};
use tinylink_storage::InMemoryRepository;
use tower::ServiceExt;

const BASE_URL: &str = "https://tiny.link";

fn app() -> Router {
    let service = ShortenerService::new(
        InMemoryRepository::new(),
        HashGenerator::default(),
        ServiceSettings::default(),
    );
    App::router(AppState::new(Arc::new(service), BASE_URL))
}

/// Answers every call with a fixed outcome.
struct StubShortener {
    create: Result<ShortCode, ShortenerError>,
    resolve: Result<String, ShortenerError>,
}

#[async_trait]
impl Shortener for StubShortener {
    async fn create(&self, _url: &str) -> Result<ShortCode, ShortenerError> {
        self.create.clone()
    }

    async fn resolve(&self, _code: &str) -> Result<String, ShortenerError> {
        self.resolve.clone()
    }
}

fn stub_app(error: ShortenerError) -> Router {
    stub_app_with(Err(error.clone()), Err(error))
}

fn stub_app_with(
    create: Result<ShortCode, ShortenerError>,
    resolve: Result<String, ShortenerError>,
) -> Router {
    let stub = StubShortener { create, resolve };
    App::router(AppState::new(Arc::new(stub), BASE_URL))
}

fn post_json(body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn create_then_redirect() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_json(json!({"original_url": "https://example.com/a?b=c"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    let code = body["short_code"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 7);
    assert_eq!(body["short_url"], format!("{BASE_URL}/{code}"));
    assert_eq!(body["original_url"], "https://example.com/a?b=c");

    let response = app.oneshot(get(&format!("/{code}"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://example.com/a?b=c"
    );
}

#[tokio::test]
async fn redirect_location_is_always_absolute_ascii() {
    let app = app();

    for (submitted, location) in [
        ("http:example.com", "http://example.com/"),
        ("https://example.com/a b", "https://example.com/a%20b"),
        (
            "https://例え.jp/パス",
            "https://xn--r8jz45g.jp/%E3%83%91%E3%82%B9",
        ),
        ("https:\\\\evil.example", "https://evil.example/"),
    ] {
        let response = app
            .clone()
            .oneshot(post_json(json!({ "original_url": submitted })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED, "{submitted:?}");
        let code = json_body(response).await["short_code"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app
            .clone()
            .oneshot(get(&format!("/{code}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            response.headers()[header::LOCATION],
            location,
            "{submitted:?}"
        );
    }
}

#[tokio::test]
async fn create_accepts_url_field_alias() {
    let response = app()
        .oneshot(post_json(json!({"url": "http://example.org"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(json_body(response).await["original_url"], "http://example.org");
}

#[tokio::test]
async fn same_url_twice_gets_two_codes() {
    let app = app();
    let mut codes = Vec::new();

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(post_json(json!({"original_url": "https://example.com"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        codes.push(json_body(response).await["short_code"].clone());
    }

    assert_ne!(codes[0], codes[1]);
}

#[tokio::test]
async fn invalid_url_is_a_client_error() {
    let response = app()
        .oneshot(post_json(json!({"original_url": "ftp://example.com"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"]["type"], "client_error");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("scheme"));
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
    assert_eq!(json_body(response).await["error"]["type"], "client_error");
}

#[tokio::test]
async fn missing_content_type_is_rejected() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/")
        .body(Body::from(r#"{"original_url":"https://example.com"}"#))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn unknown_code_is_not_found() {
    let response = app().oneshot(get("/doesNotExist")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"]["type"], "client_error");
}

#[tokio::test]
async fn malformed_code_is_bad_request() {
    let response = app().oneshot(get("/not-a-code")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_ok() {
    let response = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"status": "ok"}));
}

#[tokio::test]
async fn unavailable_store_is_service_unavailable() {
    let app = stub_app(StorageError::Unavailable("connection refused to 10.0.0.7".into()).into());

    let response = app.oneshot(get("/abc1234")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = json_body(response).await;
    assert_eq!(body["error"]["type"], "server_error");
    assert!(!body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("10.0.0.7"));
}

#[tokio::test]
async fn exhausted_attempts_is_internal_error() {
    let app = stub_app(ShortenerError::Exhausted { attempts: 5 });

    let response = app
        .oneshot(post_json(json!({"original_url": "https://example.com"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"]["type"], "server_error");
}

#[tokio::test]
async fn target_unfit_for_location_header_is_internal_error() {
    let app = stub_app_with(
        Ok(ShortCode::new_unchecked("abc1234")),
        Ok("https://example.com/\nInjected: yes".to_string()),
    );

    let response = app.oneshot(get("/abc1234")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(header::LOCATION).is_none());
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/")
        .header(header::ORIGIN, "https://app.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap();
    assert!(methods.contains("POST"));
    assert!(methods.contains("GET"));
}

#[tokio::test]
async fn cors_headers_on_regular_responses() {
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://app.example")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
