//! Application routing
//!
//! This module defines all HTTP routes for the application.

use axum::{middleware, routing::get, Router};

use crate::api::{config, health};
use crate::middleware::{cors::apply_cors, logging::log_request};
use crate::server::state::AppState;

/// Path of the client config endpoint
pub const CONFIG_PATH: &str = "/app/get-config";

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    // Health check routes
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness))
        .route("/liveness", get(health::liveness));

    // Client config route, optionally wrapped in CORS handling.
    // The CORS layer sits outside method routing so OPTIONS never reaches it.
    let mut config_routes = Router::new().route(CONFIG_PATH, get(config::get_config));
    if let Some(cors) = state.cors.clone() {
        config_routes = config_routes.layer(middleware::from_fn_with_state(cors, apply_cors));
    }

    Router::new()
        .merge(config_routes)
        .merge(health_routes)
        // Custom request logging with trace IDs
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Settings, StorageLocation};
    use crate::schemas::ClientConfig;
    use crate::services::{ConfigSource, FetchError};
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// In-memory source that records how often it is called
    struct StubSource {
        result: Result<ClientConfig, String>,
        calls: AtomicUsize,
        last_location: std::sync::Mutex<Option<StorageLocation>>,
    }

    impl StubSource {
        fn returning(config: ClientConfig) -> Arc<Self> {
            Arc::new(Self {
                result: Ok(config),
                calls: AtomicUsize::new(0),
                last_location: std::sync::Mutex::new(None),
            })
        }

        fn failing(cause: &str) -> Arc<Self> {
            Arc::new(Self {
                result: Err(cause.to_string()),
                calls: AtomicUsize::new(0),
                last_location: std::sync::Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ConfigSource for StubSource {
        async fn fetch(&self, location: &StorageLocation) -> Result<ClientConfig, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_location.lock().unwrap() = Some(location.clone());
            self.result.clone().map_err(FetchError::Open)
        }
    }

    fn sample_config() -> ClientConfig {
        ClientConfig {
            api_key: "AIzaSyExample".to_string(),
            auth_domain: "demo.firebaseapp.com".to_string(),
            project_id: "demo".to_string(),
            storage_bucket: "demo.appspot.com".to_string(),
            messaging_sender_id: "1234567890".to_string(),
            app_id: "1:1234567890:web:abcdef".to_string(),
            measurement_id: "G-XYZ123".to_string(),
        }
    }

    fn settings(location: bool, cors: bool) -> Settings {
        let mut settings = Settings::default();
        if location {
            settings.storage_bucket = Some("configs".to_string());
            settings.storage_object = Some("client.json".to_string());
        }
        settings.cors.enabled = cors;
        settings.cors.allowed_origin = "https://app.example".to_string();
        settings
    }

    fn router(settings: Settings, source: Arc<StubSource>) -> Router {
        create_router(AppState::with_source(settings, source).unwrap())
    }

    async fn send(router: Router, method: Method, uri: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        router.oneshot(request).await.unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_get_config_returns_record() {
        let source = StubSource::returning(sample_config());
        let response = send(router(settings(true, false), source.clone()), Method::GET, CONFIG_PATH).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());

        let body: ClientConfig = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body, sample_config());
        assert_eq!(source.calls(), 1);
        assert_eq!(
            source.last_location.lock().unwrap().clone(),
            Some(StorageLocation::new("configs", "client.json"))
        );
    }

    #[tokio::test]
    async fn test_missing_location_skips_fetch() {
        let source = StubSource::returning(sample_config());
        let response = send(router(settings(false, false), source.clone()), Method::GET, CONFIG_PATH).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_string(response).await,
            "FIREBASE_BUCKET_NAME or FIREBASE_FILE_NAME not set in environment variables"
        );
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_reports_cause() {
        let source = StubSource::failing("NoSuchBucket: The specified bucket does not exist");
        let response = send(router(settings(true, true), source.clone()), Method::GET, CONFIG_PATH).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
        // CORS headers are present on error responses too
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://app.example"
        );

        let body = body_string(response).await;
        assert!(body.starts_with("Error fetching client config: "));
        assert!(body.contains("NoSuchBucket: The specified bucket does not exist"));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_cors_headers_on_success() {
        let source = StubSource::returning(sample_config());
        let response = send(router(settings(true, true), source), Method::GET, CONFIG_PATH).await;

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://app.example");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, OPTIONS");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    }

    #[tokio::test]
    async fn test_preflight_short_circuits() {
        for location in [true, false] {
            let source = StubSource::returning(sample_config());
            let response =
                send(router(settings(location, true), source.clone()), Method::OPTIONS, CONFIG_PATH).await;

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
                "https://app.example"
            );
            assert_eq!(body_string(response).await, "");
            assert_eq!(source.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_options_without_cors_is_not_allowed() {
        let source = StubSource::returning(sample_config());
        let response = send(router(settings(true, false), source.clone()), Method::OPTIONS, CONFIG_PATH).await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_responses_carry_trace_id() {
        let source = StubSource::returning(sample_config());
        let request = Request::builder()
            .uri(CONFIG_PATH)
            .header("x-request-id", "req-42")
            .body(Body::empty())
            .unwrap();

        let response = router(settings(true, false), source).oneshot(request).await.unwrap();

        assert_eq!(response.headers()["x-trace-id"], "req-42");
        assert_eq!(response.headers()["x-request-id"], "req-42");
    }

    #[tokio::test]
    async fn test_readiness_tracks_storage_location() {
        let response = send(
            router(settings(false, false), StubSource::returning(sample_config())),
            Method::GET,
            "/ready",
        )
        .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["ready"], false);
        assert_eq!(body["checks"], serde_json::json!({ "storage_location": false }));

        let response = send(
            router(settings(true, false), StubSource::returning(sample_config())),
            Method::GET,
            "/ready",
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["ready"], true);
        assert_eq!(body["checks"], serde_json::json!({ "storage_location": true }));
    }

    #[tokio::test]
    async fn test_health_and_liveness() {
        let source = StubSource::returning(sample_config());
        let response = send(router(settings(false, false), source.clone()), Method::GET, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["environment"], "development");

        let response = send(router(settings(false, false), source), Method::GET, "/liveness").await;
        assert_eq!(body_string(response).await, r#"{"alive":true}"#);
    }
}
