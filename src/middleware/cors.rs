//! CORS middleware for the config route
//!
//! Echoes a fixed set of CORS headers on every response and answers
//! `OPTIONS` preflight requests directly, without running the handler.

use anyhow::Context;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Methods advertised to browsers
pub const ALLOWED_METHODS: &str = "GET, OPTIONS";

/// Request headers advertised to browsers
pub const ALLOWED_HEADERS: &str = "Content-Type";

/// Pre-validated CORS header values
#[derive(Clone, Debug)]
pub struct CorsHeaders {
    allow_origin: HeaderValue,
}

impl CorsHeaders {
    /// Build the header set for a single allowed origin
    pub fn new(allowed_origin: &str) -> anyhow::Result<Self> {
        let allow_origin = HeaderValue::from_str(allowed_origin)
            .with_context(|| format!("Invalid CORS origin: {:?}", allowed_origin))?;

        Ok(Self { allow_origin })
    }

    fn apply(&self, response: &mut Response) {
        let headers = response.headers_mut();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
    }
}

/// Middleware applying [`CorsHeaders`] and short-circuiting preflight
///
/// # Example
///
/// ```ignore
/// Router::new()
///     .route("/app/get-config", get(get_config))
///     .layer(axum::middleware::from_fn_with_state(cors_headers, apply_cors))
/// ```
pub async fn apply_cors(
    State(cors): State<CorsHeaders>,
    request: Request,
    next: Next,
) -> Response<Body> {
    let mut response = if request.method() == Method::OPTIONS {
        tracing::debug!(path = %request.uri().path(), "Answering CORS preflight");
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    cors.apply(&mut response);
    response
}
