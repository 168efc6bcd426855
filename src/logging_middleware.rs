// src/logging_middleware.rs
//! Logs JSON request and response bodies at debug level

use axum::body::{to_bytes, HttpBody};
use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tracing::debug;

/// Bodies larger than this, or of unknown size, are passed through unlogged
const MAX_LOGGED_BODY: usize = 1024 * 1024;

/// Middleware to log request and response bodies
pub async fn log_request_response(request: Request, next: Next) -> Result<Response, StatusCode> {
    let (parts, body) = request.into_parts();
    let body = if fits_log_limit(&body) {
        let bytes = to_bytes(body, MAX_LOGGED_BODY)
            .await
            .map_err(|_| StatusCode::BAD_REQUEST)?;
        if let Some(rendered) = render_body(&bytes) {
            debug!(method = %parts.method, uri = %parts.uri, request_body = %rendered, "Request");
        }
        Body::from(bytes)
    } else {
        debug!(method = %parts.method, uri = %parts.uri, "Request body not logged");
        body
    };

    let response = next.run(Request::from_parts(parts, body)).await;

    let (parts, body) = response.into_parts();
    let body = if fits_log_limit(&body) {
        let bytes = to_bytes(body, MAX_LOGGED_BODY)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
        if let Some(rendered) = render_body(&bytes) {
            debug!(status = %parts.status, response_body = %rendered, "Response");
        }
        Body::from(bytes)
    } else {
        body
    };

    Ok(Response::from_parts(parts, body))
}

/// Only bodies with a known upper bound within the limit get buffered
fn fits_log_limit(body: &Body) -> bool {
    body.size_hint()
        .upper()
        .map_or(false, |upper| upper <= MAX_LOGGED_BODY as u64)
}

/// Pretty JSON when possible, raw UTF-8 otherwise, nothing for empty or binary bodies
fn render_body(bytes: &Bytes) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }
    let text = std::str::from_utf8(bytes).ok()?;
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(json) => Some(serde_json::to_string_pretty(&json).unwrap_or_else(|_| text.to_string())),
        Err(_) => Some(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::post, Router};
    use tower::ServiceExt;

    #[test]
    fn test_render_body() {
        assert_eq!(render_body(&Bytes::new()), None);
        assert_eq!(render_body(&Bytes::from_static(b"plain")), Some("plain".to_string()));
        assert_eq!(
            render_body(&Bytes::from_static(br#"{"a":1}"#)),
            Some("{\n  \"a\": 1\n}".to_string())
        );
        assert_eq!(render_body(&Bytes::from_static(&[0xff, 0xfe])), None);
    }

    #[tokio::test]
    async fn test_bodies_pass_through_unchanged() {
        let app = Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn(log_request_response));

        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/echo")
            .body(Body::from("{\"x\":true}"))
            .expect("valid request");

        let response = app.oneshot(request).await.expect("infallible");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        assert_eq!(&bytes[..], b"{\"x\":true}");
    }

    #[tokio::test]
    async fn test_oversized_bodies_pass_through() {
        let app = Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn(log_request_response));

        let large = "a".repeat(MAX_LOGGED_BODY + 1);
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/echo")
            .body(Body::from(large.clone()))
            .expect("valid request");

        let response = app.oneshot(request).await.expect("infallible");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        assert_eq!(bytes.len(), large.len());
    }

    #[test]
    fn test_log_limit_uses_size_hint() {
        assert!(fits_log_limit(&Body::from("small")));
        assert!(!fits_log_limit(&Body::from(vec![0u8; MAX_LOGGED_BODY + 1])));
    }
}
