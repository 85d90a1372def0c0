//! Outer layers for the account API: `x-request-id`, request tracing, and the
//! body size and timeout limits read from `REQUEST_BODY_LIMIT_BYTES` /
//! `REQUEST_TIMEOUT_SECONDS`.

use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::http::{StatusCode, header::HeaderName};
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone, Copy)]
pub struct HttpLimits {
    pub body_limit_bytes: usize,
    pub timeout: Duration,
}

/// Wrap the whole account router. The gate sits inside these layers, so a
/// denied request still gets a request id and a trace span.
pub fn apply(router: Router, limits: HttpLimits) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");

    let layers = ServiceBuilder::new()
        // timeout -> 408
        .layer(HandleErrorLayer::new(|err: BoxError| async move {
            if err.is::<tower::timeout::error::Elapsed>() {
                StatusCode::REQUEST_TIMEOUT
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }))
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(RequestBodyLimitLayer::new(limits.body_limit_bytes))
        .layer(TimeoutLayer::new(limits.timeout))
        .layer(TraceLayer::new_for_http());

    router.layer(layers)
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    use super::*;

    fn limits() -> HttpLimits {
        HttpLimits {
            body_limit_bytes: 16,
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn request_id_is_generated_and_propagated() {
        let app = apply(Router::new().route("/health", get(|| async { "ok" })), limits());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("x-request-id").is_some());
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let app = apply(
            Router::new().route("/echo", axum::routing::post(|body: String| async move { body })),
            limits(),
        );

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/echo")
                    .header("content-length", "64")
                    .body(Body::from("x".repeat(64)))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn caller_request_id_is_echoed() {
        let app = apply(Router::new().route("/health", get(|| async { "ok" })), limits());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", "acct-req-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "acct-req-1");
    }

    #[tokio::test]
    async fn slow_handler_times_out_with_408() {
        let limits = HttpLimits {
            body_limit_bytes: 16,
            timeout: Duration::from_millis(20),
        };
        let app = apply(
            Router::new().route(
                "/accounts",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            ),
            limits,
        );

        let response = app
            .oneshot(Request::builder().uri("/accounts").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
