//! Request logging middleware configuration

use http::{Request, Response};
use std::time::Duration;
use tower_http::classify::{ServerErrorsAsFailures, ServerErrorsFailureClass, SharedClassifier};
use tower_http::trace::{DefaultOnBodyChunk, DefaultOnEos, DefaultOnRequest, TraceLayer};
use tracing::{info_span, Span};

type SpanFn = fn(&Request<axum::body::Body>) -> Span;
type ResponseFn = fn(&Response<axum::body::Body>, Duration, &Span);
type FailureFn = fn(ServerErrorsFailureClass, Duration, &Span);

pub fn logging_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    SpanFn,
    DefaultOnRequest,
    ResponseFn,
    DefaultOnBodyChunk,
    DefaultOnEos,
    FailureFn,
> {
    let make_span: SpanFn = |request: &Request<axum::body::Body>| {
        info_span!(
            "http_request",
            method = %request.method(),
            path = %request.uri().path(),
            version = ?request.version(),
        )
    };
    let on_response: ResponseFn =
        |response: &Response<axum::body::Body>, latency: Duration, _span: &Span| {
            let status = response.status();
            let latency_ms = latency.as_millis();

            if status.is_success() || status.is_redirection() {
                tracing::info!(
                    status = status.as_u16(),
                    latency_ms = latency_ms,
                    "request completed"
                );
            } else if status.is_client_error() {
                tracing::warn!(
                    status = status.as_u16(),
                    latency_ms = latency_ms,
                    "client error response"
                );
            } else {
                tracing::error!(
                    status = status.as_u16(),
                    latency_ms = latency_ms,
                    "server error response"
                );
            }
        };
    let on_failure: FailureFn =
        |error: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
            tracing::error!(
                latency_ms = latency.as_millis(),
                error = ?error,
                "request failed"
            );
        };

    TraceLayer::new_for_http()
        .make_span_with(make_span)
        .on_response(on_response)
        .on_failure(on_failure)
}
