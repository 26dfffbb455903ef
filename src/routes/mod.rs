//! Router assembly: the QnA routes plus fallbacks and the cross-cutting layers.
//! Every response leaving the router, including rejections, is an envelope.

mod qna;

pub use qna::qna_routes;

use crate::error::ErrorKind;
use crate::middleware::{log_requests, RequestOutcome};
use crate::response::{Envelope, ErrorCode};
use crate::state::AppState;
use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    BoxError, Json, Router,
};
use std::time::Duration;
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{cors::CorsLayer, timeout::RequestBodyTimeoutLayer};

/// Time allowed for receiving a request head or body.
pub const READ_TIMEOUT: Duration = Duration::from_secs(5);
/// Time allowed for producing a response.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(10);
/// Connections with no request in flight are closed after this long.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_BODY_BYTES: usize = 1024 * 1024;

fn reject(status: StatusCode, code: ErrorCode, desc: &str) -> Response {
    let body = Envelope::<()>::failure(status, code, desc.to_string());
    (status, Json(body)).into_response()
}

async fn route_not_found() -> Response {
    reject(StatusCode::NOT_FOUND, ErrorCode::ValidationFailed, "route not found")
}

async fn method_not_allowed() -> Response {
    reject(
        StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::ValidationFailed,
        "method not allowed",
    )
}

async fn handling_failed(err: BoxError) -> Response {
    let reason = if err.is::<tower::timeout::error::Elapsed>() {
        format!("handling timed out after {}s", WRITE_TIMEOUT.as_secs())
    } else {
        format!("handling failed: {err}")
    };
    let mut response = reject(
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCode::InternalServerError,
        "internal server error",
    );
    response
        .extensions_mut()
        .insert(RequestOutcome::failed(ErrorKind::Internal, reason));
    response
}

/// Full application router. Layer order, outermost first: logging, CORS,
/// handling timeout, body read timeout, body size limit.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(qna_routes(state))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(RequestBodyTimeoutLayer::new(READ_TIMEOUT))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handling_failed))
                .layer(TimeoutLayer::new(WRITE_TIMEOUT)),
        )
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(log_requests))
}
