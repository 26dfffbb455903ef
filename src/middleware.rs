//! Per-request logging. Handlers report failures by attaching a [`RequestOutcome`]
//! to their response; this layer reads it back and emits one line per request.

use crate::error::ErrorKind;
use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::time::Instant;

/// Errors accumulated while serving one request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOutcome {
    pub kind: Option<ErrorKind>,
    pub errors: Vec<String>,
}

impl RequestOutcome {
    pub fn failed(kind: ErrorKind, error: String) -> Self {
        RequestOutcome {
            kind: Some(kind),
            errors: vec![error],
        }
    }
}

pub async fn log_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let remote = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".into());

    tracing::debug!(%method, %path, %remote, "request started");

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
    match response.extensions().get::<RequestOutcome>() {
        Some(outcome) if !outcome.errors.is_empty() => {
            tracing::error!(
                %method,
                %path,
                %remote,
                status,
                duration_ms,
                kind = ?outcome.kind,
                errors = ?outcome.errors,
                "request failed"
            );
        }
        _ => {
            tracing::info!(%method, %path, %remote, status, duration_ms, "request completed");
        }
    }
    response
}
