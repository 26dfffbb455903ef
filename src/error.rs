//! Typed errors and HTTP mapping.

use crate::middleware::RequestOutcome;
use crate::response::{Envelope, ErrorCode};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Failure class carried from the store up to the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Internal,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("cannot load env file {path}")]
    EnvFile {
        path: String,
        #[source]
        source: dotenvy::Error,
    },
    #[error("log level: {0}")]
    LogLevel(String),
}

/// Persistence gateway failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("database")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::Database(sqlx::Error::RowNotFound) => ErrorKind::NotFound,
            StoreError::Database(_) => ErrorKind::Internal,
        }
    }
}

/// Gateway failure wrapped with the use-case operation that triggered it.
#[derive(Error, Debug)]
#[error("{op}")]
pub struct ServiceError {
    pub op: &'static str,
    #[source]
    pub source: StoreError,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

/// Errors surfaced by HTTP handlers.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("json: {0}")]
    JsonParsing(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::JsonParsing(_) | AppError::Validation(_) => ErrorKind::Validation,
            AppError::Service(e) => e.kind(),
        }
    }

    fn status_and_detail(&self) -> (StatusCode, ErrorCode, String) {
        match self {
            AppError::JsonParsing(_) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::JsonParsingFailed,
                "Invalid request body".into(),
            ),
            AppError::Validation(desc) => (StatusCode::BAD_REQUEST, ErrorCode::ValidationFailed, desc.clone()),
            AppError::Service(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "internal server error".into(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, desc) = self.status_and_detail();
        let body = Envelope::<()>::failure(status, code, desc);
        let mut response = (status, Json(body)).into_response();
        response
            .extensions_mut()
            .insert(RequestOutcome::failed(self.kind(), error_chain(&self)));
        response
    }
}

/// Render an error and its sources as `outer: inner: root`.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut next = err.source();
    while let Some(cause) = next {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        next = cause.source();
    }
    out
}
