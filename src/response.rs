//! Standard response envelope: `{status, error?, data?}`.

use crate::domain::{Answer, Question};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationFailed,
    JsonParsingFailed,
    InternalServerError,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: ErrorCode,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub desc: String,
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// Canonical reason phrase of the HTTP status, e.g. "Bad Request".
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

fn status_text(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_string()
}

impl<T: Serialize> Envelope<T> {
    pub fn success(status: StatusCode, data: T) -> Self {
        Envelope {
            status: status_text(status),
            error: None,
            data: Some(data),
        }
    }

    pub fn empty(status: StatusCode) -> Self {
        Envelope {
            status: status_text(status),
            error: None,
            data: None,
        }
    }

    pub fn failure(status: StatusCode, code: ErrorCode, desc: String) -> Self {
        Envelope {
            status: status_text(status),
            error: Some(ErrorDetail { code, desc }),
            data: None,
        }
    }
}

/// 200 with `data`.
pub fn ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(Envelope::success(StatusCode::OK, data))).into_response()
}

/// 200 without `data`, for deletes.
pub fn ok_empty() -> Response {
    (StatusCode::OK, Json(Envelope::<()>::empty(StatusCode::OK))).into_response()
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CreateQuestionResponse {
    pub question_id: i64,
}

#[derive(Debug, Serialize)]
pub struct QuestionWithAnswersResponse {
    pub question: Question,
    pub answers: Vec<Answer>,
}

#[derive(Debug, Serialize)]
pub struct CreateAnswerResponse {
    pub answer_id: i64,
}
