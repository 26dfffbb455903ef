//! Answer handlers. Answers are created under a question and addressed by id afterwards.

use crate::domain::NewAnswer;
use crate::error::AppError;
use crate::handlers::extract::{decode_body, parse_uuid, path_id, read_body, require_non_empty};
use crate::response::{self, CreateAnswerResponse};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    response::Response,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateAnswerRequest {
    pub user_id: String,
    pub text: String,
}

/// Checks run in order: body, question id, text, user id. Whether the question and
/// user exist is left to the store's foreign keys.
pub async fn create_answer_to_question(
    State(state): State<AppState>,
    question_id: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    let req: CreateAnswerRequest = decode_body(&read_body(body)?)?;
    let question_id = path_id(question_id)?;
    require_non_empty("text", &req.text)?;
    let user_id = parse_uuid("user_id", &req.user_id)?;
    let answer = NewAnswer {
        question_id,
        user_id,
        text: req.text,
    };
    let answer_id = state.service.create_answer_to_question(&answer).await?;
    Ok(response::ok(CreateAnswerResponse { answer_id }))
}

pub async fn get_answer(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let id = path_id(id)?;
    let answer = state.service.get_answer(id).await?;
    Ok(response::ok(answer))
}

pub async fn delete_answer(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let id = path_id(id)?;
    state.service.delete_answer(id).await?;
    Ok(response::ok_empty())
}
