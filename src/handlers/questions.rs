//! Question handlers. Reading a question returns its answers with it.

use crate::error::AppError;
use crate::handlers::extract::{decode_body, path_id, read_body, require_non_empty};
use crate::response::{self, CreateQuestionResponse, QuestionWithAnswersResponse};
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
pub struct CreateQuestionRequest {
    pub text: String,
}

pub async fn get_questions(State(state): State<AppState>) -> Result<Response, AppError> {
    let questions = state.service.get_questions().await?;
    Ok(response::ok(questions))
}

pub async fn create_question(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    let req: CreateQuestionRequest = decode_body(&read_body(body)?)?;
    require_non_empty("text", &req.text)?;
    let question_id = state.service.create_question(&req.text).await?;
    Ok(response::ok(CreateQuestionResponse { question_id }))
}

pub async fn get_question_and_answers(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let id = path_id(id)?;
    let (question, answers) = state.service.get_question_and_answers(id).await?;
    Ok(response::ok(QuestionWithAnswersResponse { question, answers }))
}

/// Answers go with the question.
pub async fn delete_question_and_answers(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let id = path_id(id)?;
    state.service.delete_question_and_answers(id).await?;
    Ok(response::ok_empty())
}
