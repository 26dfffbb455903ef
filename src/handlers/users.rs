//! User handlers: create, list, delete.

use crate::error::AppError;
use crate::handlers::extract::{decode_body, path_uuid, read_body, require_non_empty};
use crate::response::{self, CreateUserResponse};
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
pub struct CreateUserRequest {
    pub name: String,
}

pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    let req: CreateUserRequest = decode_body(&read_body(body)?)?;
    require_non_empty("name", &req.name)?;
    let user_id = state.service.create_user(&req.name).await?;
    Ok(response::ok(CreateUserResponse { user_id }))
}

pub async fn get_users(State(state): State<AppState>) -> Result<Response, AppError> {
    let users = state.service.get_users().await?;
    Ok(response::ok(users))
}

pub async fn delete_user(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let id = path_uuid(id)?;
    state.service.delete_user(id).await?;
    Ok(response::ok_empty())
}
