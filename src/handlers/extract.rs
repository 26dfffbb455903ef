//! Request decoding and field validation shared by the handlers.

use crate::error::AppError;
use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path,
    },
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Raw request body. A body that could not be read (too large, read timeout,
/// broken stream) is reported the same way as one that is not JSON.
pub fn read_body(body: Result<Bytes, BytesRejection>) -> Result<Bytes, AppError> {
    body.map_err(|e| AppError::JsonParsing(e.body_text()))
}

/// Decode a JSON body regardless of Content-Type. Absent fields and a literal
/// `null` body fall back to defaults so the field checks report them.
pub fn decode_body<T>(body: &[u8]) -> Result<T, AppError>
where
    T: DeserializeOwned + Default,
{
    serde_json::from_slice::<Option<T>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| AppError::JsonParsing(e.to_string()))
}

pub fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(AppError::Validation(format!("field \"{}\" must not be empty", field)));
    }
    Ok(())
}

pub fn parse_uuid(field: &str, raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("invalid UUID format for \"{}\"", field)))
}

fn invalid_id() -> AppError {
    AppError::Validation("invalid ID format for \"id\"".into())
}

/// Question and answer ids: base-10 integers, at least 1.
pub fn parse_positive_id(raw: &str) -> Result<i64, AppError> {
    let id: i64 = raw.parse().map_err(|_| invalid_id())?;
    if id < 1 {
        return Err(AppError::Validation("ID must be a positive integer".into()));
    }
    Ok(id)
}

/// `:id` segment of a question or answer route. A segment the router cannot
/// decode fails like any other malformed id.
pub fn path_id(path: Result<Path<String>, PathRejection>) -> Result<i64, AppError> {
    let Path(raw) = path.map_err(|_| invalid_id())?;
    parse_positive_id(&raw)
}

/// `:id` segment of a user route.
pub fn path_uuid(path: Result<Path<String>, PathRejection>) -> Result<Uuid, AppError> {
    match path {
        Ok(Path(raw)) => parse_uuid("id", &raw),
        Err(_) => Err(AppError::Validation("invalid UUID format for \"id\"".into())),
    }
}
