//! Message resource handlers

use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use board_types::Message;
use serde::Deserialize;
use serde_json::{json, Value};

/// Fields arrive as `Option` so a missing key maps to the 400 contract
/// instead of a body-decode rejection.
#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    body: Option<String>,
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMessageRequest {
    body: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    // A request without a decodable JSON object gets the same 400 as one
    // with missing fields.
    let Json(req) = payload.map_err(|_| ApiError::InvalidInput)?;

    let message = state.messages.create(req.body, req.username).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = state.messages.list().await?;
    Ok(Json(messages))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateMessageRequest>, JsonRejection>,
) -> Result<Json<Message>, ApiError> {
    let Json(req) = payload.map_err(|_| ApiError::InvalidInput)?;

    let message = state.messages.update(id, req.body).await?;
    Ok(Json(message))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    state.messages.delete(id).await?;
    Ok(Json(json!({ "message": "Message deleted" })))
}
