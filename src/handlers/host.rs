// src/handlers/host.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::host::HostCredentials,
    store::Store,
    utils::hash::{hash_password, verify_password},
};

/// Creates a host account.
///
/// Hashes the password with Argon2 before storing it; the plaintext never
/// reaches the database. A taken username answers 400 with the
/// documented message.
pub async fn signup(
    State(store): State<Store>,
    Json(payload): Json<HostCredentials>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let hashed_password = hash_password(&payload.password)?;

    let host = store.create_host(&payload.username, &hashed_password).await?;

    Ok(Json(json!({
        "success": true,
        "host": { "id": host.id, "username": host.username },
    })))
}

/// Authenticates a host against the stored Argon2 hash.
///
/// Unknown username and wrong password answer identically with 401, so
/// the response does not reveal which part was wrong.
pub async fn login(
    State(store): State<Store>,
    Json(payload): Json<HostCredentials>,
) -> Result<impl IntoResponse, AppError> {
    let host = store.find_host(&payload.username).await?;

    let host = host.ok_or_else(|| AppError::AuthError("Invalid credentials".to_string()))?;

    if !verify_password(&payload.password, &host.password)? {
        return Err(AppError::AuthError("Invalid credentials".to_string()));
    }

    Ok(Json(json!({
        "success": true,
        "host": host,
    })))
}

/// Lists a host's quizzes, newest first, without question bodies.
pub async fn list_quizzes(
    State(store): State<Store>,
    Path(host_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quizzes = store.list_quizzes_by_host(host_id).await?;

    Ok(Json(json!({
        "success": true,
        "quizzes": quizzes,
    })))
}
