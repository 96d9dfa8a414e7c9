// src/handlers/user.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{error::AppError, models::user::UserLoginRequest, store::Store};

/// Learner login with login-or-create semantics: an unknown username
/// silently becomes a new account starting at zero points, a known one
/// returns the existing record.
pub async fn login(
    State(store): State<Store>,
    Json(payload): Json<UserLoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user = store.get_or_create_user(&payload.username).await?;

    Ok(Json(json!({
        "success": true,
        "user": user,
    })))
}

/// Past attempts of a user, newest first, each joined with the quiz title
/// and join code.
pub async fn history(
    State(store): State<Store>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let history = store.list_attempts_by_user(user_id).await?;

    Ok(Json(json!({
        "success": true,
        "history": history,
    })))
}
