// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::{
    error::AppError,
    generation::QuestionGenerator,
    models::quiz::{CreateQuizRequest, SubmitQuizRequest},
    scoring::score_answers,
    store::Store,
};

/// Creates a quiz from pasted study content.
///
/// The generation adapter turns the content into validated questions;
/// the store persists them under a fresh join code. Generation failures
/// answer 500 with a generic retry message (detail is logged at the
/// error boundary).
pub async fn create(
    State(store): State<Store>,
    State(generator): State<Arc<dyn QuestionGenerator>>,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let questions = generator.generate(&payload.content).await?;

    let quiz = store
        .create_quiz(payload.host_id, &payload.title, &questions)
        .await?;

    tracing::info!("Host {} created quiz {} ({})", payload.host_id, quiz.id, quiz.code);

    Ok(Json(json!({
        "success": true,
        "quiz": {
            "id": quiz.id,
            "code": quiz.code,
            "questions": quiz.questions,
        },
    })))
}

/// Fetches a quiz by its join code. Entered codes are normalized to
/// uppercase before the (case-sensitive) lookup.
pub async fn get_by_code(
    State(store): State<Store>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let normalized = code.trim().to_uppercase();

    let quiz = store.get_quiz_by_code(&normalized).await?;

    let quiz = quiz.ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "quiz": quiz,
    })))
}

/// Scores a completed session and records it.
///
/// The score is computed here from the submitted answer indices and the
/// stored correct answers, which keeps `score <= total_questions` by
/// construction. Exactly one attempt row and one atomic points increment
/// per session; there is no cross-row transaction, so a failure between
/// the two can leave totals ahead of history (known, accepted gap).
pub async fn submit(
    State(store): State<Store>,
    Json(payload): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = store.get_quiz(payload.quiz_id).await?;

    let score = score_answers(&payload.answers, &quiz.questions.0);
    let total_questions = quiz.questions.0.len() as i64;

    store
        .record_attempt(payload.user_id, payload.quiz_id, score, total_questions)
        .await?;
    store.increment_user_points(payload.user_id, score).await?;

    let user = store.get_user(payload.user_id).await?;

    Ok(Json(json!({
        "success": true,
        "totalPoints": user.total_points,
    })))
}
