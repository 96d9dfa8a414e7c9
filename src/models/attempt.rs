// src/models/attempt.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'quiz_attempts' table in the database.
/// One row per completed scoring session; immutable once written.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Attempt {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub total_questions: i64,
    pub attempted_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// A history row joined from `quiz_attempts` and `quizzes`.
#[derive(Debug, Serialize, FromRow)]
pub struct HistoryEntry {
    pub id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub total_questions: i64,
    pub attempted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub quiz_title: String,
    pub quiz_code: String,
}
