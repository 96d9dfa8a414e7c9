// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

/// One multiple-choice question, both the generation wire format and the
/// persisted shape (quizzes.questions stores the JSON array verbatim).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// The text content of the question.
    pub question: String,

    /// Exactly four options, e.g. ["A) ...", "B) ...", "C) ...", "D) ..."].
    pub options: Vec<String>,

    /// Index (0-3) of the correct option.
    #[serde(rename = "correctAnswer")]
    pub correct_answer: i64,
}

/// Represents the 'quizzes' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,

    pub host_id: i64,

    pub title: String,

    /// Unique join code learners enter to find the quiz.
    /// Stored uppercase; lookups normalize before querying.
    pub code: String,

    /// Ordered question list, stored as a JSON array column.
    pub questions: Json<Vec<QuizQuestion>>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for a host's quiz list (questions omitted).
#[derive(Debug, Serialize, FromRow)]
pub struct QuizSummary {
    pub id: i64,
    pub title: String,
    pub code: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for creating a new quiz from pasted study content.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    pub host_id: i64,
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title length must be between 1 and 200 characters."
    ))]
    pub title: String,
    #[validate(length(
        min = 1,
        max = 20000,
        message = "Content length must be between 1 and 20000 characters."
    ))]
    pub content: String,
}

/// DTO for submitting a completed quiz session.
/// `answers` carries one selected option index per question, in question
/// order; `None` marks a skipped question.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    pub user_id: i64,
    pub quiz_id: i64,
    pub answers: Vec<Option<i64>>,
}
