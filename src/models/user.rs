// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'users' table in the database.
/// Learners are created on first login; there is no user password.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique username.
    pub username: String,

    /// Running total of points earned across all quiz attempts.
    /// Only ever incremented, by the submitted score of each attempt.
    pub total_points: i64,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for user login (login-or-create semantics).
#[derive(Debug, Deserialize, Validate)]
pub struct UserLoginRequest {
    #[validate(length(
        min = 1,
        max = 50,
        message = "Username length must be between 1 and 50 characters."
    ))]
    pub username: String,
}
