// src/store.rs

use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{
        attempt::{Attempt, HistoryEntry},
        host::Host,
        quiz::{Quiz, QuizQuestion, QuizSummary},
        user::User,
    },
    utils::code::generate_join_code,
};

/// Upper bound on join-code regeneration when an insert collides.
/// With 36^6 possible codes this is effectively never reached.
const MAX_CODE_ATTEMPTS: usize = 16;

/// Persistence layer over the SQLite pool. Constructed once at startup and
/// handed to the router state; handlers never touch the pool directly.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a new host. A username collision maps to `Conflict` so the
    /// handler can answer with the documented duplicate-username message.
    pub async fn create_host(&self, username: &str, password_hash: &str) -> Result<Host, AppError> {
        sqlx::query_as::<_, Host>(
            r#"
            INSERT INTO hosts (username, password)
            VALUES (?, ?)
            RETURNING id, username, password, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Username already exists".to_string())
            } else {
                tracing::error!("Failed to create host: {:?}", e);
                AppError::from(e)
            }
        })
    }

    pub async fn find_host(&self, username: &str) -> Result<Option<Host>, AppError> {
        let host = sqlx::query_as::<_, Host>("SELECT * FROM hosts WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(host)
    }

    /// Login-or-create semantics: an unknown username creates the account
    /// with zero points. The upsert makes this a single race-free
    /// statement, so two concurrent first logins both get the same row.
    pub async fn get_or_create_user(&self, username: &str) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username)
            VALUES (?)
            ON CONFLICT(username) DO UPDATE SET username = excluded.username
            RETURNING id, username, total_points, created_at
            "#,
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_user(&self, user_id: i64) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        user.ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Atomic read-modify-write: the addition happens inside the UPDATE so
    /// concurrent submissions for the same user never lose an increment.
    pub async fn increment_user_points(&self, user_id: i64, delta: i64) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET total_points = total_points + ? WHERE id = ?")
            .bind(delta)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(())
    }

    /// Persists a generated quiz under a fresh join code, regenerating the
    /// code on collision rather than surfacing the conflict.
    pub async fn create_quiz(
        &self,
        host_id: i64,
        title: &str,
        questions: &[QuizQuestion],
    ) -> Result<Quiz, AppError> {
        self.create_quiz_with_codes(host_id, title, questions, generate_join_code)
            .await
    }

    /// Code generation is injected so tests can force a synthetic
    /// collision and observe the retry.
    pub async fn create_quiz_with_codes(
        &self,
        host_id: i64,
        title: &str,
        questions: &[QuizQuestion],
        mut next_code: impl FnMut() -> String + Send,
    ) -> Result<Quiz, AppError> {
        let questions_json = serde_json::to_string(questions)
            .map_err(|e| AppError::InternalServerError(format!("questions unserializable: {e}")))?;

        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = next_code();

            let inserted = sqlx::query_as::<_, Quiz>(
                r#"
                INSERT INTO quizzes (host_id, title, code, questions)
                VALUES (?, ?, ?, ?)
                RETURNING id, host_id, title, code, questions, created_at
                "#,
            )
            .bind(host_id)
            .bind(title)
            .bind(&code)
            .bind(&questions_json)
            .fetch_one(&self.pool)
            .await;

            match inserted {
                Ok(quiz) => return Ok(quiz),
                Err(e) if is_code_collision(&e) => {
                    tracing::warn!("Join code {} collided, regenerating", code);
                    continue;
                }
                Err(e) => {
                    tracing::error!("Failed to create quiz: {:?}", e);
                    return Err(AppError::from(e));
                }
            }
        }

        Err(AppError::InternalServerError(
            "join code generation exhausted its retry budget".to_string(),
        ))
    }

    /// Lookup is case-sensitive on the stored (uppercase) value; callers
    /// normalize the entered code before querying.
    pub async fn get_quiz_by_code(&self, code: &str) -> Result<Option<Quiz>, AppError> {
        let quiz = sqlx::query_as::<_, Quiz>("SELECT * FROM quizzes WHERE code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(quiz)
    }

    pub async fn get_quiz(&self, quiz_id: i64) -> Result<Quiz, AppError> {
        let quiz = sqlx::query_as::<_, Quiz>("SELECT * FROM quizzes WHERE id = ?")
            .bind(quiz_id)
            .fetch_optional(&self.pool)
            .await?;

        quiz.ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))
    }

    pub async fn list_quizzes_by_host(&self, host_id: i64) -> Result<Vec<QuizSummary>, AppError> {
        let quizzes = sqlx::query_as::<_, QuizSummary>(
            r#"
            SELECT id, title, code, created_at
            FROM quizzes
            WHERE host_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(host_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(quizzes)
    }

    pub async fn record_attempt(
        &self,
        user_id: i64,
        quiz_id: i64,
        score: i64,
        total_questions: i64,
    ) -> Result<Attempt, AppError> {
        let attempt = sqlx::query_as::<_, Attempt>(
            r#"
            INSERT INTO quiz_attempts (user_id, quiz_id, score, total_questions)
            VALUES (?, ?, ?, ?)
            RETURNING id, user_id, quiz_id, score, total_questions, attempted_at
            "#,
        )
        .bind(user_id)
        .bind(quiz_id)
        .bind(score)
        .bind(total_questions)
        .fetch_one(&self.pool)
        .await?;

        Ok(attempt)
    }

    pub async fn list_attempts_by_user(&self, user_id: i64) -> Result<Vec<HistoryEntry>, AppError> {
        let history = sqlx::query_as::<_, HistoryEntry>(
            r#"
            SELECT
                qa.id,
                qa.quiz_id,
                qa.score,
                qa.total_questions,
                qa.attempted_at,
                q.title AS quiz_title,
                q.code AS quiz_code
            FROM quiz_attempts qa
            JOIN quizzes q ON qa.quiz_id = q.id
            WHERE qa.user_id = ?
            ORDER BY qa.attempted_at DESC, qa.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(history)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

/// SQLite reports the violated constraint by name, which lets us retry
/// only on code collisions and still propagate anything else.
fn is_code_collision(err: &sqlx::Error) -> bool {
    is_unique_violation(err) && err.to_string().contains("quizzes.code")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_store() -> Store {
        // A single connection keeps every task on the same in-memory
        // database (each new :memory: connection would be a fresh one).
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory SQLite");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to migrate test database");

        Store::new(pool)
    }

    fn sample_questions() -> Vec<QuizQuestion> {
        (0..5i64)
            .map(|i| QuizQuestion {
                question: format!("Question {}", i),
                options: vec![
                    "A) one".to_string(),
                    "B) two".to_string(),
                    "C) three".to_string(),
                    "D) four".to_string(),
                ],
                correct_answer: i % 4,
            })
            .collect()
    }

    #[tokio::test]
    async fn get_or_create_user_is_idempotent() {
        let store = test_store().await;

        let first = store.get_or_create_user("learner").await.unwrap();
        let second = store.get_or_create_user("learner").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.total_points, 0);
    }

    #[tokio::test]
    async fn concurrent_increments_never_lose_updates() {
        let store = test_store().await;
        let user = store.get_or_create_user("racer").await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..20 {
            let store = store.clone();
            let user_id = user.id;
            handles.push(tokio::spawn(async move {
                store.increment_user_points(user_id, 1).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let user = store.get_user(user.id).await.unwrap();
        assert_eq!(user.total_points, 20);
    }

    #[tokio::test]
    async fn code_collision_triggers_regeneration() {
        let store = test_store().await;
        let host = store.create_host("quizmaster", "hash").await.unwrap();
        let questions = sample_questions();

        let first = store
            .create_quiz_with_codes(host.id, "First", &questions, || "AAAAAA".to_string())
            .await
            .unwrap();
        assert_eq!(first.code, "AAAAAA");

        // The second quiz draws the taken code once, then a fresh one.
        let mut codes = vec!["AAAAAA", "BBBBBB"].into_iter();
        let second = store
            .create_quiz_with_codes(host.id, "Second", &questions, || {
                codes.next().unwrap().to_string()
            })
            .await
            .unwrap();

        assert_eq!(second.code, "BBBBBB");
    }

    #[tokio::test]
    async fn quiz_round_trips_by_code_in_order() {
        let store = test_store().await;
        let host = store.create_host("quizmaster", "hash").await.unwrap();
        let questions = sample_questions();

        let created = store
            .create_quiz(host.id, "Biology 101", &questions)
            .await
            .unwrap();

        let fetched = store
            .get_quiz_by_code(&created.code)
            .await
            .unwrap()
            .expect("quiz should be found by its code");

        assert_eq!(fetched.title, "Biology 101");
        assert_eq!(fetched.questions.0, questions);
    }

    #[tokio::test]
    async fn duplicate_host_username_conflicts() {
        let store = test_store().await;
        store.create_host("dup", "hash").await.unwrap();

        let err = store.create_host("dup", "other").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
