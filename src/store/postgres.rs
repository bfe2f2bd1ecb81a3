// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{QuizStore, StoreError, SubmissionStore, UserStore};
use crate::models::{quiz::Quiz, submission::Submission, user::User};

/// Postgres-backed quiz store.
/// The question list lives in a JSONB column so the ordered document
/// round-trips exactly as it is served.
#[derive(Clone)]
pub struct PgQuizStore {
    pool: PgPool,
}

impl PgQuizStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuizStore for PgQuizStore {
    async fn insert(&self, quiz: Quiz) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO quizzes (id, title, creator_id, questions, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(quiz.id)
        .bind(&quiz.title)
        .bind(quiz.creator_id)
        .bind(&quiz.questions)
        .bind(quiz.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Quiz>, StoreError> {
        let quiz = sqlx::query_as::<_, Quiz>(
            "SELECT id, title, creator_id, questions, created_at \
             FROM quizzes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(quiz)
    }

    async fn list(&self) -> Result<Vec<Quiz>, StoreError> {
        let quizzes = sqlx::query_as::<_, Quiz>(
            "SELECT id, title, creator_id, questions, created_at \
             FROM quizzes ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(quizzes)
    }

    async fn replace(&self, quiz: &Quiz) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE quizzes SET title = $2, questions = $3 WHERE id = $1")
            .bind(quiz.id)
            .bind(&quiz.title)
            .bind(&quiz.questions)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Postgres-backed submission store. Insert-only.
#[derive(Clone)]
pub struct PgSubmissionStore {
    pool: PgPool,
}

impl PgSubmissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionStore for PgSubmissionStore {
    async fn insert(&self, submission: Submission) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO submissions (id, quiz_id, user_id, answers, score, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(submission.id)
        .bind(submission.quiz_id)
        .bind(submission.user_id)
        .bind(&submission.answers)
        .bind(submission.score)
        .bind(submission.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_for_quiz(&self, quiz_id: Uuid) -> Result<Vec<Submission>, StoreError> {
        let submissions = sqlx::query_as::<_, Submission>(
            "SELECT id, quiz_id, user_id, answers, score, created_at \
             FROM submissions WHERE quiz_id = $1 ORDER BY created_at DESC",
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(submissions)
    }

    async fn count_for_quiz(&self, quiz_id: Uuid) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM submissions WHERE quiz_id = $1",
        )
        .bind(quiz_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

/// Postgres-backed user store.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: User) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO users (id, name, email, password, role, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.role)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, role, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, role, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        // QueryBuilder for the dynamic IN clause
        let mut query_builder = QueryBuilder::<Postgres>::new(
            "SELECT id, name, email, password, role, created_at FROM users WHERE id IN (",
        );

        let mut separated = query_builder.separated(",");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let users = query_builder
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }
}
