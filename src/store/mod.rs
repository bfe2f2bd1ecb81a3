// src/store/mod.rs

pub mod memory;
pub mod postgres;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{quiz::Quiz, submission::Submission, user::User};

/// Failure inside a store backend.
/// Surfaced to callers as a retryable service error, never converted
/// into a default value.
#[derive(Debug)]
pub struct StoreError(pub String);

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Service(err.0)
    }
}

/// Persistence contract for quiz documents.
///
/// **Send + Sync + async_trait** are required to make the trait objects
/// safely shareable across Axum's asynchronous task boundaries.
#[async_trait]
pub trait QuizStore: Send + Sync {
    async fn insert(&self, quiz: Quiz) -> Result<(), StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<Quiz>, StoreError>;
    /// All quizzes, newest first.
    async fn list(&self) -> Result<Vec<Quiz>, StoreError>;
    /// Replaces the stored document for `quiz.id`.
    /// Returns false when the quiz does not exist.
    async fn replace(&self, quiz: &Quiz) -> Result<bool, StoreError>;
    /// Returns false when the quiz does not exist.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Persistence contract for scored submission records.
/// Insert-only: retakes create new records, nothing is upserted.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn insert(&self, submission: Submission) -> Result<(), StoreError>;
    /// All submissions for a quiz, newest first.
    async fn list_for_quiz(&self, quiz_id: Uuid) -> Result<Vec<Submission>, StoreError>;
    async fn count_for_quiz(&self, quiz_id: Uuid) -> Result<i64, StoreError>;
}

/// Persistence contract for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: User) -> Result<(), StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    /// Fetches the users whose ids appear in `ids`; missing ids are
    /// silently absent from the result.
    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreError>;
}

/// Bundle of store handles shared through the application state.
#[derive(Clone)]
pub struct Stores {
    pub quizzes: Arc<dyn QuizStore>,
    pub submissions: Arc<dyn SubmissionStore>,
    pub users: Arc<dyn UserStore>,
}
