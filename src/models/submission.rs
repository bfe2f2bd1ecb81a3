// src/models/submission.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use uuid::Uuid;

use crate::models::user::PublicUser;

/// Represents the 'submissions' table in the database.
/// One scored record per submit action; rows are inserted once and never
/// mutated. Retakes create independent records.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,

    pub quiz_id: Uuid,

    pub user_id: Uuid,

    /// Selected option index per question position. `None` marks an
    /// unanswered position. Stored as given, including out-of-range
    /// indices from stale clients.
    pub answers: Json<Vec<Option<i64>>>,

    /// Count of positions matching the quiz's answer key at submit time.
    pub score: i64,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for submitting an attempt's answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAnswersRequest {
    pub answers: Vec<Option<i64>>,
}

/// Scoring result returned to the submitting client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAnswersResponse {
    pub score: i64,
    pub total: usize,
}

/// A submission joined with the restricted view of its author.
/// `user` is `None` when the user record no longer exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionView {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub user: Option<PublicUser>,
    pub answers: Vec<Option<i64>>,
    pub score: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
