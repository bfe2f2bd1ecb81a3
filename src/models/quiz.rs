// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// A single choice question embedded in a quiz.
///
/// Questions have no identity of their own. Their position in the quiz
/// is meaningful: it aligns a submission's answer vector with the
/// question list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// The prompt shown to the student.
    pub text: String,

    /// Ordered option list (e.g., ["Option A", "Option B"]).
    pub options: Vec<String>,

    /// Index into `options` marking the correct choice.
    pub correct_answer_index: usize,
}

impl Question {
    /// A question is well-formed when it has at least one option and the
    /// answer key points inside the option list.
    pub fn check(&self) -> Result<(), String> {
        if self.options.is_empty() {
            return Err("question must have at least one option".to_string());
        }
        if self.correct_answer_index >= self.options.len() {
            return Err(format!(
                "correct answer index {} is out of range for {} options",
                self.correct_answer_index,
                self.options.len()
            ));
        }
        Ok(())
    }
}

/// Validates every question in a batch.
/// Any malformed question rejects the whole batch, so callers can check
/// before writing anything.
pub fn validate_questions(questions: &[Question]) -> Result<(), AppError> {
    for (i, question) in questions.iter().enumerate() {
        question
            .check()
            .map_err(|msg| AppError::Validation(format!("Question {}: {}", i, msg)))?;
    }
    Ok(())
}

/// Represents the 'quizzes' table in the database.
/// Questions are embedded as a single JSON document, preserving order.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Quiz {
    pub id: Uuid,

    pub title: String,

    /// Identity of the admin who created the quiz.
    pub creator_id: Uuid,

    pub questions: Json<Vec<Question>>,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for a question as served to an attempt.
/// The answer key is omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptQuestion {
    pub text: String,
    pub options: Vec<String>,
}

/// DTO for taking a quiz. Carries no correct-answer data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptQuiz {
    pub id: Uuid,
    pub title: String,
    pub questions: Vec<AttemptQuestion>,
}

impl From<&Quiz> for AttemptQuiz {
    fn from(quiz: &Quiz) -> Self {
        AttemptQuiz {
            id: quiz.id,
            title: quiz.title.clone(),
            questions: quiz
                .questions
                .iter()
                .map(|q| AttemptQuestion {
                    text: q.text.clone(),
                    options: q.options.clone(),
                })
                .collect(),
        }
    }
}

/// Summary row for quiz listings. Includes no question content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSummary {
    pub id: Uuid,
    pub title: String,
    pub question_count: usize,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Quiz> for QuizSummary {
    fn from(quiz: &Quiz) -> Self {
        QuizSummary {
            id: quiz.id,
            title: quiz.title.clone(),
            question_count: quiz.questions.len(),
            created_at: quiz.created_at,
        }
    }
}

/// DTO for creating a new quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters."))]
    pub title: String,

    #[serde(default)]
    pub questions: Vec<Question>,
}

/// DTO for updating a quiz. Fields are optional; a provided question
/// list replaces the stored one wholesale.
#[derive(Debug, Deserialize)]
pub struct UpdateQuizRequest {
    pub title: Option<String>,
    pub questions: Option<Vec<Question>>,
}
