// src/handlers/admin.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::Serialize;
use sqlx::types::Json as JsonField;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::quiz::{
        CreateQuizRequest, Question, Quiz, QuizSummary, UpdateQuizRequest, validate_questions,
    },
    store::{QuizStore, Stores, SubmissionStore},
    utils::jwt::{Claims, can_manage_quiz, require_admin},
};

/// Creates a new quiz owned by the caller.
/// Admin only. Every question is validated before the write.
pub async fn create_quiz(
    State(stores): State<Stores>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&claims)?;

    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::Validation(validation_errors.to_string()));
    }
    validate_questions(&payload.questions)?;

    let quiz = Quiz {
        id: Uuid::new_v4(),
        title: payload.title,
        creator_id: claims.user_id()?,
        questions: JsonField(payload.questions),
        created_at: Utc::now(),
    };
    stores.quizzes.insert(quiz.clone()).await?;

    tracing::info!("Created quiz {} ({})", quiz.id, quiz.title);

    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Updates a quiz's title and/or replaces its question list.
/// Admin or quiz creator.
///
/// A replacement question list is validated as a whole before the write;
/// one malformed question rejects the request and changes nothing.
pub async fn update_quiz(
    State(stores): State<Stores>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut quiz = stores
        .quizzes
        .get(id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    if !can_manage_quiz(&claims, quiz.creator_id)? {
        return Err(AppError::Forbidden(
            "Only the quiz creator or an admin may modify this quiz".to_string(),
        ));
    }

    if let Some(title) = payload.title {
        if title.is_empty() {
            return Err(AppError::Validation("Title must not be empty".to_string()));
        }
        quiz.title = title;
    }

    if let Some(questions) = payload.questions {
        validate_questions(&questions)?;
        quiz.questions = JsonField(questions);
    }

    if !stores.quizzes.replace(&quiz).await? {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    Ok(Json(quiz))
}

/// Deletes a quiz.
/// Admin or quiz creator. Existing submissions are kept.
pub async fn delete_quiz(
    State(stores): State<Stores>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = stores
        .quizzes
        .get(id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    if !can_manage_quiz(&claims, quiz.creator_id)? {
        return Err(AppError::Forbidden(
            "Only the quiz creator or an admin may delete this quiz".to_string(),
        ));
    }

    if !stores.quizzes.delete(quiz.id).await? {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    tracing::info!("Deleted quiz {}", quiz.id);

    Ok(StatusCode::NO_CONTENT)
}

/// Appends a question to a quiz.
/// Admin or quiz creator. The question is validated first.
pub async fn add_question(
    State(stores): State<Stores>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<Question>,
) -> Result<impl IntoResponse, AppError> {
    let mut quiz = stores
        .quizzes
        .get(id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    if !can_manage_quiz(&claims, quiz.creator_id)? {
        return Err(AppError::Forbidden(
            "Only the quiz creator or an admin may modify this quiz".to_string(),
        ));
    }

    payload.check().map_err(AppError::Validation)?;

    quiz.questions.push(payload);

    if !stores.quizzes.replace(&quiz).await? {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    Ok(Json(quiz))
}

/// Removes the question at `index`, shifting later questions down by one.
/// Admin or quiz creator.
///
/// Attempts already in flight keep their original answer alignment; a
/// submission made against the old shape still scores, position by
/// position, against the edited question list.
pub async fn remove_question(
    State(stores): State<Stores>,
    Extension(claims): Extension<Claims>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<impl IntoResponse, AppError> {
    let mut quiz = stores
        .quizzes
        .get(id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    if !can_manage_quiz(&claims, quiz.creator_id)? {
        return Err(AppError::Forbidden(
            "Only the quiz creator or an admin may modify this quiz".to_string(),
        ));
    }

    if index >= quiz.questions.len() {
        return Err(AppError::Validation(format!(
            "Question index {} is out of range for {} questions",
            index,
            quiz.questions.len()
        )));
    }

    quiz.questions.remove(index);

    if !stores.quizzes.replace(&quiz).await? {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    Ok(Json(quiz))
}

/// Dashboard row: quiz summary plus its submission count.
#[derive(Debug, Serialize)]
pub struct QuizWithSubmissionCount {
    #[serde(flatten)]
    pub summary: QuizSummary,
    pub submissions_count: i64,
}

/// Lists every quiz with its submission count for the admin dashboard.
/// Admin only (enforced by the route middleware).
pub async fn list_quizzes_with_counts(
    State(stores): State<Stores>,
) -> Result<impl IntoResponse, AppError> {
    let quizzes = stores.quizzes.list().await?;

    let mut rows = Vec::with_capacity(quizzes.len());
    for quiz in &quizzes {
        let submissions_count = stores.submissions.count_for_quiz(quiz.id).await?;
        rows.push(QuizWithSubmissionCount {
            summary: QuizSummary::from(quiz),
            submissions_count,
        });
    }

    Ok(Json(rows))
}
