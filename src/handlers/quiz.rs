// src/handlers/quiz.rs

use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        quiz::{AttemptQuiz, QuizSummary},
        submission::{Submission, SubmissionView, SubmitAnswersRequest, SubmitAnswersResponse},
        user::PublicUser,
    },
    scoring::score_answers,
    store::{QuizStore, Stores, SubmissionStore, UserStore},
    utils::jwt::{Claims, can_view_submissions},
};

/// Lists every quiz as a browse summary.
/// Question content and answer keys are not included.
pub async fn list_quizzes(State(stores): State<Stores>) -> Result<impl IntoResponse, AppError> {
    let quizzes = stores.quizzes.list().await?;
    let summaries: Vec<QuizSummary> = quizzes.iter().map(QuizSummary::from).collect();

    Ok(Json(summaries))
}

/// Retrieves a single quiz for taking.
///
/// The response is the attempt view: question text and options only.
/// The answer key never leaves the server on this route.
pub async fn get_quiz(
    State(stores): State<Stores>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = stores
        .quizzes
        .get(id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(AttemptQuiz::from(&quiz)))
}

/// Scores a submitted answer set and records the result.
///
/// Scoring is strict positional equality against the stored answer key:
/// unanswered positions never match, positions beyond the question count
/// are ignored, and out-of-range option indices are simply wrong rather
/// than an error. Every call inserts an independent submission; retaking
/// a quiz creates a new record instead of updating the previous one.
pub async fn submit_answers(
    State(stores): State<Stores>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitAnswersRequest>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = stores
        .quizzes
        .get(id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    let user_id = claims.user_id()?;
    let score = score_answers(&quiz.questions, &req.answers);

    let submission = Submission {
        id: Uuid::new_v4(),
        quiz_id: quiz.id,
        user_id,
        answers: sqlx::types::Json(req.answers),
        score,
        created_at: Utc::now(),
    };
    stores.submissions.insert(submission).await?;

    tracing::info!("Scored submission for quiz {}: {}/{}", quiz.id, score, quiz.questions.len());

    Ok((
        StatusCode::CREATED,
        Json(SubmitAnswersResponse {
            score,
            total: quiz.questions.len(),
        }),
    ))
}

/// Lists all submissions for a quiz, newest first, each joined with the
/// restricted view of its author (display name and email only).
///
/// Restricted to the quiz creator and admins.
pub async fn list_submissions(
    State(stores): State<Stores>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = stores
        .quizzes
        .get(id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    if !can_view_submissions(&claims, quiz.creator_id)? {
        return Err(AppError::Forbidden(
            "Only the quiz creator or an admin may view submissions".to_string(),
        ));
    }

    let submissions = stores.submissions.list_for_quiz(quiz.id).await?;

    let mut user_ids: Vec<Uuid> = submissions.iter().map(|s| s.user_id).collect();
    user_ids.sort_unstable();
    user_ids.dedup();

    let users = stores.users.get_many(&user_ids).await?;
    let users_by_id: HashMap<Uuid, PublicUser> =
        users.iter().map(|u| (u.id, PublicUser::from(u))).collect();

    let views: Vec<SubmissionView> = submissions
        .into_iter()
        .map(|s| {
            let user = users_by_id.get(&s.user_id).cloned();
            SubmissionView {
                id: s.id,
                quiz_id: s.quiz_id,
                user,
                answers: s.answers.0,
                score: s.score,
                created_at: s.created_at,
            }
        })
        .collect();

    Ok(Json(views))
}
