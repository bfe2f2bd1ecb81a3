// src/scoring.rs

//! Scores a submitted answer vector against a quiz's answer key.

use crate::models::quiz::Question;

/// Counts the positions where the submitted answer equals the question's
/// correct option index.
///
/// Robustness rules:
/// * Positions beyond the question count are ignored.
/// * Missing or `None` positions are unanswered and never match.
/// * Out-of-range or negative option indices never match; they are not
///   an error, so a stale client cannot fail a submission.
pub fn score_answers(questions: &[Question], answers: &[Option<i64>]) -> i64 {
    questions
        .iter()
        .enumerate()
        .filter(|(i, question)| {
            answers.get(*i).copied().flatten() == Some(question.correct_answer_index as i64)
        })
        .count() as i64
}
