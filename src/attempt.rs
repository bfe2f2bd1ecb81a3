// src/attempt.rs

//! Client-side attempt session: a timed, single-submission state machine.
//!
//! One session owns one quiz-taking episode, from quiz fetch to the
//! terminal submitted state. The countdown and the user's submit action
//! race against each other; whichever fires first delivers the answer
//! snapshot, and the other trigger becomes a no-op.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::quiz::AttemptQuiz;
use crate::models::submission::SubmitAnswersResponse;

/// Transport used to deliver the answer snapshot, typically an HTTP
/// client posting to the answer route.
#[async_trait]
pub trait SubmitAnswers: Send + Sync {
    async fn submit(
        &self,
        quiz_id: Uuid,
        answers: &[Option<i64>],
    ) -> Result<SubmitAnswersResponse, SubmitError>;
}

/// Failure to deliver or persist a submission.
/// The session stays open so the caller can retry.
#[derive(Debug)]
pub struct SubmitError(pub String);

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for SubmitError {}

/// Lifecycle of one attempt. `Submitted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Loading,
    InProgress,
    Submitted,
}

/// What a clock tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Countdown still running; carries the seconds left.
    Running(u32),
    /// Countdown hit zero: the caller must trigger the auto-submit.
    Expired,
    /// The session is not in progress; nothing to count down.
    Idle,
}

pub struct AttemptSession {
    quiz_id: Uuid,
    answers: Vec<Option<i64>>,
    remaining_seconds: u32,
    state: AttemptState,
}

impl AttemptSession {
    /// Creates a session awaiting its quiz definition.
    pub fn new(quiz_id: Uuid) -> Self {
        Self {
            quiz_id,
            answers: Vec::new(),
            remaining_seconds: 0,
            state: AttemptState::Loading,
        }
    }

    /// Installs the fetched quiz view: the answer vector resets to
    /// all-unanswered at the fetched question count and the countdown
    /// starts.
    ///
    /// The question count is snapshotted here; later edits to the quiz
    /// do not re-align this session.
    pub fn begin(&mut self, quiz: &AttemptQuiz, duration_seconds: u32) {
        if self.state != AttemptState::Loading {
            return;
        }
        self.answers = vec![None; quiz.questions.len()];
        self.remaining_seconds = duration_seconds;
        self.state = AttemptState::InProgress;
    }

    /// Records the selection for question `index`. Last write wins.
    ///
    /// The option value is not range-checked here; the server treats an
    /// out-of-range index as never correct. Selections outside the
    /// question count, or after submission, are dropped.
    pub fn select_answer(&mut self, index: usize, option: i64) {
        if self.state != AttemptState::InProgress {
            return;
        }
        if let Some(slot) = self.answers.get_mut(index) {
            *slot = Some(option);
        }
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> Tick {
        if self.state != AttemptState::InProgress {
            return Tick::Idle;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            Tick::Expired
        } else {
            Tick::Running(self.remaining_seconds)
        }
    }

    /// Delivers the current answer snapshot exactly once.
    ///
    /// Both submit triggers (manual action and countdown expiry) funnel
    /// through here. Returns `Ok(None)` when the session has already
    /// been submitted, so the losing trigger of the race is a no-op.
    /// On transport failure the session stays in progress and the caller
    /// may retry; the terminal state is only entered on confirmed
    /// persistence.
    pub async fn submit(
        &mut self,
        sink: &dyn SubmitAnswers,
    ) -> Result<Option<SubmitAnswersResponse>, SubmitError> {
        match self.state {
            AttemptState::Submitted => return Ok(None),
            AttemptState::Loading => {
                return Err(SubmitError("quiz not loaded yet".to_string()));
            }
            AttemptState::InProgress => {}
        }

        let outcome = sink.submit(self.quiz_id, &self.answers).await?;
        self.state = AttemptState::Submitted;
        Ok(Some(outcome))
    }

    pub fn quiz_id(&self) -> Uuid {
        self.quiz_id
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn answers(&self) -> &[Option<i64>] {
        &self.answers
    }
}

/// Drives the countdown for a session, auto-submitting when it expires.
///
/// Ticks once per `tick_period` (one second in production). Returns when
/// the session leaves `InProgress`: auto-submit confirmed, the session
/// was already submitted, or delivery failed (the error propagates and
/// the session remains open for a manual retry). Dropping the future
/// cancels the timer with it.
pub async fn run_countdown(
    session: &mut AttemptSession,
    sink: &dyn SubmitAnswers,
    tick_period: Duration,
) -> Result<Option<SubmitAnswersResponse>, SubmitError> {
    let mut interval = tokio::time::interval(tick_period);
    // The first interval tick completes immediately.
    interval.tick().await;

    loop {
        interval.tick().await;
        match session.tick() {
            Tick::Running(_) => {}
            Tick::Idle => return Ok(None),
            Tick::Expired => return session.submit(sink).await,
        }
    }
}
