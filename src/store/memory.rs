// src/store/memory.rs

//! In-memory store implementations.
//!
//! Same contracts as the Postgres stores with no external services,
//! used by the integration tests to exercise the full router.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use super::{QuizStore, StoreError, SubmissionStore, UserStore};
use crate::models::{quiz::Quiz, submission::Submission, user::User};

fn poisoned() -> StoreError {
    StoreError("store lock poisoned".to_string())
}

#[derive(Default)]
pub struct MemoryQuizStore {
    quizzes: RwLock<HashMap<Uuid, Quiz>>,
}

#[async_trait]
impl QuizStore for MemoryQuizStore {
    async fn insert(&self, quiz: Quiz) -> Result<(), StoreError> {
        let mut quizzes = self.quizzes.write().map_err(|_| poisoned())?;
        quizzes.insert(quiz.id, quiz);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Quiz>, StoreError> {
        let quizzes = self.quizzes.read().map_err(|_| poisoned())?;
        Ok(quizzes.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Quiz>, StoreError> {
        let quizzes = self.quizzes.read().map_err(|_| poisoned())?;
        let mut all: Vec<Quiz> = quizzes.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn replace(&self, quiz: &Quiz) -> Result<bool, StoreError> {
        let mut quizzes = self.quizzes.write().map_err(|_| poisoned())?;
        match quizzes.get_mut(&quiz.id) {
            Some(stored) => {
                *stored = quiz.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut quizzes = self.quizzes.write().map_err(|_| poisoned())?;
        Ok(quizzes.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct MemorySubmissionStore {
    submissions: RwLock<Vec<Submission>>,
}

#[async_trait]
impl SubmissionStore for MemorySubmissionStore {
    async fn insert(&self, submission: Submission) -> Result<(), StoreError> {
        let mut submissions = self.submissions.write().map_err(|_| poisoned())?;
        submissions.push(submission);
        Ok(())
    }

    async fn list_for_quiz(&self, quiz_id: Uuid) -> Result<Vec<Submission>, StoreError> {
        let submissions = self.submissions.read().map_err(|_| poisoned())?;
        // Insertion order is chronological; reverse for newest first.
        Ok(submissions
            .iter()
            .rev()
            .filter(|s| s.quiz_id == quiz_id)
            .cloned()
            .collect())
    }

    async fn count_for_quiz(&self, quiz_id: Uuid) -> Result<i64, StoreError> {
        let submissions = self.submissions.read().map_err(|_| poisoned())?;
        Ok(submissions.iter().filter(|s| s.quiz_id == quiz_id).count() as i64)
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: User) -> Result<(), StoreError> {
        let mut users = self.users.write().map_err(|_| poisoned())?;
        users.insert(user.id, user);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }
}
