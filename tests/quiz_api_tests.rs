// tests/quiz_api_tests.rs

mod common;

use common::{seed_quiz, seed_user, spawn_app, token_for};
use elearn_backend::models::user::Role;
use elearn_backend::store::{QuizStore, SubmissionStore};
use serde_json::json;

#[tokio::test]
async fn unknown_route_404() {
    // Arrange
    let (address, _stores) = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn attempt_view_hides_answer_key() {
    // Arrange
    let (address, stores) = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = seed_user(&stores, "admin", Role::Admin).await;
    let quiz = seed_quiz(&stores, admin.id).await;

    // Act
    let response = client
        .get(format!("{}/api/quizzes/{}", address, quiz.id))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.unwrap();
    assert!(
        !body.contains("correct_answer_index"),
        "Attempt view must not leak the answer key: {}",
        body
    );

    let view: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(view["title"], "General Knowledge");
    assert_eq!(view["questions"].as_array().unwrap().len(), 3);
    assert_eq!(view["questions"][0]["options"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn fetching_a_missing_quiz_returns_404() {
    // Arrange
    let (address, _stores) = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(format!("{}/api/quizzes/{}", address, uuid::Uuid::new_v4()))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn submitting_requires_authentication() {
    // Arrange
    let (address, stores) = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = seed_user(&stores, "admin", Role::Admin).await;
    let quiz = seed_quiz(&stores, admin.id).await;

    // Act
    let response = client
        .post(format!("{}/api/quizzes/{}/answer", address, quiz.id))
        .json(&json!({ "answers": [1, 1, 2] }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn submitting_scores_against_the_answer_key() {
    // Arrange
    let (address, stores) = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = seed_user(&stores, "admin", Role::Admin).await;
    let student = seed_user(&stores, "student", Role::Student).await;
    let quiz = seed_quiz(&stores, admin.id).await;

    // Act: two of three positions match the key [1, 0, 2]
    let response = client
        .post(format!("{}/api/quizzes/{}/answer", address, quiz.id))
        .bearer_auth(token_for(&student))
        .json(&json!({ "answers": [1, 1, 2] }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 201);
    let result: serde_json::Value = response.json().await.unwrap();
    assert_eq!(result["score"], 2);
    assert_eq!(result["total"], 3);

    // Act: an all-unanswered sheet scores zero
    let response = client
        .post(format!("{}/api/quizzes/{}/answer", address, quiz.id))
        .bearer_auth(token_for(&student))
        .json(&json!({ "answers": [null, null, null] }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    let result: serde_json::Value = response.json().await.unwrap();
    assert_eq!(result["score"], 0);
}

#[tokio::test]
async fn submitting_twice_creates_two_independent_records() {
    // Arrange
    let (address, stores) = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = seed_user(&stores, "admin", Role::Admin).await;
    let student = seed_user(&stores, "student", Role::Student).await;
    let quiz = seed_quiz(&stores, admin.id).await;
    let token = token_for(&student);

    // Act
    for answers in [json!([1, 0, 2]), json!([1, 1, 2])] {
        let response = client
            .post(format!("{}/api/quizzes/{}/answer", address, quiz.id))
            .bearer_auth(&token)
            .json(&json!({ "answers": answers }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 201);
    }

    // Assert: no upsert happened, newest first
    let stored = stores.submissions.list_for_quiz(quiz.id).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].score, 2);
    assert_eq!(stored[1].score, 3);
}

#[tokio::test]
async fn stale_answer_vectors_are_tolerated() {
    // Arrange
    let (address, stores) = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = seed_user(&stores, "admin", Role::Admin).await;
    let student = seed_user(&stores, "student", Role::Student).await;
    let quiz = seed_quiz(&stores, admin.id).await;
    let token = token_for(&student);

    // Act: out-of-range indices, a negative index, and extra positions
    let response = client
        .post(format!("{}/api/quizzes/{}/answer", address, quiz.id))
        .bearer_auth(&token)
        .json(&json!({ "answers": [9, -1, 2, 1, 0] }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert: never an error, only the in-range match counts
    assert_eq!(response.status().as_u16(), 201);
    let result: serde_json::Value = response.json().await.unwrap();
    assert_eq!(result["score"], 1);
    assert_eq!(result["total"], 3);

    // Act: a vector shorter than the question count
    let response = client
        .post(format!("{}/api/quizzes/{}/answer", address, quiz.id))
        .bearer_auth(&token)
        .json(&json!({ "answers": [1] }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert: missing tail positions are unanswered
    let result: serde_json::Value = response.json().await.unwrap();
    assert_eq!(result["score"], 1);
}

#[tokio::test]
async fn submissions_listing_is_forbidden_for_non_owners() {
    // Arrange
    let (address, stores) = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = seed_user(&stores, "admin", Role::Admin).await;
    let student = seed_user(&stores, "student", Role::Student).await;
    let quiz = seed_quiz(&stores, admin.id).await;

    // Act: a student who does not own the quiz
    let response = client
        .get(format!("{}/api/quizzes/{}/answers", address, quiz.id))
        .bearer_auth(token_for(&student))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn submissions_listing_joins_restricted_user_view() {
    // Arrange
    let (address, stores) = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = seed_user(&stores, "admin", Role::Admin).await;
    let student = seed_user(&stores, "student", Role::Student).await;
    let quiz = seed_quiz(&stores, admin.id).await;

    client
        .post(format!("{}/api/quizzes/{}/answer", address, quiz.id))
        .bearer_auth(token_for(&student))
        .json(&json!({ "answers": [1, 0, 2] }))
        .send()
        .await
        .expect("Failed to execute request");

    // Act
    let response = client
        .get(format!("{}/api/quizzes/{}/answers", address, quiz.id))
        .bearer_auth(token_for(&admin))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.unwrap();
    assert!(
        !body.contains("password"),
        "Submission listing must not leak sensitive user fields: {}",
        body
    );

    let listing: serde_json::Value = serde_json::from_str(&body).unwrap();
    let entries = listing.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["score"], 3);
    assert_eq!(entries[0]["user"]["name"], "student");
    assert_eq!(entries[0]["user"]["email"], "student@example.com");
}

#[tokio::test]
async fn quiz_creator_can_view_own_submissions() {
    // Arrange: the quiz belongs to a non-admin creator
    let (address, stores) = spawn_app().await;
    let client = reqwest::Client::new();
    let creator = seed_user(&stores, "creator", Role::Student).await;
    let quiz = seed_quiz(&stores, creator.id).await;

    // Act
    let response = client
        .get(format!("{}/api/quizzes/{}/answers", address, quiz.id))
        .bearer_auth(token_for(&creator))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn creating_a_quiz_requires_the_admin_role() {
    // Arrange
    let (address, stores) = spawn_app().await;
    let client = reqwest::Client::new();
    let student = seed_user(&stores, "student", Role::Student).await;

    // Act
    let response = client
        .post(format!("{}/api/quizzes", address))
        .bearer_auth(token_for(&student))
        .json(&json!({ "title": "Not allowed", "questions": [] }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn creating_a_quiz_rejects_a_bad_answer_key() {
    // Arrange
    let (address, stores) = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = seed_user(&stores, "admin", Role::Admin).await;

    // Act: correct_answer_index points outside the option list
    let response = client
        .post(format!("{}/api/quizzes", address))
        .bearer_auth(token_for(&admin))
        .json(&json!({
            "title": "Broken quiz",
            "questions": [
                { "text": "Pick one", "options": ["A", "B", "C"], "correct_answer_index": 3 }
            ]
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 400);
    assert!(stores.quizzes.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn creating_a_quiz_persists_it() {
    // Arrange
    let (address, stores) = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = seed_user(&stores, "admin", Role::Admin).await;

    // Act
    let response = client
        .post(format!("{}/api/quizzes", address))
        .bearer_auth(token_for(&admin))
        .json(&json!({
            "title": "Fractions",
            "questions": [
                { "text": "1/2 + 1/2?", "options": ["1", "2"], "correct_answer_index": 0 }
            ]
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 201);
    let created: serde_json::Value = response.json().await.unwrap();
    assert_eq!(created["creator_id"], admin.id.to_string());

    let listed = stores.quizzes.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Fractions");
}

#[tokio::test]
async fn updating_questions_is_validated_atomically() {
    // Arrange
    let (address, stores) = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = seed_user(&stores, "admin", Role::Admin).await;
    let quiz = seed_quiz(&stores, admin.id).await;

    // Act: one well-formed question followed by one with an empty
    // option list; the whole batch must be rejected
    let response = client
        .put(format!("{}/api/quizzes/{}", address, quiz.id))
        .bearer_auth(token_for(&admin))
        .json(&json!({
            "questions": [
                { "text": "Fine", "options": ["A", "B"], "correct_answer_index": 1 },
                { "text": "Broken", "options": [], "correct_answer_index": 0 }
            ]
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert: nothing was written
    assert_eq!(response.status().as_u16(), 400);
    let stored = stores.quizzes.get(quiz.id).await.unwrap().unwrap();
    assert_eq!(stored.questions.len(), 3);
    assert_eq!(stored.questions[0].text, "What is 2 + 2?");
}

#[tokio::test]
async fn creator_can_update_their_own_quiz() {
    // Arrange
    let (address, stores) = spawn_app().await;
    let client = reqwest::Client::new();
    let creator = seed_user(&stores, "creator", Role::Student).await;
    let quiz = seed_quiz(&stores, creator.id).await;

    // Act
    let response = client
        .put(format!("{}/api/quizzes/{}", address, quiz.id))
        .bearer_auth(token_for(&creator))
        .json(&json!({ "title": "Renamed" }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let stored = stores.quizzes.get(quiz.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Renamed");
}

#[tokio::test]
async fn removing_a_question_shifts_following_indices() {
    // Arrange
    let (address, stores) = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = seed_user(&stores, "admin", Role::Admin).await;
    let quiz = seed_quiz(&stores, admin.id).await;

    // Act
    let response = client
        .delete(format!("{}/api/quizzes/{}/questions/1", address, quiz.id))
        .bearer_auth(token_for(&admin))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert: question 0 is untouched, former question 2 is now at index 1
    assert_eq!(response.status().as_u16(), 200);
    let view: serde_json::Value = client
        .get(format!("{}/api/quizzes/{}", address, quiz.id))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();

    let questions = view["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0]["text"], "What is 2 + 2?");
    assert_eq!(questions[1]["text"], "What is the capital of France?");
}

#[tokio::test]
async fn removing_a_question_rejects_an_out_of_range_index() {
    // Arrange
    let (address, stores) = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = seed_user(&stores, "admin", Role::Admin).await;
    let quiz = seed_quiz(&stores, admin.id).await;

    // Act
    let response = client
        .delete(format!("{}/api/quizzes/{}/questions/5", address, quiz.id))
        .bearer_auth(token_for(&admin))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 400);
    let stored = stores.quizzes.get(quiz.id).await.unwrap().unwrap();
    assert_eq!(stored.questions.len(), 3);
}

#[tokio::test]
async fn adding_a_question_appends_it() {
    // Arrange
    let (address, stores) = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = seed_user(&stores, "admin", Role::Admin).await;
    let quiz = seed_quiz(&stores, admin.id).await;

    // Act
    let response = client
        .post(format!("{}/api/quizzes/{}/questions", address, quiz.id))
        .bearer_auth(token_for(&admin))
        .json(&json!({
            "text": "How many sides has a hexagon?",
            "options": ["5", "6", "7"],
            "correct_answer_index": 1
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let stored = stores.quizzes.get(quiz.id).await.unwrap().unwrap();
    assert_eq!(stored.questions.len(), 4);
    assert_eq!(stored.questions[3].correct_answer_index, 1);
}

#[tokio::test]
async fn deleting_a_quiz_makes_it_unfetchable() {
    // Arrange
    let (address, stores) = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = seed_user(&stores, "admin", Role::Admin).await;
    let quiz = seed_quiz(&stores, admin.id).await;

    // Act
    let response = client
        .delete(format!("{}/api/quizzes/{}", address, quiz.id))
        .bearer_auth(token_for(&admin))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 204);
    let fetch = client
        .get(format!("{}/api/quizzes/{}", address, quiz.id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(fetch.status().as_u16(), 404);
}

#[tokio::test]
async fn admin_dashboard_lists_submission_counts() {
    // Arrange
    let (address, stores) = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = seed_user(&stores, "admin", Role::Admin).await;
    let student = seed_user(&stores, "student", Role::Student).await;
    let quiz = seed_quiz(&stores, admin.id).await;

    for _ in 0..2 {
        client
            .post(format!("{}/api/quizzes/{}/answer", address, quiz.id))
            .bearer_auth(token_for(&student))
            .json(&json!({ "answers": [1, 0, 2] }))
            .send()
            .await
            .expect("Failed to execute request");
    }

    // Act
    let response = client
        .get(format!("{}/api/admin/quizzes", address))
        .bearer_auth(token_for(&admin))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let rows: serde_json::Value = response.json().await.unwrap();
    assert_eq!(rows[0]["submissions_count"], 2);
    assert_eq!(rows[0]["question_count"], 3);

    // The dashboard is admin-only
    let forbidden = client
        .get(format!("{}/api/admin/quizzes", address))
        .bearer_auth(token_for(&student))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(forbidden.status().as_u16(), 403);
}

#[tokio::test]
async fn listing_quizzes_returns_summaries_without_questions() {
    // Arrange
    let (address, stores) = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = seed_user(&stores, "admin", Role::Admin).await;
    seed_quiz(&stores, admin.id).await;

    // Act
    let response = client
        .get(format!("{}/api/quizzes", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.unwrap();
    assert!(!body.contains("correct_answer_index"));

    let summaries: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(summaries.as_array().unwrap().len(), 1);
    assert_eq!(summaries[0]["question_count"], 3);
}
