// tests/common/mod.rs

use std::sync::Arc;

use chrono::Utc;
use sqlx::types::Json;
use uuid::Uuid;

use elearn_backend::{
    config::Config,
    models::{
        quiz::{Question, Quiz},
        user::{Role, User},
    },
    routes,
    state::AppState,
    store::{
        QuizStore, Stores, UserStore,
        memory::{MemoryQuizStore, MemorySubmissionStore, MemoryUserStore},
    },
    utils::jwt::sign_jwt,
};

pub const JWT_SECRET: &str = "test_secret_for_integration_tests";

/// Helper function to spawn the app on a random port for testing,
/// backed by in-memory stores so no external services are required.
/// Returns the base URL and the store handles for seeding and
/// inspection.
pub async fn spawn_app() -> (String, Stores) {
    let stores = Stores {
        quizzes: Arc::new(MemoryQuizStore::default()),
        submissions: Arc::new(MemorySubmissionStore::default()),
        users: Arc::new(MemoryUserStore::default()),
    };

    let config = Config {
        database_url: String::new(),
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        admin_name: None,
        admin_email: None,
        admin_password: None,
    };

    let state = AppState {
        stores: stores.clone(),
        config,
    };

    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, stores)
}

pub async fn seed_user(stores: &Stores, name: &str, role: Role) -> User {
    let user = User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@example.com", name),
        password: "argon2-hash-placeholder".to_string(),
        role,
        created_at: Utc::now(),
    };
    stores
        .users
        .insert(user.clone())
        .await
        .expect("Failed to seed user");
    user
}

pub fn token_for(user: &User) -> String {
    sign_jwt(user.id, user.role, JWT_SECRET, 600).expect("Failed to sign test token")
}

/// Seeds the three-question quiz used across tests.
/// Correct option indices: [1, 0, 2].
pub async fn seed_quiz(stores: &Stores, creator_id: Uuid) -> Quiz {
    let questions = vec![
        Question {
            text: "What is 2 + 2?".to_string(),
            options: vec!["3".to_string(), "4".to_string(), "5".to_string()],
            correct_answer_index: 1,
        },
        Question {
            text: "Which planet is closest to the sun?".to_string(),
            options: vec!["Mercury".to_string(), "Venus".to_string(), "Mars".to_string()],
            correct_answer_index: 0,
        },
        Question {
            text: "What is the capital of France?".to_string(),
            options: vec!["Berlin".to_string(), "Madrid".to_string(), "Paris".to_string()],
            correct_answer_index: 2,
        },
    ];

    let quiz = Quiz {
        id: Uuid::new_v4(),
        title: "General Knowledge".to_string(),
        creator_id,
        questions: Json(questions),
        created_at: Utc::now(),
    };
    stores
        .quizzes
        .insert(quiz.clone())
        .await
        .expect("Failed to seed quiz");
    quiz
}
