// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use elearn_backend::config::Config;
use elearn_backend::error::AppError;
use elearn_backend::models::user::{Role, User};
use elearn_backend::routes;
use elearn_backend::state::AppState;
use elearn_backend::store::{
    Stores, UserStore,
    postgres::{PgQuizStore, PgSubmissionStore, PgUserStore},
};
use elearn_backend::utils::hash::hash_password;

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Initialize Database Pool with Retry
    let mut retry_count = 0;
    let pool = loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    panic!("Failed to connect to database after 5 retries: {}", e);
                }
                tracing::warn!(
                    "Database not ready, retrying in 2s... (Attempt {})",
                    retry_count
                );
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations applied successfully.");

    let stores = Stores {
        quizzes: Arc::new(PgQuizStore::new(pool.clone())),
        submissions: Arc::new(PgSubmissionStore::new(pool.clone())),
        users: Arc::new(PgUserStore::new(pool)),
    };

    // Seed Admin User
    if let Err(e) = seed_admin_user(&stores, &config).await {
        tracing::error!("Failed to seed admin user: {:?}", e);
    }

    // Create AppState
    let state = AppState {
        stores,
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Start the server
    axum::serve(listener, app).await.unwrap();
}

async fn seed_admin_user(stores: &Stores, config: &Config) -> Result<(), AppError> {
    if let (Some(name), Some(email), Some(password)) = (
        &config.admin_name,
        &config.admin_email,
        &config.admin_password,
    ) {
        if stores.users.get_by_email(email).await?.is_none() {
            tracing::info!("Seeding admin user: {}", email);
            let user = User {
                id: Uuid::new_v4(),
                name: name.clone(),
                email: email.clone(),
                password: hash_password(password)?,
                role: Role::Admin,
                created_at: Utc::now(),
            };
            stores.users.insert(user).await?;
            tracing::info!("Admin user created successfully.");
        }
    }
    Ok(())
}
