#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use course_api::api::router;
use course_api::db::SqliteCourseStore;
use course_api::state::AppState;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

pub async fn test_pool() -> SqlitePool {
    // One long-lived connection so every query sees the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub async fn test_store() -> SqliteCourseStore {
    SqliteCourseStore::new(test_pool().await, Duration::from_secs(3))
}

pub async fn test_app() -> axum::Router {
    let state = AppState {
        store: Arc::new(test_store().await),
        environment: "testing".to_string(),
    };
    router(state)
}
