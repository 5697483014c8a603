pub mod repository;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Course, NewCourseRequest};

pub use repository::SqliteCourseStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("edit conflict")]
    EditConflict,

    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence for courses.
///
/// `update` is an optimistic write: it only succeeds when the stored
/// version still equals `course.version`, and on success writes the new
/// version back into `course`.
#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn insert(&self, req: NewCourseRequest) -> Result<Course, StoreError>;
    async fn get(&self, id: i64) -> Result<Course, StoreError>;
    async fn update(&self, course: &mut Course) -> Result<(), StoreError>;
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
    async fn ping(&self) -> Result<(), StoreError>;
}
