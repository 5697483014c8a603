use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use super::{CourseStore, StoreError};
use crate::models::{Course, NewCourseRequest};

pub struct SqliteCourseStore {
    db: SqlitePool,
    timeout: Duration,
}

impl SqliteCourseStore {
    pub fn new(db: SqlitePool, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(res) => res.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout(self.timeout)),
        }
    }
}

#[async_trait]
impl CourseStore for SqliteCourseStore {
    async fn insert(&self, req: NewCourseRequest) -> Result<Course, StoreError> {
        let course = self
            .bounded(
                sqlx::query_as::<_, Course>(
                    r#"
                    INSERT INTO courses (code, title, credit)
                    VALUES (?1, ?2, ?3)
                    RETURNING id, code, title, credit, created_at, version
                    "#,
                )
                .bind(&req.code)
                .bind(&req.title)
                .bind(&req.credit)
                .fetch_one(&self.db),
            )
            .await?;

        debug!("inserted course {}", course.id);
        Ok(course)
    }

    async fn get(&self, id: i64) -> Result<Course, StoreError> {
        if id < 1 {
            return Err(StoreError::NotFound);
        }

        self.bounded(
            sqlx::query_as::<_, Course>(
                "SELECT id, code, title, credit, created_at, version FROM courses WHERE id = ?1",
            )
            .bind(id)
            .fetch_optional(&self.db),
        )
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn update(&self, course: &mut Course) -> Result<(), StoreError> {
        let version = self
            .bounded(
                sqlx::query_scalar::<_, i64>(
                    r#"
                    UPDATE courses
                    SET code = ?1,
                        title = ?2,
                        credit = ?3,
                        version = version + 1
                    WHERE id = ?4 AND version = ?5
                    RETURNING version
                    "#,
                )
                .bind(&course.code)
                .bind(&course.title)
                .bind(&course.credit)
                .bind(course.id)
                .bind(course.version)
                .fetch_optional(&self.db),
            )
            .await?;

        match version {
            Some(v) => {
                debug!("course {} advanced to version {}", course.id, v);
                course.version = v;
                Ok(())
            }
            None => Err(StoreError::EditConflict),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        if id < 1 {
            return Err(StoreError::NotFound);
        }

        let affected = self
            .bounded(
                sqlx::query("DELETE FROM courses WHERE id = ?1")
                    .bind(id)
                    .execute(&self.db),
            )
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.bounded(sqlx::query("select 1").execute(&self.db))
            .await?;
        Ok(())
    }
}
