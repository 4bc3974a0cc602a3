//! Repository for the `courses` table.

use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::course::{Course, CreateCourse};

const COLUMNS: &str = "id, title, subject_id, created_at";

/// Provides the course queries the subject directory needs.
pub struct CourseRepo;

impl CourseRepo {
    /// Insert a new course, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCourse) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses (title, subject_id) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(&input.title)
            .bind(input.subject_id)
            .fetch_one(pool)
            .await
    }

    /// Count courses referencing a subject (the delete gate).
    pub async fn count_by_subject(pool: &PgPool, subject_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM courses WHERE subject_id = $1",
        )
        .bind(subject_id)
        .fetch_one(pool)
        .await
    }

    /// Delete a course by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
