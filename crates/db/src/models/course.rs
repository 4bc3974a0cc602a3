//! Course model and DTOs.
//!
//! Courses are a dependent collection: a course "uses" a subject, and a
//! subject cannot be deleted while any course references it. Course
//! administration itself is handled elsewhere; this service only needs
//! the reference count (and test fixtures need create/delete).

use campus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub title: String,
    pub subject_id: DbId,
    pub created_at: Timestamp,
}

/// DTO for creating a new course.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourse {
    pub title: String,
    pub subject_id: DbId,
}
