//! Repository for the `specialists` table.

use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::specialist::Specialist;

const COLUMNS: &str = "id, name, created_at";

/// Provides CRUD operations for specialists.
pub struct SpecialistRepo;

impl SpecialistRepo {
    /// Insert a new specialist, returning the created row.
    pub async fn create(pool: &PgPool, name: &str) -> Result<Specialist, sqlx::Error> {
        let query = format!("INSERT INTO specialists (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Specialist>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// Find a specialist by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Specialist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM specialists WHERE id = $1");
        sqlx::query_as::<_, Specialist>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
