//! Specialist model.

use campus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `specialists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Specialist {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}
