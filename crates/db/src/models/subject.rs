//! Subject models and DTOs.

use campus_core::search::Pagination;
use campus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `subjects` table.
///
/// `specialist_ids` and `prerequisite_ids` are BIGINT[] columns: both are
/// rewritten wholesale on save, so an array column keeps the single-row
/// write atomic without a join table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subject {
    pub id: DbId,
    pub name: String,
    pub code: String,
    pub slug: String,
    pub credits: i32,
    pub description: Option<String>,
    pub specialist_ids: Vec<DbId>,
    pub prerequisite_ids: Vec<DbId>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new subject.
///
/// `slug` is optional; when omitted it is derived from `name`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSubject {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "code must not be empty"))]
    pub code: String,
    #[validate(length(min = 1, message = "slug must not be empty"))]
    pub slug: Option<String>,
    #[validate(range(min = 1, message = "credits must be a positive number"))]
    pub credits: i32,
    pub description: Option<String>,
    #[serde(default)]
    pub specialist_ids: Vec<DbId>,
}

/// DTO for updating an existing subject. All fields are optional;
/// absent fields keep their current value. `specialist_ids` may be set
/// to an empty array to clear all assignments.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateSubject {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "code must not be empty"))]
    pub code: Option<String>,
    #[validate(length(min = 1, message = "slug must not be empty"))]
    pub slug: Option<String>,
    #[validate(range(min = 1, message = "credits must be a positive number"))]
    pub credits: Option<i32>,
    pub description: Option<String>,
    pub specialist_ids: Option<Vec<DbId>>,
}

/// Query parameters for the subject list endpoint.
///
/// Timestamps accept RFC 3339 strings. `created_at`/`updated_at` match
/// exactly; the `_from`/`_to` variants are inclusive range bounds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubjectListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub code: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub is_active: Option<bool>,
    pub specialist_id: Option<DbId>,
    pub created_at: Option<Timestamp>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
    pub updated_from: Option<Timestamp>,
    pub updated_to: Option<Timestamp>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Lightweight subject projection for autocomplete and related lookups.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubjectSuggestion {
    pub id: DbId,
    pub name: String,
    pub code: String,
    pub slug: String,
}

/// List response envelope: one page of subjects plus pagination metadata.
#[derive(Debug, Serialize)]
pub struct SubjectPage {
    pub subjects: Vec<Subject>,
    pub pagination: Pagination,
}

/// Deletion confirmation envelope.
#[derive(Debug, Serialize)]
pub struct DeletedSubject {
    pub id: DbId,
    pub deleted: bool,
}

/// Accept a boolean either as a JSON bool or as the strings
/// `"true"`/`"false"` (query strings always arrive as strings).
fn flexible_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        Str(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::Str(s)) => match s.as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!(
                "expected \"true\" or \"false\", got \"{other}\""
            ))),
        },
    }
}
