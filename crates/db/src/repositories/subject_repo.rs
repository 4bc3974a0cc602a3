//! Repository for the `subjects` table.

use campus_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::subject::{
    CreateSubject, Subject, SubjectListQuery, SubjectSuggestion, UpdateSubject,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, name, code, slug, credits, description, \
    specialist_ids, prerequisite_ids, is_active, created_at, updated_at";

/// Full-text search expression over the indexed subject fields.
///
/// Must stay in sync with the GIN index in
/// `20260301000003_create_subjects_table.sql`.
const SEARCH_VECTOR: &str =
    "to_tsvector('english', name || ' ' || code || ' ' || coalesce(description, ''))";

/// Provides CRUD and query operations for subjects.
pub struct SubjectRepo;

impl SubjectRepo {
    /// Insert a new subject, returning the created row.
    ///
    /// The caller resolves the slug (explicit or derived) before insert.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSubject,
        slug: &str,
    ) -> Result<Subject, sqlx::Error> {
        let query = format!(
            "INSERT INTO subjects (name, code, slug, credits, description, specialist_ids)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subject>(&query)
            .bind(&input.name)
            .bind(&input.code)
            .bind(slug)
            .bind(input.credits)
            .bind(&input.description)
            .bind(&input.specialist_ids)
            .fetch_one(pool)
            .await
    }

    /// Find a subject by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Subject>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subjects WHERE id = $1");
        sqlx::query_as::<_, Subject>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a subject by its slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Subject>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subjects WHERE slug = $1");
        sqlx::query_as::<_, Subject>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Check whether another subject already uses `value` in `column`.
    ///
    /// `exclude` skips the subject being updated so it does not conflict
    /// with itself. `column` is one of the fixed identifiers passed by
    /// the wrappers below, never user input.
    async fn value_taken(
        pool: &PgPool,
        column: &'static str,
        value: &str,
        exclude: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let query = match exclude {
            Some(_) => format!("SELECT EXISTS(SELECT 1 FROM subjects WHERE {column} = $1 AND id <> $2)"),
            None => format!("SELECT EXISTS(SELECT 1 FROM subjects WHERE {column} = $1)"),
        };
        let q = sqlx::query_scalar::<_, bool>(&query).bind(value);
        match exclude {
            Some(id) => q.bind(id).fetch_one(pool).await,
            None => q.fetch_one(pool).await,
        }
    }

    /// Whether a subject other than `exclude` already has this name.
    pub async fn name_taken(
        pool: &PgPool,
        name: &str,
        exclude: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        Self::value_taken(pool, "name", name, exclude).await
    }

    /// Whether a subject other than `exclude` already has this code.
    pub async fn code_taken(
        pool: &PgPool,
        code: &str,
        exclude: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        Self::value_taken(pool, "code", code, exclude).await
    }

    /// Whether a subject other than `exclude` already has this slug.
    pub async fn slug_taken(
        pool: &PgPool,
        slug: &str,
        exclude: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        Self::value_taken(pool, "slug", slug, exclude).await
    }

    /// List subjects matching the filter, with pagination and sorting.
    ///
    /// `sort_column`/`sort_direction` must come from
    /// [`campus_core::search::resolve_sort`] (whitelisted identifiers).
    pub async fn list(
        pool: &PgPool,
        params: &SubjectListQuery,
        sort_column: &str,
        sort_direction: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Subject>, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_subject_filter(params);

        let query = format!(
            "SELECT {COLUMNS} FROM subjects {where_clause} \
             ORDER BY {sort_column} {sort_direction} \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_subject_values(sqlx::query_as::<_, Subject>(&query), &bind_values);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count subjects matching the filter (for pagination metadata).
    pub async fn count(pool: &PgPool, params: &SubjectListQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_subject_filter(params);

        let query = format!("SELECT COUNT(*)::BIGINT FROM subjects {where_clause}");

        let q = bind_subject_values_scalar(sqlx::query_scalar::<_, i64>(&query), &bind_values);
        q.fetch_one(pool).await
    }

    /// Update a subject. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSubject,
    ) -> Result<Option<Subject>, sqlx::Error> {
        let query = format!(
            "UPDATE subjects SET
                name = COALESCE($2, name),
                code = COALESCE($3, code),
                slug = COALESCE($4, slug),
                credits = COALESCE($5, credits),
                description = COALESCE($6, description),
                specialist_ids = COALESCE($7, specialist_ids),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subject>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.code)
            .bind(&input.slug)
            .bind(input.credits)
            .bind(&input.description)
            .bind(&input.specialist_ids)
            .fetch_optional(pool)
            .await
    }

    /// Set the active flag. Returns `None` if the subject does not exist.
    pub async fn set_active(
        pool: &PgPool,
        id: DbId,
        is_active: bool,
    ) -> Result<Option<Subject>, sqlx::Error> {
        let query = format!(
            "UPDATE subjects SET is_active = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subject>(&query)
            .bind(id)
            .bind(is_active)
            .fetch_optional(pool)
            .await
    }

    /// Replace the prerequisite list wholesale.
    ///
    /// The caller computes the merged list; this is a single-row atomic
    /// write. Returns `None` if the subject does not exist.
    pub async fn save_prerequisites(
        pool: &PgPool,
        id: DbId,
        prerequisite_ids: &[DbId],
    ) -> Result<Option<Subject>, sqlx::Error> {
        let query = format!(
            "UPDATE subjects SET prerequisite_ids = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subject>(&query)
            .bind(id)
            .bind(prerequisite_ids)
            .fetch_optional(pool)
            .await
    }

    /// Resolve prerequisite ids to full subjects, preserving list order.
    pub async fn find_by_ids_ordered(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<Subject>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM subjects
             WHERE id = ANY($1)
             ORDER BY array_position($1, id)"
        );
        sqlx::query_as::<_, Subject>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Which of the given ids exist as subjects.
    pub async fn existing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT id FROM subjects WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Hard-delete a subject by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Prefix full-text autocomplete over name/code/description.
    ///
    /// `tsquery` must come from [`campus_core::search::build_prefix_tsquery`].
    pub async fn autocomplete(
        pool: &PgPool,
        tsquery: &str,
        limit: i64,
    ) -> Result<Vec<SubjectSuggestion>, sqlx::Error> {
        let query = format!(
            "SELECT id, name, code, slug FROM subjects
             WHERE {SEARCH_VECTOR} @@ to_tsquery('english', $1)
             ORDER BY name ASC
             LIMIT $2"
        );
        sqlx::query_as::<_, SubjectSuggestion>(&query)
            .bind(tsquery)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Subjects related to the given one: sharing a specialist, listed as
    /// one of its prerequisites, or depending on it as a prerequisite.
    /// Excludes the subject itself.
    pub async fn related(
        pool: &PgPool,
        id: DbId,
        specialist_ids: &[DbId],
        prerequisite_ids: &[DbId],
        limit: i64,
    ) -> Result<Vec<SubjectSuggestion>, sqlx::Error> {
        sqlx::query_as::<_, SubjectSuggestion>(
            "SELECT id, name, code, slug FROM subjects
             WHERE id <> $1
               AND (specialist_ids && $2
                    OR id = ANY($3)
                    OR $1 = ANY(prerequisite_ids))
             ORDER BY name ASC
             LIMIT $4",
        )
        .bind(id)
        .bind(specialist_ids)
        .bind(prerequisite_ids)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built subject list queries.
enum BindValue {
    BigInt(i64),
    Text(String),
    Bool(bool),
    Timestamp(Timestamp),
}

/// Build a WHERE clause and bind values from `SubjectListQuery` filters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
/// The `where_clause` is empty if no filters are active, or starts with
/// `WHERE `.
fn build_subject_filter(params: &SubjectListQuery) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(tsquery) = params
        .search
        .as_deref()
        .and_then(campus_core::search::build_tsquery)
    {
        conditions.push(format!("{SEARCH_VECTOR} @@ to_tsquery('english', ${bind_idx})"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(tsquery));
    }

    if let Some(ref name) = params.name {
        conditions.push(format!("name = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(name.clone()));
    }

    if let Some(ref slug) = params.slug {
        conditions.push(format!("slug = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(slug.clone()));
    }

    if let Some(ref code) = params.code {
        conditions.push(format!("code = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(code.clone()));
    }

    if let Some(is_active) = params.is_active {
        conditions.push(format!("is_active = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Bool(is_active));
    }

    if let Some(specialist_id) = params.specialist_id {
        conditions.push(format!("${bind_idx} = ANY(specialist_ids)"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(specialist_id));
    }

    if let Some(created_at) = params.created_at {
        conditions.push(format!("created_at = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(created_at));
    }

    if let Some(from) = params.created_from {
        conditions.push(format!("created_at >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(from));
    }

    if let Some(to) = params.created_to {
        conditions.push(format!("created_at <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(to));
    }

    if let Some(updated_at) = params.updated_at {
        conditions.push(format!("updated_at = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(updated_at));
    }

    if let Some(from) = params.updated_from {
        conditions.push(format!("updated_at >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(from));
    }

    if let Some(to) = params.updated_to {
        conditions.push(format!("updated_at <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(to));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_subject_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Bool(v) => q = q.bind(*v),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_subject_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Bool(v) => q = q.bind(*v),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}
