//! Handlers for the `/subjects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use campus_core::types::DbId;
use campus_db::models::subject::{
    CreateSubject, DeletedSubject, Subject, SubjectListQuery, SubjectPage, SubjectSuggestion,
    UpdateSubject,
};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::{AutocompleteParams, LimitParams};
use crate::services::subjects::SubjectRef;
use crate::state::AppState;

/// Payload for the prerequisite batch-add endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct AddPrerequisites {
    pub prerequisite_ids: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/v1/subjects
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SubjectListQuery>,
) -> AppResult<Json<SubjectPage>> {
    Ok(Json(state.subjects.list(params).await?))
}

/// GET /api/v1/subjects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Subject>> {
    Ok(Json(state.subjects.get(SubjectRef::Id(id)).await?))
}

/// GET /api/v1/subjects/slug/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Subject>> {
    Ok(Json(state.subjects.get(SubjectRef::Slug(&slug)).await?))
}

/// GET /api/v1/subjects/search
pub async fn autocomplete(
    State(state): State<AppState>,
    Query(params): Query<AutocompleteParams>,
) -> AppResult<Json<Vec<SubjectSuggestion>>> {
    Ok(Json(
        state.subjects.autocomplete(&params.q, params.limit).await?,
    ))
}

/// GET /api/v1/subjects/{id}/prerequisites
pub async fn list_prerequisites(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Subject>>> {
    Ok(Json(state.subjects.list_prerequisites(id).await?))
}

/// GET /api/v1/subjects/{id}/related
pub async fn related(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<Vec<SubjectSuggestion>>> {
    Ok(Json(state.subjects.related(id, params.limit).await?))
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// POST /api/v1/subjects
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateSubject>,
) -> AppResult<(StatusCode, Json<Subject>)> {
    let subject = state.subjects.create(input, &user).await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

/// PUT /api/v1/subjects/{id}
pub async fn update_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(patch): Json<UpdateSubject>,
) -> AppResult<Json<Subject>> {
    Ok(Json(
        state.subjects.update(SubjectRef::Id(id), patch, &user).await?,
    ))
}

/// PUT /api/v1/subjects/slug/{slug}
pub async fn update_by_slug(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
    Json(patch): Json<UpdateSubject>,
) -> AppResult<Json<Subject>> {
    Ok(Json(
        state
            .subjects
            .update(SubjectRef::Slug(&slug), patch, &user)
            .await?,
    ))
}

/// DELETE /api/v1/subjects/{id}
pub async fn delete_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeletedSubject>> {
    Ok(Json(state.subjects.delete(SubjectRef::Id(id), &user).await?))
}

/// DELETE /api/v1/subjects/slug/{slug}
pub async fn delete_by_slug(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<DeletedSubject>> {
    Ok(Json(
        state.subjects.delete(SubjectRef::Slug(&slug), &user).await?,
    ))
}

/// POST /api/v1/subjects/{id}/activate
pub async fn activate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Subject>> {
    Ok(Json(state.subjects.set_active(id, true, &user).await?))
}

/// POST /api/v1/subjects/{id}/deactivate
pub async fn deactivate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Subject>> {
    Ok(Json(state.subjects.set_active(id, false, &user).await?))
}

/// POST /api/v1/subjects/{id}/prerequisites
pub async fn add_prerequisites(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<AddPrerequisites>,
) -> AppResult<Json<Subject>> {
    Ok(Json(
        state
            .subjects
            .add_prerequisites(id, &input.prerequisite_ids, &user)
            .await?,
    ))
}

/// DELETE /api/v1/subjects/{id}/prerequisites/{prerequisite_id}
pub async fn remove_prerequisite(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, prerequisite_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Subject>> {
    Ok(Json(
        state
            .subjects
            .remove_prerequisite(id, prerequisite_id, &user)
            .await?,
    ))
}
