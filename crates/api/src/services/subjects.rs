//! The subject directory service.
//!
//! Single authority for all reads and writes of subject records. It
//! enforces uniqueness of name/code/slug, role and specialist-scoping
//! authorization, the prerequisite-graph invariants, and the
//! referential delete gate against the course collection.
//!
//! Its two external read dependencies -- the course reference count and
//! the caller's assigned-specialist lookup -- are injected as trait
//! objects so tests can substitute them without a mocking framework.
//!
//! Known race: uniqueness and delete-gate checks are not wrapped in a
//! cross-table transaction. The store closes both gaps (unique `uq_*`
//! indexes; `ON DELETE RESTRICT` on courses), so a racing call fails
//! with a constraint violation instead of corrupting data -- it just
//! surfaces the generic constraint message rather than the specific one.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use campus_core::error::CoreError;
use campus_core::policy::{authorize_create, authorize_manage};
use campus_core::prerequisites::{merge_prerequisites, remove_prerequisite};
use campus_core::roles::ROLE_TEACHER;
use campus_core::search::{
    build_prefix_tsquery, clamp_limit, clamp_page, resolve_sort, slugify, Pagination,
    DEFAULT_PAGE_LIMIT, DEFAULT_RELATED_LIMIT, DEFAULT_SUGGESTION_LIMIT, MAX_PAGE_LIMIT,
    MAX_RELATED_LIMIT, MAX_SUGGESTION_LIMIT,
};
use campus_core::types::DbId;
use campus_db::models::subject::{
    CreateSubject, DeletedSubject, Subject, SubjectListQuery, SubjectPage, SubjectSuggestion,
    UpdateSubject,
};
use campus_db::repositories::{CourseRepo, SubjectRepo, UserRepo};
use campus_db::DbPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

// ---------------------------------------------------------------------------
// Injected dependencies
// ---------------------------------------------------------------------------

/// Read access to the course collection (the dependent entity that
/// blocks subject deletion).
#[async_trait]
pub trait CourseCatalog: Send + Sync {
    /// How many courses currently reference this subject.
    async fn count_courses_using_subject(&self, subject_id: DbId) -> Result<i64, sqlx::Error>;
}

/// Resolves a user's assigned specialist set.
#[async_trait]
pub trait SpecialistDirectory: Send + Sync {
    /// `None` means the user does not exist; an empty set means the user
    /// exists but has no assignments. The distinction matters: a missing
    /// user is a `NotFound`, an unassigned teacher a `Forbidden`.
    async fn assigned_specialists(
        &self,
        user_id: DbId,
    ) -> Result<Option<HashSet<DbId>>, sqlx::Error>;
}

/// Production [`CourseCatalog`] backed by the `courses` table.
pub struct PgCourseCatalog {
    pool: DbPool,
}

impl PgCourseCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseCatalog for PgCourseCatalog {
    async fn count_courses_using_subject(&self, subject_id: DbId) -> Result<i64, sqlx::Error> {
        CourseRepo::count_by_subject(&self.pool, subject_id).await
    }
}

/// Production [`SpecialistDirectory`] backed by the `users` /
/// `user_specialists` tables.
pub struct PgSpecialistDirectory {
    pool: DbPool,
}

impl PgSpecialistDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SpecialistDirectory for PgSpecialistDirectory {
    async fn assigned_specialists(
        &self,
        user_id: DbId,
    ) -> Result<Option<HashSet<DbId>>, sqlx::Error> {
        if UserRepo::find_by_id(&self.pool, user_id).await?.is_none() {
            return Ok(None);
        }
        let ids = UserRepo::assigned_specialist_ids(&self.pool, user_id).await?;
        Ok(Some(ids.into_iter().collect()))
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Identifies a subject either by id or by slug.
#[derive(Debug, Clone)]
pub enum SubjectRef<'a> {
    Id(DbId),
    Slug(&'a str),
}

/// The subject directory service.
pub struct SubjectService {
    pool: DbPool,
    courses: Arc<dyn CourseCatalog>,
    specialists: Arc<dyn SpecialistDirectory>,
}

impl SubjectService {
    pub fn new(
        pool: DbPool,
        courses: Arc<dyn CourseCatalog>,
        specialists: Arc<dyn SpecialistDirectory>,
    ) -> Self {
        Self {
            pool,
            courses,
            specialists,
        }
    }

    /// Production wiring: both dependencies backed by the same pool.
    pub fn with_pg(pool: DbPool) -> Self {
        Self::new(
            pool.clone(),
            Arc::new(PgCourseCatalog::new(pool.clone())),
            Arc::new(PgSpecialistDirectory::new(pool)),
        )
    }

    // -- reads ---------------------------------------------------------------

    /// List subjects with filtering, sorting, and pagination.
    pub async fn list(&self, params: SubjectListQuery) -> AppResult<SubjectPage> {
        let page = clamp_page(params.page);
        let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let (sort_column, sort_direction) =
            resolve_sort(params.sort_by.as_deref(), params.sort_order.as_deref());

        let total = SubjectRepo::count(&self.pool, &params).await?;
        let pagination = Pagination::for_page(page, limit, total);
        let subjects = SubjectRepo::list(
            &self.pool,
            &params,
            sort_column,
            sort_direction,
            limit,
            pagination.offset(),
        )
        .await?;

        Ok(SubjectPage {
            subjects,
            pagination,
        })
    }

    /// Fetch a single subject by id or slug.
    pub async fn get(&self, subject: SubjectRef<'_>) -> AppResult<Subject> {
        self.fetch(subject).await
    }

    /// Resolve a subject's prerequisites to full subject records,
    /// preserving list order.
    pub async fn list_prerequisites(&self, id: DbId) -> AppResult<Vec<Subject>> {
        let subject = self.fetch(SubjectRef::Id(id)).await?;
        Ok(SubjectRepo::find_by_ids_ordered(&self.pool, &subject.prerequisite_ids).await?)
    }

    /// Lightweight prefix search for autocomplete. An empty or
    /// unusable query returns an empty list without touching the store.
    pub async fn autocomplete(
        &self,
        query: &str,
        limit: Option<i64>,
    ) -> AppResult<Vec<SubjectSuggestion>> {
        let Some(tsquery) = build_prefix_tsquery(query) else {
            return Ok(Vec::new());
        };
        let limit = clamp_limit(limit, DEFAULT_SUGGESTION_LIMIT, MAX_SUGGESTION_LIMIT);
        Ok(SubjectRepo::autocomplete(&self.pool, &tsquery, limit).await?)
    }

    /// Subjects related to this one via shared specialists or
    /// prerequisite edges (either direction). A subject with neither
    /// signal yields an empty list without querying for matches.
    pub async fn related(
        &self,
        id: DbId,
        limit: Option<i64>,
    ) -> AppResult<Vec<SubjectSuggestion>> {
        let subject = self.fetch(SubjectRef::Id(id)).await?;
        if subject.specialist_ids.is_empty() && subject.prerequisite_ids.is_empty() {
            return Ok(Vec::new());
        }
        let limit = clamp_limit(limit, DEFAULT_RELATED_LIMIT, MAX_RELATED_LIMIT);
        Ok(SubjectRepo::related(
            &self.pool,
            subject.id,
            &subject.specialist_ids,
            &subject.prerequisite_ids,
            limit,
        )
        .await?)
    }

    // -- writes --------------------------------------------------------------

    /// Create a subject.
    ///
    /// Admins are unrestricted; teachers may only assign specialists
    /// from their own set and must have at least one assignment.
    pub async fn create(&self, input: CreateSubject, caller: &AuthUser) -> AppResult<Subject> {
        input.validate()?;

        let assigned = self.assigned_for(caller).await?;
        authorize_create(&caller.role, &assigned, &input.specialist_ids)?;

        if SubjectRepo::name_taken(&self.pool, &input.name, None).await? {
            return Err(conflict("Subject with this name already exists"));
        }
        if SubjectRepo::code_taken(&self.pool, &input.code, None).await? {
            return Err(conflict("Subject with this code already exists"));
        }

        let slug = match &input.slug {
            Some(slug) => slug.clone(),
            None => slugify(&input.name).ok_or_else(|| {
                AppError::Core(CoreError::Validation(
                    "name does not produce a usable slug".into(),
                ))
            })?,
        };
        if SubjectRepo::slug_taken(&self.pool, &slug, None).await? {
            return Err(conflict("Subject with this slug already exists"));
        }

        let subject = SubjectRepo::create(&self.pool, &input, &slug).await?;
        tracing::info!(subject_id = subject.id, name = %subject.name, "Subject created");
        Ok(subject)
    }

    /// Update a subject by id or slug.
    ///
    /// Teacher authorization is checked against the subject's *current*
    /// specialist list, not the patched one (long-standing contract).
    pub async fn update(
        &self,
        subject: SubjectRef<'_>,
        patch: UpdateSubject,
        caller: &AuthUser,
    ) -> AppResult<Subject> {
        patch.validate()?;

        let current = self.fetch(subject).await?;
        self.authorize_mutation(caller, &current).await?;

        if let Some(ref name) = patch.name {
            if name != &current.name
                && SubjectRepo::name_taken(&self.pool, name, Some(current.id)).await?
            {
                return Err(conflict("Subject with this name already exists"));
            }
        }
        if let Some(ref code) = patch.code {
            if code != &current.code
                && SubjectRepo::code_taken(&self.pool, code, Some(current.id)).await?
            {
                return Err(conflict("Subject with this code already exists"));
            }
        }
        if let Some(ref slug) = patch.slug {
            if slug != &current.slug
                && SubjectRepo::slug_taken(&self.pool, slug, Some(current.id)).await?
            {
                return Err(conflict("Subject with this slug already exists"));
            }
        }

        SubjectRepo::update(&self.pool, current.id, &patch)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::subject_not_found()))
    }

    /// Delete a subject, refusing while any course still references it.
    pub async fn delete(
        &self,
        subject: SubjectRef<'_>,
        caller: &AuthUser,
    ) -> AppResult<DeletedSubject> {
        let current = self.fetch(subject).await?;
        self.authorize_mutation(caller, &current).await?;

        let in_use = self
            .courses
            .count_courses_using_subject(current.id)
            .await?;
        if in_use > 0 {
            return Err(conflict(
                "Cannot delete subject: it is referenced by existing courses",
            ));
        }

        SubjectRepo::delete(&self.pool, current.id).await?;
        tracing::info!(subject_id = current.id, "Subject deleted");
        Ok(DeletedSubject {
            id: current.id,
            deleted: true,
        })
    }

    /// Set the active flag. Idempotent in either direction.
    pub async fn set_active(
        &self,
        id: DbId,
        is_active: bool,
        caller: &AuthUser,
    ) -> AppResult<Subject> {
        let current = self.fetch(SubjectRef::Id(id)).await?;
        self.authorize_mutation(caller, &current).await?;

        SubjectRepo::set_active(&self.pool, current.id, is_active)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::subject_not_found()))
    }

    /// Add a batch of prerequisites.
    ///
    /// Self references and duplicates (against the stored list or within
    /// the batch) are silently skipped. Every id that would actually be
    /// appended must exist as a subject, otherwise the whole batch is
    /// rejected with `NotFound` and nothing is persisted.
    pub async fn add_prerequisites(
        &self,
        id: DbId,
        prerequisite_ids: &[DbId],
        caller: &AuthUser,
    ) -> AppResult<Subject> {
        let current = self.fetch(SubjectRef::Id(id)).await?;
        self.authorize_mutation(caller, &current).await?;

        let (merged, appended) =
            merge_prerequisites(current.id, &current.prerequisite_ids, prerequisite_ids);
        if appended.is_empty() {
            return Ok(current);
        }

        let existing = SubjectRepo::existing_ids(&self.pool, &appended).await?;
        if existing.len() != appended.len() {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Prerequisite subject",
            }));
        }

        SubjectRepo::save_prerequisites(&self.pool, current.id, &merged)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::subject_not_found()))
    }

    /// Remove a single prerequisite. Absence is a no-op, not an error.
    pub async fn remove_prerequisite(
        &self,
        id: DbId,
        prerequisite_id: DbId,
        caller: &AuthUser,
    ) -> AppResult<Subject> {
        let current = self.fetch(SubjectRef::Id(id)).await?;
        self.authorize_mutation(caller, &current).await?;

        let Some(remaining) = remove_prerequisite(&current.prerequisite_ids, prerequisite_id)
        else {
            return Ok(current);
        };

        SubjectRepo::save_prerequisites(&self.pool, current.id, &remaining)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::subject_not_found()))
    }

    // -- internals -----------------------------------------------------------

    async fn fetch(&self, subject: SubjectRef<'_>) -> AppResult<Subject> {
        let found = match subject {
            SubjectRef::Id(id) => SubjectRepo::find_by_id(&self.pool, id).await?,
            SubjectRef::Slug(slug) => SubjectRepo::find_by_slug(&self.pool, slug).await?,
        };
        found.ok_or_else(|| AppError::Core(CoreError::subject_not_found()))
    }

    /// Resolve the caller's assigned specialist set for policy checks.
    ///
    /// Admins skip the lookup entirely; a teacher whose user record is
    /// missing surfaces `NotFound` ("User not found") rather than a
    /// generic authorization failure.
    async fn assigned_for(&self, caller: &AuthUser) -> AppResult<HashSet<DbId>> {
        if caller.role != ROLE_TEACHER {
            return Ok(HashSet::new());
        }
        self.specialists
            .assigned_specialists(caller.user_id)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::user_not_found()))
    }

    async fn authorize_mutation(&self, caller: &AuthUser, subject: &Subject) -> AppResult<()> {
        let assigned = self.assigned_for(caller).await?;
        authorize_manage(&caller.role, &assigned, &subject.specialist_ids)?;
        Ok(())
    }
}

fn conflict(msg: &str) -> AppError {
    AppError::Core(CoreError::Conflict(msg.to_string()))
}
