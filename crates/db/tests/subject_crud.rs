//! Integration tests for the subject repository layer.
//!
//! Exercises the repositories against a real database:
//! - CRUD and uniqueness probes
//! - Unique constraint and foreign key violations
//! - List filtering (flags, arrays, date ranges, full-text search)
//! - Prerequisite array persistence and ordered resolution

use campus_core::search::resolve_sort;
use campus_db::models::course::CreateCourse;
use campus_db::models::subject::{CreateSubject, SubjectListQuery, UpdateSubject};
use campus_db::repositories::{CourseRepo, SpecialistRepo, SubjectRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_subject(name: &str, code: &str) -> CreateSubject {
    CreateSubject {
        name: name.to_string(),
        code: code.to_string(),
        slug: None,
        credits: 5,
        description: None,
        specialist_ids: Vec::new(),
    }
}

async fn seed_subject(pool: &PgPool, name: &str, code: &str) -> campus_db::models::subject::Subject {
    let slug = name.to_lowercase().replace(' ', "-");
    SubjectRepo::create(pool, &new_subject(name, code), &slug)
        .await
        .unwrap()
}

fn default_list() -> SubjectListQuery {
    SubjectListQuery::default()
}

async fn list_all(
    pool: &PgPool,
    params: &SubjectListQuery,
) -> Vec<campus_db::models::subject::Subject> {
    let (col, dir) = resolve_sort(params.sort_by.as_deref(), params.sort_order.as_deref());
    SubjectRepo::list(pool, params, col, dir, 100, 0).await.unwrap()
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_and_find_by_id(pool: PgPool) {
    let created = seed_subject(&pool, "Linear Algebra", "MATH201").await;
    assert!(created.is_active);
    assert!(created.prerequisite_ids.is_empty());

    let found = SubjectRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(found.name, "Linear Algebra");
    assert_eq!(found.code, "MATH201");
    assert_eq!(found.slug, "linear-algebra");
}

#[sqlx::test(migrations = "./migrations")]
async fn find_by_slug(pool: PgPool) {
    seed_subject(&pool, "Databases", "CS305").await;
    let found = SubjectRepo::find_by_slug(&pool, "databases").await.unwrap();
    assert!(found.is_some());
    assert!(SubjectRepo::find_by_slug(&pool, "missing").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_name_violates_unique_constraint(pool: PgPool) {
    seed_subject(&pool, "Physics", "PHY101").await;
    let err = SubjectRepo::create(&pool, &new_subject("Physics", "PHY102"), "physics-2")
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_subjects_name"));
        }
        other => panic!("expected database error, got {other:?}"),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn uniqueness_probes_exclude_self(pool: PgPool) {
    let s = seed_subject(&pool, "Chemistry", "CHE101").await;

    assert!(SubjectRepo::name_taken(&pool, "Chemistry", None).await.unwrap());
    assert!(!SubjectRepo::name_taken(&pool, "Chemistry", Some(s.id)).await.unwrap());
    assert!(!SubjectRepo::code_taken(&pool, "CHE999", None).await.unwrap());
    assert!(SubjectRepo::slug_taken(&pool, "chemistry", None).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn update_applies_only_present_fields(pool: PgPool) {
    let s = seed_subject(&pool, "Statistics", "STA200").await;

    let patch = UpdateSubject {
        name: Some("Applied Statistics".to_string()),
        credits: Some(8),
        ..Default::default()
    };
    let updated = SubjectRepo::update(&pool, s.id, &patch).await.unwrap().unwrap();
    assert_eq!(updated.name, "Applied Statistics");
    assert_eq!(updated.credits, 8);
    // Untouched fields survive.
    assert_eq!(updated.code, "STA200");
    assert_eq!(updated.slug, "statistics");
    assert!(updated.updated_at >= s.updated_at);
}

#[sqlx::test(migrations = "./migrations")]
async fn update_can_clear_specialists(pool: PgPool) {
    let mut input = new_subject("Biology", "BIO100");
    input.specialist_ids = vec![];
    let s = SubjectRepo::create(&pool, &input, "biology").await.unwrap();

    let patch = UpdateSubject {
        specialist_ids: Some(vec![]),
        ..Default::default()
    };
    let updated = SubjectRepo::update(&pool, s.id, &patch).await.unwrap().unwrap();
    assert!(updated.specialist_ids.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn update_missing_subject_returns_none(pool: PgPool) {
    let patch = UpdateSubject::default();
    assert!(SubjectRepo::update(&pool, 999_999, &patch).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn set_active_toggles_flag(pool: PgPool) {
    let s = seed_subject(&pool, "Ethics", "PHI110").await;
    let off = SubjectRepo::set_active(&pool, s.id, false).await.unwrap().unwrap();
    assert!(!off.is_active);
    let on = SubjectRepo::set_active(&pool, s.id, true).await.unwrap().unwrap();
    assert!(on.is_active);
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_removes_row(pool: PgPool) {
    let s = seed_subject(&pool, "Drawing", "ART120").await;
    assert!(SubjectRepo::delete(&pool, s.id).await.unwrap());
    assert!(SubjectRepo::find_by_id(&pool, s.id).await.unwrap().is_none());
    assert!(!SubjectRepo::delete(&pool, s.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Referential integrity
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn course_reference_blocks_delete_at_fk_level(pool: PgPool) {
    let s = seed_subject(&pool, "Networking", "CS340").await;
    let course = CourseRepo::create(
        &pool,
        &CreateCourse {
            title: "Networking, Fall".to_string(),
            subject_id: s.id,
        },
    )
    .await
    .unwrap();

    assert_eq!(CourseRepo::count_by_subject(&pool, s.id).await.unwrap(), 1);
    assert!(SubjectRepo::delete(&pool, s.id).await.is_err());

    CourseRepo::delete(&pool, course.id).await.unwrap();
    assert_eq!(CourseRepo::count_by_subject(&pool, s.id).await.unwrap(), 0);
    assert!(SubjectRepo::delete(&pool, s.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Prerequisites
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn save_and_resolve_prerequisites_in_order(pool: PgPool) {
    let a = seed_subject(&pool, "Calculus I", "MATH101").await;
    let b = seed_subject(&pool, "Calculus II", "MATH102").await;
    let c = seed_subject(&pool, "Real Analysis", "MATH301").await;

    let saved = SubjectRepo::save_prerequisites(&pool, c.id, &[b.id, a.id])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.prerequisite_ids, vec![b.id, a.id]);

    let resolved = SubjectRepo::find_by_ids_ordered(&pool, &saved.prerequisite_ids)
        .await
        .unwrap();
    let names: Vec<&str> = resolved.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Calculus II", "Calculus I"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn existing_ids_filters_missing_subjects(pool: PgPool) {
    let a = seed_subject(&pool, "Optics", "PHY210").await;
    let existing = SubjectRepo::existing_ids(&pool, &[a.id, 999_999]).await.unwrap();
    assert_eq!(existing, vec![a.id]);
}

// ---------------------------------------------------------------------------
// Listing and filters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn list_filters_by_is_active(pool: PgPool) {
    let a = seed_subject(&pool, "Active Subject", "ACT1").await;
    let b = seed_subject(&pool, "Inactive Subject", "INA1").await;
    SubjectRepo::set_active(&pool, b.id, false).await.unwrap();

    let mut params = default_list();
    params.is_active = Some(true);
    let rows = list_all(&pool, &params).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, a.id);

    params.is_active = Some(false);
    let rows = list_all(&pool, &params).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, b.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn list_filters_by_specialist_membership(pool: PgPool) {
    let spec = SpecialistRepo::create(&pool, "Mathematics").await.unwrap();
    let mut input = new_subject("Geometry", "MATH150");
    input.specialist_ids = vec![spec.id];
    let tagged = SubjectRepo::create(&pool, &input, "geometry").await.unwrap();
    seed_subject(&pool, "History", "HIS100").await;

    let mut params = default_list();
    params.specialist_id = Some(spec.id);
    let rows = list_all(&pool, &params).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, tagged.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn list_filters_by_created_range_inclusive(pool: PgPool) {
    let s = seed_subject(&pool, "Astronomy", "AST100").await;

    let mut params = default_list();
    params.created_from = Some(s.created_at);
    params.created_to = Some(s.created_at);
    let rows = list_all(&pool, &params).await;
    assert_eq!(rows.len(), 1);

    params.created_from = Some(s.created_at + chrono::Duration::seconds(1));
    params.created_to = None;
    let rows = list_all(&pool, &params).await;
    assert!(rows.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn list_full_text_search_matches_name_and_description(pool: PgPool) {
    let mut input = new_subject("Compilers", "CS420");
    input.description = Some("Parsing and code generation".to_string());
    SubjectRepo::create(&pool, &input, "compilers").await.unwrap();
    seed_subject(&pool, "Painting", "ART200").await;

    let mut params = default_list();
    params.search = Some("parsing".to_string());
    let rows = list_all(&pool, &params).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Compilers");
}

#[sqlx::test(migrations = "./migrations")]
async fn count_matches_filter(pool: PgPool) {
    seed_subject(&pool, "One", "C1").await;
    seed_subject(&pool, "Two", "C2").await;
    let total = SubjectRepo::count(&pool, &default_list()).await.unwrap();
    assert_eq!(total, 2);

    let mut params = default_list();
    params.name = Some("One".to_string());
    assert_eq!(SubjectRepo::count(&pool, &params).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn list_sorts_by_whitelisted_column(pool: PgPool) {
    seed_subject(&pool, "Zoology", "ZOO1").await;
    seed_subject(&pool, "Anatomy", "ANA1").await;

    let mut params = default_list();
    params.sort_by = Some("name".to_string());
    let rows = list_all(&pool, &params).await;
    assert_eq!(rows[0].name, "Anatomy");
}

// ---------------------------------------------------------------------------
// Autocomplete and related
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn autocomplete_prefix_matches(pool: PgPool) {
    seed_subject(&pool, "Microeconomics", "ECO101").await;
    seed_subject(&pool, "Macroeconomics", "ECO102").await;

    let hits = SubjectRepo::autocomplete(&pool, "micro:*", 10).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Microeconomics");
}

#[sqlx::test(migrations = "./migrations")]
async fn related_finds_shared_specialists_and_prerequisite_edges(pool: PgPool) {
    let spec = SpecialistRepo::create(&pool, "Computer Science").await.unwrap();

    let mut input = new_subject("Algorithms", "CS201");
    input.specialist_ids = vec![spec.id];
    let target = SubjectRepo::create(&pool, &input, "algorithms").await.unwrap();

    // Shares the specialist.
    let mut input = new_subject("Data Structures", "CS202");
    input.specialist_ids = vec![spec.id];
    SubjectRepo::create(&pool, &input, "data-structures").await.unwrap();

    // Depends on the target as a prerequisite.
    let dependent = seed_subject(&pool, "Machine Learning", "CS401").await;
    SubjectRepo::save_prerequisites(&pool, dependent.id, &[target.id])
        .await
        .unwrap();

    // Unrelated.
    seed_subject(&pool, "Poetry", "LIT101").await;

    let related = SubjectRepo::related(
        &pool,
        target.id,
        &target.specialist_ids,
        &target.prerequisite_ids,
        10,
    )
    .await
    .unwrap();

    let names: Vec<&str> = related.iter().map(|s| s.name.as_str()).collect();
    assert!(names.contains(&"Data Structures"));
    assert!(names.contains(&"Machine Learning"));
    assert!(!names.contains(&"Poetry"));
    assert!(!names.contains(&"Algorithms"));
}

// ---------------------------------------------------------------------------
// User / specialist lookups
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn user_specialist_assignment_roundtrip(pool: PgPool) {
    let user = UserRepo::create(
        &pool,
        &campus_db::models::user::CreateUser {
            email: "t@example.edu".to_string(),
            display_name: "Teacher".to_string(),
            role: "teacher".to_string(),
        },
    )
    .await
    .unwrap();
    let spec = SpecialistRepo::create(&pool, "Physics").await.unwrap();

    UserRepo::assign_specialist(&pool, user.id, spec.id).await.unwrap();
    // Idempotent.
    UserRepo::assign_specialist(&pool, user.id, spec.id).await.unwrap();

    let assigned = UserRepo::assigned_specialist_ids(&pool, user.id).await.unwrap();
    assert_eq!(assigned, vec![spec.id]);

    assert!(UserRepo::find_by_id(&pool, user.id).await.unwrap().is_some());
    assert!(UserRepo::find_by_id(&pool, 999_999).await.unwrap().is_none());
}
