//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod course_repo;
pub mod specialist_repo;
pub mod subject_repo;
pub mod user_repo;

pub use course_repo::CourseRepo;
pub use specialist_repo::SpecialistRepo;
pub use subject_repo::SubjectRepo;
pub use user_repo::UserRepo;
