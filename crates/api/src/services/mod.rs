//! Application services.
//!
//! - [`subjects::SubjectService`] -- the single authority for all reads
//!   and writes of subject records.

pub mod subjects;
