//! Pure domain logic for the campus subject directory.
//!
//! This crate has no database or HTTP dependencies so that authorization
//! policy, prerequisite-list semantics, and search helpers can be unit
//! tested in isolation and reused by any future CLI or worker tooling.

pub mod error;
pub mod policy;
pub mod prerequisites;
pub mod roles;
pub mod search;
pub mod types;
