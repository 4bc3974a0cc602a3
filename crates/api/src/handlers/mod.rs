//! Request handlers.
//!
//! Handlers stay thin: parse the request, delegate to the subject
//! service, shape the response.

pub mod health;
pub mod subjects;
