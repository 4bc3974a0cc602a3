#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for the most common not-found case.
    pub fn subject_not_found() -> Self {
        CoreError::NotFound { entity: "Subject" }
    }

    /// The caller's user record could not be resolved.
    pub fn user_not_found() -> Self {
        CoreError::NotFound { entity: "User" }
    }
}
