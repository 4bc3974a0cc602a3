//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for the autocomplete endpoint (`?q=&limit=`).
#[derive(Debug, Deserialize)]
pub struct AutocompleteParams {
    #[serde(default)]
    pub q: String,
    pub limit: Option<i64>,
}

/// Query parameters for endpoints that only cap their result size.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}
