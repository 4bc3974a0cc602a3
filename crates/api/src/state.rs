use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::subjects::SubjectService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: campus_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// The subject directory service.
    pub subjects: Arc<SubjectService>,
}
