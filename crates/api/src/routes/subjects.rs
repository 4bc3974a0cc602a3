//! Route definitions for the subject directory.
//!
//! ```text
//! GET    /                               -> list
//! POST   /                               -> create
//! GET    /search                         -> autocomplete
//! GET    /slug/{slug}                    -> get_by_slug
//! PUT    /slug/{slug}                    -> update_by_slug
//! DELETE /slug/{slug}                    -> delete_by_slug
//! GET    /{id}                           -> get_by_id
//! PUT    /{id}                           -> update_by_id
//! DELETE /{id}                           -> delete_by_id
//! POST   /{id}/activate                  -> activate
//! POST   /{id}/deactivate                -> deactivate
//! GET    /{id}/prerequisites             -> list_prerequisites
//! POST   /{id}/prerequisites             -> add_prerequisites
//! DELETE /{id}/prerequisites/{prereq_id} -> remove_prerequisite
//! GET    /{id}/related                   -> related
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::subjects;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(subjects::list).post(subjects::create))
        .route("/search", get(subjects::autocomplete))
        .route(
            "/slug/{slug}",
            get(subjects::get_by_slug)
                .put(subjects::update_by_slug)
                .delete(subjects::delete_by_slug),
        )
        .route(
            "/{id}",
            get(subjects::get_by_id)
                .put(subjects::update_by_id)
                .delete(subjects::delete_by_id),
        )
        .route("/{id}/activate", post(subjects::activate))
        .route("/{id}/deactivate", post(subjects::deactivate))
        .route(
            "/{id}/prerequisites",
            get(subjects::list_prerequisites).post(subjects::add_prerequisites),
        )
        .route(
            "/{id}/prerequisites/{prerequisite_id}",
            axum::routing::delete(subjects::remove_prerequisite),
        )
        .route("/{id}/related", get(subjects::related))
}
