//! Route definitions for the `/projects` resource.
//!
//! Also nests allocation routes under `/projects/{id}/allocations`.

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers::{allocation, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// POST   /cost-preview                      -> cost_preview
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
/// PATCH  /{id}/status                       -> update_status
///
/// GET    /{id}/allocations                  -> list_by_project
/// POST   /{id}/allocations                  -> upsert
/// DELETE /{id}/allocations/{allocation_id}  -> delete
/// ```
pub fn router() -> Router<AppState> {
    let allocation_routes = Router::new()
        .route(
            "/",
            get(allocation::list_by_project).post(allocation::upsert),
        )
        .route("/{allocation_id}", delete(allocation::delete));

    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/cost-preview", post(project::cost_preview))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/status", patch(project::update_status))
        .nest("/{id}/allocations", allocation_routes)
}
