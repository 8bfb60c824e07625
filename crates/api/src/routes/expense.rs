//! Route definitions for the `/expenses` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::expense;
use crate::state::AppState;

/// Routes mounted at `/expenses`.
///
/// ```text
/// GET    /        -> list (?startDate, ?endDate, ?category)
/// POST   /        -> create
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(expense::list).post(expense::create))
        .route("/{id}", put(expense::update).delete(expense::delete))
}
