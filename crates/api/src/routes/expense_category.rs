use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::expense_category;
use crate::state::AppState;

/// Routes mounted at `/expense-categories`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// DELETE /{id}    -> delete (custom categories only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(expense_category::list).post(expense_category::create),
        )
        .route("/{id}", delete(expense_category::delete))
}
