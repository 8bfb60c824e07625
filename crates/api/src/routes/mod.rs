pub mod client;
pub mod dashboard;
pub mod employee;
pub mod expense;
pub mod expense_category;
pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /clients                                         list, create
/// /clients/{id}                                    get, update, delete
///
/// /projects                                        paginated list, create
/// /projects/cost-preview                           cost of unsaved input (POST)
/// /projects/{id}                                   get, update, delete
/// /projects/{id}/status                            status change (PATCH)
/// /projects/{id}/allocations                       list, upsert
/// /projects/{id}/allocations/{allocation_id}       delete
///
/// /employees                                       list, create
/// /employees/{id}                                  get, update, delete
///
/// /expenses                                        list, create
/// /expenses/{id}                                   update, delete
///
/// /expense-categories                              list, create
/// /expense-categories/{id}                         delete
///
/// /dashboard/summary                               net savings rollup
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/clients", client::router())
        .nest("/projects", project::router())
        .nest("/employees", employee::router())
        .nest("/expenses", expense::router())
        .nest("/expense-categories", expense_category::router())
        .nest("/dashboard", dashboard::router())
}
