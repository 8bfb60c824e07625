//! Handlers for the `/expenses` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use margin_core::error::CoreError;
use margin_core::types::DbId;
use margin_core::validation::{validate_name, validate_non_negative, validate_optional_non_negative};
use margin_db::models::expense::{CreateExpense, Expense, ExpenseFilter, UpdateExpense};
use margin_db::repositories::ExpenseRepo;

use crate::error::{AppError, AppResult};
use crate::query::{date_bounds, non_empty, ExpenseListParams};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Expense",
        id,
    })
}

/// POST /api/expenses
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateExpense>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    validate_name("category", &input.category)?;
    validate_non_negative("amount", input.amount)?;

    let expense = ExpenseRepo::create(&state.pool, &input).await?;
    tracing::info!(
        expense_id = expense.id,
        category = %expense.category,
        amount = %expense.amount,
        "Expense logged"
    );
    Ok((StatusCode::CREATED, Json(expense)))
}

/// GET /api/expenses
///
/// Newest first, optionally bounded by `startDate` / `endDate` and limited
/// to one `category`.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ExpenseListParams>,
) -> AppResult<Json<Vec<Expense>>> {
    let (from, to) = date_bounds(params.start_date, params.end_date)?;
    let filter = ExpenseFilter {
        from,
        to,
        category: non_empty(params.category.as_deref()),
    };
    let expenses = ExpenseRepo::list(&state.pool, &filter).await?;
    Ok(Json(expenses))
}

/// PUT /api/expenses/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateExpense>,
) -> AppResult<Json<Expense>> {
    if let Some(category) = &input.category {
        validate_name("category", category)?;
    }
    validate_optional_non_negative("amount", input.amount)?;

    let expense = ExpenseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(expense_id = id, "Expense updated");
    Ok(Json(expense))
}

/// DELETE /api/expenses/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if ExpenseRepo::delete(&state.pool, id).await? {
        tracing::info!(expense_id = id, "Expense deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
