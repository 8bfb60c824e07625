use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use margin_core::error::CoreError;
use margin_core::types::DbId;
use margin_core::validation::validate_name;
use margin_db::models::expense_category::{CreateExpenseCategory, ExpenseCategory};
use margin_db::repositories::ExpenseCategoryRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/expense-categories
///
/// Seeded defaults first, then custom categories, each alphabetical.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<ExpenseCategory>>> {
    let categories = ExpenseCategoryRepo::list(&state.pool).await?;
    Ok(Json(categories))
}

/// POST /api/expense-categories
///
/// Names are unique; a duplicate yields 409.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateExpenseCategory>,
) -> AppResult<(StatusCode, Json<ExpenseCategory>)> {
    validate_name("name", &input.name)?;

    let category = ExpenseCategoryRepo::create(&state.pool, &input).await?;
    tracing::info!(category_id = category.id, name = %category.name, "Expense category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// DELETE /api/expense-categories/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let category = ExpenseCategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ExpenseCategory",
            id,
        }))?;

    if category.is_default {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Default category '{}' cannot be deleted",
            category.name
        ))));
    }

    ExpenseCategoryRepo::delete_custom(&state.pool, id).await?;
    tracing::info!(category_id = id, "Expense category deleted");
    Ok(StatusCode::NO_CONTENT)
}
