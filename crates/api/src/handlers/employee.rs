//! Handlers for the `/employees` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use margin_core::error::CoreError;
use margin_core::types::DbId;
use margin_core::validation::{validate_name, validate_optional_non_negative};
use margin_db::models::employee::{CreateEmployee, Employee, EmployeeFilter, UpdateEmployee};
use margin_db::repositories::EmployeeRepo;

use crate::error::{AppError, AppResult};
use crate::query::{parse_label, EmployeeListParams};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Employee",
        id,
    })
}

/// POST /api/employees
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateEmployee>,
) -> AppResult<(StatusCode, Json<Employee>)> {
    validate_name("name", &input.name)?;
    validate_optional_non_negative("monthly_salary", input.monthly_salary)?;
    validate_optional_non_negative("hourly_rate", input.hourly_rate)?;

    let employee = EmployeeRepo::create(&state.pool, &input).await?;
    tracing::info!(employee_id = employee.id, name = %employee.name, "Employee created");
    Ok((StatusCode::CREATED, Json(employee)))
}

/// GET /api/employees
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<EmployeeListParams>,
) -> AppResult<Json<Vec<Employee>>> {
    let filter = EmployeeFilter {
        status: parse_label(params.status.as_deref())?,
        specialization: parse_label(params.specialization.as_deref())?,
    };
    let employees = EmployeeRepo::list(&state.pool, &filter).await?;
    Ok(Json(employees))
}

/// GET /api/employees/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Employee>> {
    let employee = EmployeeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(employee))
}

/// PUT /api/employees/{id}
///
/// New rates apply to every project on its next read.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEmployee>,
) -> AppResult<Json<Employee>> {
    if let Some(name) = &input.name {
        validate_name("name", name)?;
    }
    validate_optional_non_negative("monthly_salary", input.monthly_salary)?;
    validate_optional_non_negative("hourly_rate", input.hourly_rate)?;

    let employee = EmployeeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(employee_id = id, "Employee updated");
    Ok(Json(employee))
}

/// DELETE /api/employees/{id}
///
/// Removes the employee's allocations too.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if EmployeeRepo::delete(&state.pool, id).await? {
        tracing::info!(employee_id = id, "Employee deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
