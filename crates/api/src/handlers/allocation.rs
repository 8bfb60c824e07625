//! Handlers for resource allocations, nested under
//! `/projects/{id}/allocations`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use margin_core::error::CoreError;
use margin_core::types::DbId;
use margin_core::validation::resolve_allocation_unit;
use margin_db::models::allocation::{Allocation, AllocationWithEmployee, UpsertAllocation};
use margin_db::repositories::AllocationRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::project::ensure_project_exists;
use crate::state::AppState;

/// GET /api/projects/{id}/allocations
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<AllocationWithEmployee>>> {
    ensure_project_exists(&state.pool, project_id).await?;
    let rows = AllocationRepo::list_for_project_with_employees(&state.pool, project_id).await?;
    Ok(Json(rows))
}

/// POST /api/projects/{id}/allocations
///
/// Assigns an employee to the project. Re-assigning the same employee
/// replaces the existing allocation: 201 when a row was created, 200 when an
/// existing one was updated. The unit follows the project's billing type; an
/// explicit unit naming the other one is a 400. The employee's
/// specialization is not checked.
pub async fn upsert(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<UpsertAllocation>,
) -> AppResult<(StatusCode, Json<Allocation>)> {
    let project = ensure_project_exists(&state.pool, project_id).await?;
    let unit = resolve_allocation_unit(project.billing_type, input.unit)?;

    let result = AllocationRepo::upsert(
        &state.pool,
        project_id,
        input.employee_id,
        input.allocation_value,
        unit,
        input.start_date,
        input.end_date,
    )
    .await?;

    tracing::info!(
        allocation_id = result.allocation.id,
        project_id,
        employee_id = input.employee_id,
        unit = %unit,
        value = %input.allocation_value,
        inserted = result.inserted,
        "Allocation saved"
    );

    let status = if result.inserted {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(result.allocation)))
}

/// DELETE /api/projects/{id}/allocations/{allocation_id}
///
/// 404 unless the allocation exists and belongs to the project in the path.
pub async fn delete(
    State(state): State<AppState>,
    Path((project_id, allocation_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let belongs = AllocationRepo::find_by_id(&state.pool, allocation_id)
        .await?
        .is_some_and(|a| a.project_id == project_id);
    if !belongs {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Allocation",
            id: allocation_id,
        }));
    }

    AllocationRepo::delete(&state.pool, allocation_id).await?;
    tracing::info!(allocation_id, project_id, "Allocation deleted");
    Ok(StatusCode::NO_CONTENT)
}
