//! Handlers for the `/projects` resource.
//!
//! Every project leaving these handlers carries its cost as computed by
//! [`compute_project_cost`] on the current date. Nothing computed is stored.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use margin_core::billing::{AllocationUnit, BillingType, ProjectStatus};
use margin_core::cost::{compute_project_cost, CostAllocation, CostProject, EmployeeRates, ProjectCost};
use margin_core::error::CoreError;
use margin_core::pagination::{
    clamp_limit, clamp_page, page_offset, Pagination, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use margin_core::types::{Date, DbId, Timestamp};
use margin_core::validation::{
    resolve_allocation_unit, validate_name, validate_optional_non_negative,
};
use margin_db::models::project::{CreateProject, Project, ProjectFilter, UpdateProject};
use margin_db::repositories::{AllocationRepo, EmployeeRepo, ProjectRepo};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::query::{date_bounds, non_empty, parse_label, ProjectListParams};
use crate::response::PaginatedResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response and request shapes
// ---------------------------------------------------------------------------

/// A project as returned by the API: the stored row with `employee_costs`
/// replaced by the computed cost, plus `margin` and `is_calculated_cost`.
#[derive(Debug, Serialize)]
pub struct ProjectView {
    pub id: DbId,
    pub client_id: DbId,
    pub client_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub billing_type: BillingType,
    pub status: ProjectStatus,
    pub revenue_earned: Decimal,
    pub start_date: Date,
    pub deadline: Option<Date>,
    pub created_at: Timestamp,
    #[serde(flatten)]
    pub cost: ProjectCost,
}

impl ProjectView {
    pub fn new(project: Project, cost: ProjectCost) -> Self {
        Self {
            id: project.id,
            client_id: project.client_id,
            client_name: project.client_name,
            name: project.name,
            billing_type: project.billing_type,
            status: project.status,
            revenue_earned: project.revenue_earned,
            start_date: project.start_date,
            deadline: project.deadline,
            created_at: project.created_at,
            cost,
        }
    }
}

/// Body of `PATCH /projects/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// One hypothetical allocation in a cost preview.
#[derive(Debug, Deserialize)]
pub struct PreviewAllocation {
    #[serde(alias = "employeeId")]
    pub employee_id: DbId,
    #[serde(alias = "allocation_value", alias = "allocationPercentage")]
    pub value: Decimal,
    /// Must match the billing type when given.
    pub unit: Option<AllocationUnit>,
}

/// Body of `POST /projects/cost-preview`: an unsaved project and its
/// allocations, costed against the current employee rates.
#[derive(Debug, Deserialize)]
pub struct CostPreviewRequest {
    #[serde(rename = "type")]
    pub billing_type: BillingType,
    pub status: Option<ProjectStatus>,
    #[serde(alias = "revenue")]
    pub revenue_earned: Option<Decimal>,
    #[serde(alias = "costs")]
    pub employee_costs: Option<Decimal>,
    #[serde(alias = "startDate")]
    pub start_date: Option<Date>,
    pub deadline: Option<Date>,
    #[serde(default)]
    pub allocations: Vec<PreviewAllocation>,
}

// ---------------------------------------------------------------------------
// Costing
// ---------------------------------------------------------------------------

/// The calculation date used for every read.
pub(crate) fn today() -> Date {
    chrono::Utc::now().date_naive()
}

/// Employee rates keyed by id, for the given employees.
async fn load_rates(pool: &PgPool, ids: &[DbId]) -> AppResult<HashMap<DbId, EmployeeRates>> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = EmployeeRepo::rates_for_ids(pool, &ids).await?;
    Ok(rows.into_iter().map(<(DbId, EmployeeRates)>::from).collect())
}

/// Compute the cost of each project, in input order.
///
/// Loads the allocations of all projects and the rates of every allocated
/// employee in two queries, then runs the engine per project.
pub(crate) async fn compute_costs(
    pool: &PgPool,
    projects: &[Project],
    as_of: Date,
) -> AppResult<Vec<ProjectCost>> {
    if projects.is_empty() {
        return Ok(Vec::new());
    }

    let project_ids: Vec<DbId> = projects.iter().map(|p| p.id).collect();
    let allocations = AllocationRepo::list_for_projects(pool, &project_ids).await?;

    let employee_ids: Vec<DbId> = allocations.iter().map(|a| a.employee_id).collect();
    let rates = load_rates(pool, &employee_ids).await?;

    let mut by_project: HashMap<DbId, Vec<CostAllocation>> = HashMap::new();
    for allocation in &allocations {
        by_project
            .entry(allocation.project_id)
            .or_default()
            .push(allocation.cost_inputs());
    }

    Ok(projects
        .iter()
        .map(|project| {
            let allocs = by_project.get(&project.id).map_or(&[][..], Vec::as_slice);
            compute_project_cost(&project.cost_inputs(), allocs, &rates, as_of)
        })
        .collect())
}

async fn view_of(pool: &PgPool, project: Project) -> AppResult<ProjectView> {
    let cost = compute_costs(pool, std::slice::from_ref(&project), today())
        .await?
        .pop()
        .ok_or_else(|| CoreError::Internal("cost engine returned no result".into()))?;
    Ok(ProjectView::new(project, cost))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}

/// Verify that a project exists, returning the full row.
pub(crate) async fn ensure_project_exists(pool: &PgPool, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<ProjectView>)> {
    validate_name("name", &input.name)?;
    validate_optional_non_negative("revenue_earned", input.revenue_earned)?;
    validate_optional_non_negative("employee_costs", input.employee_costs)?;

    let project = ProjectRepo::create(&state.pool, &input).await?;
    tracing::info!(
        project_id = project.id,
        client_id = project.client_id,
        billing_type = %project.billing_type,
        "Project created"
    );

    let view = view_of(&state.pool, project).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/projects
///
/// Paginated, newest first. Filters: `search` (project or client name),
/// `type`, `status`, `startDate` / `endDate` (on the project start date).
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ProjectListParams>,
) -> AppResult<Json<PaginatedResponse<ProjectView>>> {
    let (start_from, start_to) = date_bounds(params.start_date, params.end_date)?;
    let filter = ProjectFilter {
        search: non_empty(params.search.as_deref()),
        billing_type: parse_label(params.billing_type.as_deref())?,
        status: parse_label(params.status.as_deref())?,
        start_from,
        start_to,
    };

    let page = clamp_page(params.page);
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);

    let total = ProjectRepo::count_filtered(&state.pool, &filter).await?;
    let projects =
        ProjectRepo::list_filtered(&state.pool, &filter, limit, page_offset(page, limit)).await?;

    let costs = compute_costs(&state.pool, &projects, today()).await?;
    let data = projects
        .into_iter()
        .zip(costs)
        .map(|(project, cost)| ProjectView::new(project, cost))
        .collect();

    Ok(Json(PaginatedResponse {
        data,
        pagination: Pagination::new(page, limit, total),
    }))
}

/// GET /api/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectView>> {
    let project = ensure_project_exists(&state.pool, id).await?;
    Ok(Json(view_of(&state.pool, project).await?))
}

/// Refuse to move a project between T&M and a fixed type while it has
/// allocations: their stored values are in the old type's unit.
async fn ensure_billing_change_allowed(
    pool: &PgPool,
    project: &Project,
    new_type: BillingType,
) -> AppResult<()> {
    if project.billing_type.default_allocation_unit() == new_type.default_allocation_unit() {
        return Ok(());
    }
    let allocations = AllocationRepo::count_for_project(pool, project.id).await?;
    if allocations > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Project {} has {allocations} allocation(s) measured in {}; remove them before \
             changing the billing type from {} to {new_type}",
            project.id,
            project.billing_type.default_allocation_unit(),
            project.billing_type,
        ))));
    }
    Ok(())
}

/// PUT /api/projects/{id}
///
/// Partial update. A billing type change that would switch the allocation
/// unit is refused with 409 while the project has allocations. An explicit
/// `"deadline": null` clears the deadline.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<ProjectView>> {
    if let Some(name) = &input.name {
        validate_name("name", name)?;
    }
    validate_optional_non_negative("revenue_earned", input.revenue_earned)?;
    validate_optional_non_negative("employee_costs", input.employee_costs)?;

    if let Some(new_type) = input.billing_type {
        let current = ensure_project_exists(&state.pool, id).await?;
        ensure_billing_change_allowed(&state.pool, &current, new_type).await?;
    }

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(project_id = id, "Project updated");

    Ok(Json(view_of(&state.pool, project).await?))
}

/// PATCH /api/projects/{id}/status
///
/// Any status may follow any other.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StatusUpdate>,
) -> AppResult<Json<ProjectView>> {
    let status: ProjectStatus = input.status.trim().parse()?;

    if !ProjectRepo::update_status(&state.pool, id, status).await? {
        return Err(not_found(id));
    }
    tracing::info!(project_id = id, status = %status, "Project status changed");

    let project = ensure_project_exists(&state.pool, id).await?;
    Ok(Json(view_of(&state.pool, project).await?))
}

/// DELETE /api/projects/{id}
///
/// Removes the project's allocations too.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if ProjectRepo::delete(&state.pool, id).await? {
        tracing::info!(project_id = id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// POST /api/projects/cost-preview
///
/// Runs the same engine as the stored-project path on unsaved input, so the
/// preview and the persisted figure always agree.
pub async fn cost_preview(
    State(state): State<AppState>,
    Json(input): Json<CostPreviewRequest>,
) -> AppResult<Json<ProjectCost>> {
    validate_optional_non_negative("revenue_earned", input.revenue_earned)?;
    validate_optional_non_negative("employee_costs", input.employee_costs)?;

    let as_of = today();
    let project = CostProject {
        billing_type: input.billing_type,
        status: input.status.unwrap_or(ProjectStatus::Active),
        revenue: input.revenue_earned.unwrap_or_default(),
        stored_cost: input.employee_costs.unwrap_or_default(),
        start_date: input.start_date.unwrap_or(as_of),
        deadline: input.deadline,
    };

    let allocations = input
        .allocations
        .iter()
        .map(|a| {
            resolve_allocation_unit(input.billing_type, a.unit)?;
            Ok(CostAllocation {
                employee_id: a.employee_id,
                value: a.value,
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    let employee_ids: Vec<DbId> = allocations.iter().map(|a| a.employee_id).collect();
    let rates = load_rates(&state.pool, &employee_ids).await?;

    Ok(Json(compute_project_cost(&project, &allocations, &rates, as_of)))
}
