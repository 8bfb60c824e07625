//! Handler for the company-wide profitability summary.

use axum::extract::{Query, State};
use axum::Json;
use margin_core::dashboard::{summarize, DashboardSummary, ProjectFigures};
use margin_db::models::expense::ExpenseFilter;
use margin_db::repositories::{ExpenseRepo, ProjectRepo};

use crate::error::AppResult;
use crate::handlers::project::{compute_costs, today};
use crate::query::DateRangeParams;
use crate::state::AppState;

/// GET /api/dashboard/summary
///
/// Project totals use computed costs. `startDate` / `endDate` bound projects
/// by start date and expenses by date.
pub async fn summary(
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<Json<DashboardSummary>> {
    let (from, to) = params.bounds()?;

    let projects = ProjectRepo::list_started_between(&state.pool, from, to).await?;
    let costs = compute_costs(&state.pool, &projects, today()).await?;
    let figures: Vec<ProjectFigures> = projects
        .iter()
        .zip(costs)
        .map(|(project, cost)| ProjectFigures {
            billing_type: project.billing_type,
            revenue: project.revenue_earned,
            cost,
        })
        .collect();

    let expense_filter = ExpenseFilter {
        from,
        to,
        category: None,
    };
    let total_expenses = ExpenseRepo::total(&state.pool, &expense_filter).await?;

    let summary = summarize(&figures, total_expenses);
    tracing::debug!(
        projects = figures.len(),
        net_savings = %summary.net_savings,
        "Dashboard summary computed"
    );
    Ok(Json(summary))
}
