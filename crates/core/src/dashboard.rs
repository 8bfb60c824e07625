//! Company-wide profitability rollup (revenue, cost, margin, net savings).

use rust_decimal::Decimal;
use serde::Serialize;

use crate::billing::BillingType;
use crate::cost::ProjectCost;
use crate::money::round_money;

/// One project's contribution to the rollup.
#[derive(Debug, Clone, Copy)]
pub struct ProjectFigures {
    pub billing_type: BillingType,
    pub revenue: Decimal,
    pub cost: ProjectCost,
}

/// Totals for a single billing type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeBreakdown {
    #[serde(rename = "type")]
    pub billing_type: BillingType,
    pub count: i64,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub margin: Decimal,
}

/// Response body of the dashboard summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_revenue: Decimal,
    pub total_project_costs: Decimal,
    pub total_margin: Decimal,
    pub total_company_expenses: Decimal,
    /// Total margin minus company expenses.
    pub net_savings: Decimal,
    /// Net savings as a percentage of revenue; zero when there is no revenue.
    pub savings_rate: Decimal,
    pub process_type_breakdown: Vec<TypeBreakdown>,
}

/// Aggregate computed project costs and company expenses.
///
/// Costs come from the cost engine, so projects with allocations contribute
/// their computed cost rather than the stored column. The breakdown only
/// lists billing types with at least one project, in [`BillingType::ALL`]
/// order.
pub fn summarize(projects: &[ProjectFigures], total_expenses: Decimal) -> DashboardSummary {
    let process_type_breakdown: Vec<TypeBreakdown> = BillingType::ALL
        .iter()
        .filter_map(|&ty| {
            let mut count = 0;
            let mut revenue = Decimal::ZERO;
            let mut cost = Decimal::ZERO;
            for p in projects.iter().filter(|p| p.billing_type == ty) {
                count += 1;
                revenue = revenue.saturating_add(p.revenue);
                cost = cost.saturating_add(p.cost.employee_cost);
            }
            (count > 0).then(|| TypeBreakdown {
                billing_type: ty,
                count,
                revenue: round_money(revenue),
                cost: round_money(cost),
                margin: round_money(revenue.saturating_sub(cost)),
            })
        })
        .collect();

    let total_revenue = sum(projects.iter().map(|p| p.revenue));
    let total_cost = sum(projects.iter().map(|p| p.cost.employee_cost));
    let total_margin = total_revenue.saturating_sub(total_cost);
    let net_savings = total_margin.saturating_sub(total_expenses);

    let savings_rate = if total_revenue > Decimal::ZERO {
        net_savings
            .checked_div(total_revenue)
            .map_or(Decimal::ZERO, |ratio| ratio.saturating_mul(Decimal::ONE_HUNDRED))
    } else {
        Decimal::ZERO
    };

    DashboardSummary {
        total_revenue: round_money(total_revenue),
        total_project_costs: round_money(total_cost),
        total_margin: round_money(total_margin),
        total_company_expenses: round_money(total_expenses),
        net_savings: round_money(net_savings),
        savings_rate: round_money(savings_rate),
        process_type_breakdown,
    }
}

fn sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, Decimal::saturating_add)
}
