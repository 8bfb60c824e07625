//! Project cost and margin engine.
//!
//! Converts a project and its resource allocations into a computed employee
//! cost and margin. The function is pure: the calculation date is an explicit
//! argument and nothing here reads the clock, touches the database or logs.
//!
//! The project's billing type decides how an allocation value is read:
//! estimated hours on a T&M project, percent of monthly capacity on a Fixed
//! Bid or Fixed Value project.
//!
//! Arithmetic saturates at the bounds of [`Decimal`] instead of overflowing,
//! so any type-correct input produces a figure.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::billing::{BillingType, ProjectStatus};
use crate::money::round_money;
use crate::types::{Date, DbId};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Average days per month used to convert elapsed days into months (30.44).
pub const DAYS_PER_MONTH: Decimal = Decimal::from_parts(3044, 0, 0, false, 2);

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The project fields the engine reads.
#[derive(Debug, Clone, PartialEq)]
pub struct CostProject {
    pub billing_type: BillingType,
    pub status: ProjectStatus,
    pub revenue: Decimal,
    /// Manually entered cost, reported as-is when there are no allocations.
    pub stored_cost: Decimal,
    pub start_date: Date,
    pub deadline: Option<Date>,
}

/// One employee's share of a project.
///
/// `value` is hours for T&M projects and a percentage (`50` = half time)
/// for fixed-type projects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostAllocation {
    pub employee_id: DbId,
    pub value: Decimal,
}

/// Pay rates of an employee, keyed by id in the lookup passed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmployeeRates {
    pub monthly_salary: Decimal,
    pub hourly_rate: Decimal,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Cost and margin of a project, both rounded to cents.
///
/// Field names match the project JSON the API augments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectCost {
    #[serde(rename = "employee_costs")]
    pub employee_cost: Decimal,
    pub margin: Decimal,
    /// `false` when the stored cost was passed through unchanged.
    #[serde(rename = "is_calculated_cost")]
    pub is_calculated: bool,
}

impl ProjectCost {
    /// Round the cost, then derive the margin from the rounded cost so that
    /// `margin == revenue - employee_cost` holds exactly on the output
    /// whenever the difference is representable.
    fn new(revenue: Decimal, cost: Decimal, is_calculated: bool) -> Self {
        let employee_cost = round_money(cost);
        Self {
            employee_cost,
            margin: round_money(revenue.saturating_sub(employee_cost)),
            is_calculated,
        }
    }
}

// ---------------------------------------------------------------------------
// Duration
// ---------------------------------------------------------------------------

/// The date fixed-type cost accrues until.
///
/// - Completed with a deadline: the deadline.
/// - Deadline already passed: the deadline.
/// - Otherwise: `as_of`, i.e. cost to date.
pub fn calculation_end_date(status: ProjectStatus, deadline: Option<Date>, as_of: Date) -> Date {
    match deadline {
        Some(deadline) if status == ProjectStatus::Completed => deadline,
        Some(deadline) if deadline < as_of => deadline,
        _ => as_of,
    }
}

/// Elapsed months between two dates, in 30.44-day months, never negative.
///
/// There is no minimum: a project that starts today has a duration of zero.
pub fn duration_in_months(start: Date, end: Date) -> Decimal {
    let days = (end - start).num_days().max(0);
    Decimal::from(days) / DAYS_PER_MONTH
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Compute a project's employee cost and margin.
///
/// With no allocations the stored cost passes through. Otherwise:
///
/// - T&M: the sum of `hours * hourly_rate`, independent of dates;
/// - Fixed Bid / Fixed Value: the monthly burn, the sum of
///   `pct / 100 * monthly_salary`, times the duration in months up to
///   [`calculation_end_date`].
///
/// Allocations whose employee is missing from `employees` contribute nothing.
/// Values are not validated; negative inputs flow through the arithmetic.
pub fn compute_project_cost(
    project: &CostProject,
    allocations: &[CostAllocation],
    employees: &HashMap<DbId, EmployeeRates>,
    as_of: Date,
) -> ProjectCost {
    if allocations.is_empty() {
        return ProjectCost::new(project.revenue, project.stored_cost, false);
    }

    let known = allocations
        .iter()
        .filter_map(|a| employees.get(&a.employee_id).map(|rates| (a.value, rates)));

    let cost = match project.billing_type {
        BillingType::TimeAndMaterials => known.fold(Decimal::ZERO, |total, (hours, rates)| {
            total.saturating_add(hours.saturating_mul(rates.hourly_rate))
        }),
        BillingType::FixedBid | BillingType::FixedValue => {
            let monthly_burn = known.fold(Decimal::ZERO, |burn, (pct, rates)| {
                let share = pct / Decimal::ONE_HUNDRED;
                burn.saturating_add(share.saturating_mul(rates.monthly_salary))
            });
            let end = calculation_end_date(project.status, project.deadline, as_of);
            monthly_burn.saturating_mul(duration_in_months(project.start_date, end))
        }
    };

    ProjectCost::new(project.revenue, cost, true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn project(billing_type: BillingType, start: Date, deadline: Option<Date>) -> CostProject {
        CostProject {
            billing_type,
            status: ProjectStatus::Active,
            revenue: dec!(10000),
            stored_cost: dec!(1234.5),
            start_date: start,
            deadline,
        }
    }

    fn tm(start: Date, deadline: Option<Date>) -> CostProject {
        project(BillingType::TimeAndMaterials, start, deadline)
    }

    fn fixed_bid(start: Date, deadline: Option<Date>) -> CostProject {
        project(BillingType::FixedBid, start, deadline)
    }

    fn alloc(employee_id: DbId, value: Decimal) -> CostAllocation {
        CostAllocation { employee_id, value }
    }

    fn rates(pairs: &[(DbId, Decimal, Decimal)]) -> HashMap<DbId, EmployeeRates> {
        pairs
            .iter()
            .map(|&(id, monthly_salary, hourly_rate)| {
                (
                    id,
                    EmployeeRates {
                        monthly_salary,
                        hourly_rate,
                    },
                )
            })
            .collect()
    }

    // -- pass-through --------------------------------------------------------

    #[test]
    fn empty_allocations_pass_stored_cost_through() {
        for ty in BillingType::ALL {
            let p = project(*ty, date(2025, 1, 1), None);
            let cost = compute_project_cost(&p, &[], &HashMap::new(), date(2025, 6, 1));

            assert!(!cost.is_calculated);
            assert_eq!(cost.employee_cost, dec!(1234.50));
            assert_eq!(cost.margin, dec!(8765.50));
        }
    }

    // -- T&M -----------------------------------------------------------------

    #[test]
    fn hours_times_rate() {
        let p = tm(date(2025, 1, 1), Some(date(2025, 3, 1)));
        let employees = rates(&[(1, dec!(5000), dec!(100))]);
        let cost = compute_project_cost(&p, &[alloc(1, dec!(10))], &employees, date(2025, 2, 1));

        assert!(cost.is_calculated);
        assert_eq!(cost.employee_cost.to_string(), "1000.00");
        assert_eq!(cost.margin.to_string(), "9000.00");
    }

    #[test]
    fn hourly_cost_ignores_dates() {
        let employees = rates(&[(1, dec!(9000), dec!(80)), (2, dec!(9000), dec!(120.5))]);
        let allocs = [alloc(1, dec!(12)), alloc(2, dec!(3))];
        let expected = dec!(12) * dec!(80) + dec!(3) * dec!(120.5);

        let short = tm(date(2025, 1, 1), Some(date(2025, 1, 2)));
        let long = tm(date(2020, 1, 1), None);
        let backwards = tm(date(2025, 6, 1), Some(date(2025, 1, 1)));

        for p in [short, long, backwards] {
            let cost = compute_project_cost(&p, &allocs, &employees, date(2025, 9, 1));
            assert_eq!(cost.employee_cost, expected);
        }
    }

    #[test]
    fn completed_tm_cost_is_independent_of_deadline() {
        let start = date(2025, 1, 1);
        let employees = rates(&[(1, dec!(5000), dec!(100))]);

        let costs: Vec<Decimal> = [30, 364]
            .into_iter()
            .map(|days| {
                let mut p = tm(start, Some(start + chrono::Duration::days(days)));
                p.status = ProjectStatus::Completed;
                compute_project_cost(&p, &[alloc(1, dec!(10))], &employees, start)
                    .employee_cost
            })
            .collect();

        assert_eq!(costs, [dec!(1000.00), dec!(1000.00)]);
    }

    // -- fixed-type duration -------------------------------------------------

    #[test]
    fn fixed_bid_scales_with_duration() {
        let start = date(2025, 1, 1);
        let deadline = start + chrono::Duration::days(60);
        let mut p = fixed_bid(start, Some(deadline));
        p.status = ProjectStatus::Completed;
        let employees = rates(&[(1, dec!(5000), dec!(999))]);

        let cost = compute_project_cost(&p, &[alloc(1, dec!(50))], &employees, date(2025, 1, 15));

        // 5000 * 0.5 * 60 / 30.44
        assert_eq!(cost.employee_cost, dec!(4927.73));
    }

    #[test]
    fn fixed_value_costs_like_fixed_bid() {
        let start = date(2025, 1, 1);
        let deadline = start + chrono::Duration::days(60);
        let employees = rates(&[(1, dec!(5000), dec!(999)), (2, dec!(3044), dec!(999))]);
        let allocs = [alloc(1, dec!(50)), alloc(2, dec!(25))];

        let mut value = project(BillingType::FixedValue, start, Some(deadline));
        value.status = ProjectStatus::Completed;
        let mut bid = fixed_bid(start, Some(deadline));
        bid.status = ProjectStatus::Completed;

        let value_cost = compute_project_cost(&value, &allocs, &employees, start);
        let bid_cost = compute_project_cost(&bid, &allocs, &employees, start);

        // (2500 + 761) * 60 / 30.44
        assert_eq!(value_cost.employee_cost, dec!(6427.73));
        assert_eq!(value_cost, bid_cost);
    }

    #[test]
    fn same_allocation_reads_differently_per_billing_type() {
        let start = date(2025, 1, 1);
        let deadline = start + chrono::Duration::days(30);
        let employees = rates(&[(1, dec!(3044), dec!(100))]);
        let allocs = [alloc(1, dec!(10))];

        let mut hourly = tm(start, Some(deadline));
        hourly.status = ProjectStatus::Completed;
        let mut fixed = fixed_bid(start, Some(deadline));
        fixed.status = ProjectStatus::Completed;

        let hourly_cost = compute_project_cost(&hourly, &allocs, &employees, start);
        let fixed_cost = compute_project_cost(&fixed, &allocs, &employees, start);

        // 10 h * 100 vs 10% of 3044 over 30 days.
        assert_eq!(hourly_cost.employee_cost, dec!(1000.00));
        assert_eq!(fixed_cost.employee_cost, dec!(300.00));
    }

    #[test]
    fn ongoing_project_accrues_cost_to_date() {
        let start = date(2025, 1, 1);
        let as_of = start + chrono::Duration::days(30);
        let p = fixed_bid(start, Some(date(2025, 12, 31)));
        let employees = rates(&[(1, dec!(3044), dec!(0))]);

        let cost = compute_project_cost(&p, &[alloc(1, dec!(100))], &employees, as_of);

        // 3044 * 30 / 30.44
        assert_eq!(cost.employee_cost, dec!(3000.00));
    }

    #[test]
    fn passed_deadline_caps_duration() {
        let start = date(2025, 1, 1);
        let deadline = start + chrono::Duration::days(10);
        let p = fixed_bid(start, Some(deadline));
        let employees = rates(&[(1, dec!(3044), dec!(0))]);

        let cost = compute_project_cost(&p, &[alloc(1, dec!(100))], &employees, date(2026, 1, 1));

        assert_eq!(cost.employee_cost, dec!(1000.00));
    }

    #[test]
    fn completed_project_uses_future_deadline() {
        let start = date(2025, 1, 1);
        let deadline = start + chrono::Duration::days(20);
        let mut p = fixed_bid(start, Some(deadline));
        p.status = ProjectStatus::Completed;
        let employees = rates(&[(1, dec!(3044), dec!(0))]);

        let cost = compute_project_cost(&p, &[alloc(1, dec!(100))], &employees, start);

        assert_eq!(cost.employee_cost, dec!(2000.00));
    }

    #[test]
    fn no_minimum_duration() {
        let today = date(2025, 5, 5);
        let p = fixed_bid(today, None);
        let employees = rates(&[(1, dec!(9000), dec!(0))]);

        let cost = compute_project_cost(&p, &[alloc(1, dec!(100))], &employees, today);

        assert!(cost.is_calculated);
        assert_eq!(cost.employee_cost, dec!(0.00));
        assert_eq!(cost.margin, dec!(10000.00));
    }

    #[test]
    fn deadline_before_start_clamps_to_zero() {
        let p = fixed_bid(date(2025, 6, 1), Some(date(2025, 1, 1)));
        let employees = rates(&[(1, dec!(5000), dec!(0))]);

        let cost = compute_project_cost(&p, &[alloc(1, dec!(100))], &employees, date(2025, 9, 1));

        assert_eq!(cost.employee_cost, Decimal::ZERO);
        assert!(!cost.employee_cost.is_sign_negative());
    }

    #[test]
    fn future_start_accrues_nothing_yet() {
        let p = fixed_bid(date(2026, 1, 1), None);
        let employees = rates(&[(1, dec!(5000), dec!(0))]);

        let cost = compute_project_cost(&p, &[alloc(1, dec!(100))], &employees, date(2025, 1, 1));

        assert_eq!(cost.employee_cost, dec!(0.00));
    }

    // -- defaults and edge cases ---------------------------------------------

    #[test]
    fn unknown_employee_contributes_zero() {
        let p = tm(date(2025, 1, 1), None);
        let employees = rates(&[(1, dec!(0), dec!(50))]);
        let allocs = [alloc(1, dec!(4)), alloc(99, dec!(1000))];

        let cost = compute_project_cost(&p, &allocs, &employees, date(2025, 2, 1));

        assert!(cost.is_calculated);
        assert_eq!(cost.employee_cost, dec!(200.00));
    }

    #[test]
    fn only_unknown_employees_still_counts_as_calculated() {
        let p = tm(date(2025, 1, 1), None);
        let cost = compute_project_cost(&p, &[alloc(7, dec!(10))], &HashMap::new(), date(2025, 2, 1));

        assert!(cost.is_calculated);
        assert_eq!(cost.employee_cost, dec!(0.00));
        assert_eq!(cost.margin, dec!(10000.00));
    }

    #[test]
    fn negative_values_propagate() {
        let p = tm(date(2025, 1, 1), None);
        let employees = rates(&[(1, dec!(0), dec!(100))]);

        let cost = compute_project_cost(&p, &[alloc(1, dec!(-2))], &employees, date(2025, 2, 1));

        assert_eq!(cost.employee_cost, dec!(-200.00));
        assert_eq!(cost.margin, dec!(10200.00));
    }

    #[test]
    fn overflowing_hours_saturate() {
        let p = tm(date(2025, 1, 1), None);
        let employees = rates(&[(1, dec!(0), dec!(100)), (2, dec!(0), dec!(100))]);
        let allocs = [alloc(1, Decimal::MAX), alloc(2, Decimal::MAX)];

        let cost = compute_project_cost(&p, &allocs, &employees, date(2025, 2, 1));

        assert!(cost.employee_cost > Decimal::MAX / Decimal::TEN);
        assert!(cost.margin.is_sign_negative());
    }

    #[test]
    fn overflowing_burn_saturates() {
        let start = date(2000, 1, 1);
        let p = fixed_bid(start, None);
        let employees = rates(&[(1, Decimal::MAX, dec!(0))]);

        let cost = compute_project_cost(&p, &[alloc(1, Decimal::MAX)], &employees, date(2025, 1, 1));

        assert!(cost.employee_cost > Decimal::MAX / Decimal::TEN);
    }

    #[test]
    fn extreme_negative_values_saturate() {
        let mut p = tm(date(2025, 1, 1), None);
        p.revenue = Decimal::MAX;
        let employees = rates(&[(1, dec!(0), Decimal::MAX)]);

        let cost = compute_project_cost(&p, &[alloc(1, Decimal::MIN)], &employees, date(2025, 2, 1));

        assert!(cost.employee_cost < Decimal::MIN / Decimal::TEN);
        assert!(cost.margin > Decimal::MAX / Decimal::TEN);
    }

    // -- properties ----------------------------------------------------------

    #[test]
    fn raising_one_allocation_never_lowers_cost() {
        let start = date(2025, 1, 1);
        let employees = rates(&[(1, dec!(4000), dec!(40)), (2, dec!(6000), dec!(60))]);
        let as_of = date(2025, 2, 15);

        for ty in BillingType::ALL {
            let p = project(*ty, start, Some(start + chrono::Duration::days(90)));
            let mut previous = Decimal::MIN;
            for step in 0..20 {
                let v = Decimal::from(step * 5);
                let allocs = [alloc(1, v), alloc(2, dec!(25))];
                let cost = compute_project_cost(&p, &allocs, &employees, as_of).employee_cost;
                assert!(cost >= previous, "{ty} cost dropped at step {step}");
                previous = cost;
            }
        }
    }

    #[test]
    fn margin_identity_holds_on_every_path() {
        let start = date(2025, 1, 1);
        let employees = rates(&[(1, dec!(4321.99), dec!(33.33))]);
        let cases: Vec<(CostProject, Vec<CostAllocation>)> = vec![
            (tm(start, None), vec![]),
            (tm(start, None), vec![alloc(1, dec!(7.5))]),
            (
                fixed_bid(start, Some(start + chrono::Duration::days(45))),
                vec![alloc(1, dec!(33.3))],
            ),
        ];

        for (p, allocs) in cases {
            let cost = compute_project_cost(&p, &allocs, &employees, date(2025, 3, 3));
            assert_eq!(cost.margin, p.revenue - cost.employee_cost);
        }
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let start = date(2025, 1, 1);
        let p = fixed_bid(start, Some(start + chrono::Duration::days(77)));
        let employees = rates(&[(1, dec!(7000), dec!(55))]);
        let allocs = [alloc(1, dec!(40))];

        let a = compute_project_cost(&p, &allocs, &employees, date(2025, 2, 2));
        let b = compute_project_cost(&p, &allocs, &employees, date(2025, 2, 2));
        assert_eq!(a, b);
    }

    // -- helpers -------------------------------------------------------------

    #[test]
    fn end_date_rules() {
        let as_of = date(2025, 6, 1);
        let past = date(2025, 5, 1);
        let future = date(2025, 7, 1);

        assert_eq!(calculation_end_date(ProjectStatus::Completed, Some(future), as_of), future);
        assert_eq!(calculation_end_date(ProjectStatus::Active, Some(past), as_of), past);
        assert_eq!(calculation_end_date(ProjectStatus::Active, Some(future), as_of), as_of);
        assert_eq!(calculation_end_date(ProjectStatus::Completed, None, as_of), as_of);
        assert_eq!(calculation_end_date(ProjectStatus::OnHold, None, as_of), as_of);
    }

    #[test]
    fn duration_is_days_over_average_month() {
        let start = date(2025, 1, 1);
        assert_eq!(duration_in_months(start, start), Decimal::ZERO);
        assert_eq!(
            duration_in_months(start, start + chrono::Duration::days(3044)),
            dec!(100)
        );
        assert_eq!(duration_in_months(start, date(2024, 1, 1)), Decimal::ZERO);
    }
}
