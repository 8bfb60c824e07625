//! Employee entity model and DTOs.

use margin_core::billing::{BillingType, EmployeeStatus};
use margin_core::cost::EmployeeRates;
use margin_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `employees` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Employee {
    pub id: DbId,
    pub name: String,
    pub role: String,
    #[sqlx(try_from = "String")]
    pub status: EmployeeStatus,
    /// Billing-model affinity. Informational only; allocations to projects of
    /// another billing type are accepted.
    #[sqlx(try_from = "String")]
    pub specialization: BillingType,
    pub monthly_salary: Decimal,
    pub hourly_rate: Decimal,
    pub created_at: Timestamp,
}

/// Just the pay rates, for building the cost engine's employee lookup.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct EmployeeRateRow {
    pub id: DbId,
    pub monthly_salary: Decimal,
    pub hourly_rate: Decimal,
}

impl From<EmployeeRateRow> for (DbId, EmployeeRates) {
    fn from(row: EmployeeRateRow) -> Self {
        (
            row.id,
            EmployeeRates {
                monthly_salary: row.monthly_salary,
                hourly_rate: row.hourly_rate,
            },
        )
    }
}

/// DTO for creating a new employee.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEmployee {
    pub name: String,
    #[serde(default)]
    pub role: String,
    /// Defaults to `Active` if omitted.
    pub status: Option<EmployeeStatus>,
    /// Defaults to `Fixed Bid` if omitted.
    pub specialization: Option<BillingType>,
    #[serde(alias = "monthlySalary")]
    pub monthly_salary: Option<Decimal>,
    #[serde(alias = "hourlyRate")]
    pub hourly_rate: Option<Decimal>,
}

/// DTO for updating an existing employee. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub role: Option<String>,
    pub status: Option<EmployeeStatus>,
    pub specialization: Option<BillingType>,
    #[serde(alias = "monthlySalary")]
    pub monthly_salary: Option<Decimal>,
    #[serde(alias = "hourlyRate")]
    pub hourly_rate: Option<Decimal>,
}

/// Filters for the employee list.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub status: Option<EmployeeStatus>,
    pub specialization: Option<BillingType>,
}
