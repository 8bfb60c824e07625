//! Resource allocation model and DTOs.

use margin_core::billing::AllocationUnit;
use margin_core::cost::CostAllocation;
use margin_core::types::{Date, DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `resource_allocations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Allocation {
    pub id: DbId,
    pub project_id: DbId,
    pub employee_id: DbId,
    pub allocation_value: Decimal,
    #[sqlx(try_from = "String")]
    pub allocation_unit: AllocationUnit,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub created_at: Timestamp,
}

impl Allocation {
    /// The fields the cost engine reads. The unit is implied by the
    /// project's billing type, which it always matches.
    pub fn cost_inputs(&self) -> CostAllocation {
        CostAllocation {
            employee_id: self.employee_id,
            value: self.allocation_value,
        }
    }
}

/// An allocation joined with the allocated employee's name, role and rates.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AllocationWithEmployee {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub allocation: Allocation,
    pub employee_name: String,
    pub employee_role: String,
    pub monthly_salary: Decimal,
    pub hourly_rate: Decimal,
}

/// Result of an upsert: the row plus whether it was newly inserted.
#[derive(Debug, Clone, FromRow)]
pub struct UpsertedAllocation {
    #[sqlx(flatten)]
    pub allocation: Allocation,
    pub inserted: bool,
}

/// DTO for assigning an employee to a project.
///
/// `unit` defaults to the project's billing model (hours for T&M, percentage
/// otherwise) and is rejected when it names the other unit.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertAllocation {
    #[serde(alias = "employeeId")]
    pub employee_id: DbId,
    #[serde(alias = "allocationPercentage", alias = "allocation_percentage", alias = "value")]
    pub allocation_value: Decimal,
    pub unit: Option<AllocationUnit>,
    /// Defaults to today if omitted.
    #[serde(alias = "startDate")]
    pub start_date: Option<Date>,
    #[serde(alias = "endDate")]
    pub end_date: Option<Date>,
}
