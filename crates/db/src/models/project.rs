//! Project entity model and DTOs.

use margin_core::billing::{BillingType, ProjectStatus};
use margin_core::cost::CostProject;
use margin_core::types::{Date, DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::deserialize_present;

/// A project row joined with its client's name.
///
/// `employee_costs` is the manually entered cost. The reported cost comes
/// from the cost engine and only equals this column when the project has no
/// allocations.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub client_id: DbId,
    pub client_name: String,
    pub name: String,
    #[sqlx(rename = "type", try_from = "String")]
    #[serde(rename = "type")]
    pub billing_type: BillingType,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    pub revenue_earned: Decimal,
    pub employee_costs: Decimal,
    pub start_date: Date,
    pub deadline: Option<Date>,
    pub created_at: Timestamp,
}

impl Project {
    /// The fields the cost engine reads.
    pub fn cost_inputs(&self) -> CostProject {
        CostProject {
            billing_type: self.billing_type,
            status: self.status,
            revenue: self.revenue_earned,
            stored_cost: self.employee_costs,
            start_date: self.start_date,
            deadline: self.deadline,
        }
    }
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    #[serde(alias = "clientId")]
    pub client_id: DbId,
    pub name: String,
    #[serde(rename = "type")]
    pub billing_type: BillingType,
    /// Defaults to `Active` if omitted.
    pub status: Option<ProjectStatus>,
    #[serde(alias = "revenue")]
    pub revenue_earned: Option<Decimal>,
    #[serde(alias = "costs")]
    pub employee_costs: Option<Decimal>,
    /// Defaults to today if omitted.
    #[serde(alias = "startDate")]
    pub start_date: Option<Date>,
    pub deadline: Option<Date>,
}

/// DTO for updating an existing project. All fields are optional.
///
/// `deadline` distinguishes an absent key (keep) from an explicit `null`
/// (clear).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    #[serde(alias = "clientId")]
    pub client_id: Option<DbId>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub billing_type: Option<BillingType>,
    pub status: Option<ProjectStatus>,
    #[serde(alias = "revenue")]
    pub revenue_earned: Option<Decimal>,
    #[serde(alias = "costs")]
    pub employee_costs: Option<Decimal>,
    #[serde(alias = "startDate")]
    pub start_date: Option<Date>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub deadline: Option<Option<Date>>,
}

/// Filters for the paginated project list.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    /// Case-insensitive substring of the project or client name.
    pub search: Option<String>,
    pub billing_type: Option<BillingType>,
    pub status: Option<ProjectStatus>,
    /// Inclusive lower bound on `start_date`.
    pub start_from: Option<Date>,
    /// Inclusive upper bound on `start_date`.
    pub start_to: Option<Date>,
}
