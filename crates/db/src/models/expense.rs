//! Company expense model and DTOs.

use margin_core::types::{Date, DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `company_expenses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Expense {
    pub id: DbId,
    pub category: String,
    pub amount: Decimal,
    pub date: Date,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for logging a new expense.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExpense {
    pub category: String,
    pub amount: Decimal,
    /// Defaults to today if omitted.
    pub date: Option<Date>,
    pub description: Option<String>,
}

/// DTO for updating an existing expense. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateExpense {
    pub category: Option<String>,
    pub amount: Option<Decimal>,
    pub date: Option<Date>,
    pub description: Option<String>,
}

/// Filters for the expense list and totals.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Inclusive lower bound on `date`.
    pub from: Option<Date>,
    /// Inclusive upper bound on `date`.
    pub to: Option<Date>,
    pub category: Option<String>,
}
