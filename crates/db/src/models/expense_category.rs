//! Expense category model and DTOs.

use margin_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `expense_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExpenseCategory {
    pub id: DbId,
    pub name: String,
    /// Seeded categories; these cannot be deleted.
    pub is_default: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a custom category.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExpenseCategory {
    pub name: String,
}
