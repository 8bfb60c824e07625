//! Repository for the `expense_categories` table.

use margin_core::types::DbId;
use sqlx::PgPool;

use crate::models::expense_category::{CreateExpenseCategory, ExpenseCategory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, is_default, created_at";

/// Provides listing, creation and deletion of expense categories.
pub struct ExpenseCategoryRepo;

impl ExpenseCategoryRepo {
    /// Insert a custom (non-default) category.
    ///
    /// A duplicate name violates `uq_expense_categories_name`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateExpenseCategory,
    ) -> Result<ExpenseCategory, sqlx::Error> {
        let query = format!(
            "INSERT INTO expense_categories (name, is_default) VALUES ($1, FALSE) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ExpenseCategory>(&query)
            .bind(input.name.trim())
            .fetch_one(pool)
            .await
    }

    /// Find a category by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ExpenseCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM expense_categories WHERE id = $1");
        sqlx::query_as::<_, ExpenseCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List categories: defaults first, then alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<ExpenseCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM expense_categories ORDER BY is_default DESC, name ASC"
        );
        sqlx::query_as::<_, ExpenseCategory>(&query)
            .fetch_all(pool)
            .await
    }

    /// Delete a custom category. Default categories are never removed.
    /// Returns `true` if a row was removed.
    pub async fn delete_custom(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM expense_categories WHERE id = $1 AND is_default = FALSE")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
