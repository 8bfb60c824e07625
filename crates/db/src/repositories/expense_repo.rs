//! Repository for the `company_expenses` table.

use margin_core::types::DbId;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::expense::{CreateExpense, Expense, ExpenseFilter, UpdateExpense};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, category, amount, date, description, created_at";

/// Filter predicate: `$1` from, `$2` to, `$3` category.
const FILTER: &str = "($1::date IS NULL OR date >= $1)
       AND ($2::date IS NULL OR date <= $2)
       AND ($3::text IS NULL OR category = $3)";

/// Provides CRUD operations and totals for company expenses.
pub struct ExpenseRepo;

impl ExpenseRepo {
    /// Insert a new expense, returning the created row. The date defaults to
    /// today.
    pub async fn create(pool: &PgPool, input: &CreateExpense) -> Result<Expense, sqlx::Error> {
        let query = format!(
            "INSERT INTO company_expenses (category, amount, date, description)
             VALUES ($1, $2, COALESCE($3, CURRENT_DATE), $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(input.category.trim())
            .bind(input.amount)
            .bind(input.date)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// List expenses matching `filter`, newest first.
    pub async fn list(pool: &PgPool, filter: &ExpenseFilter) -> Result<Vec<Expense>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM company_expenses WHERE {FILTER} ORDER BY date DESC, id DESC"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(filter.from)
            .bind(filter.to)
            .bind(filter.category.as_deref())
            .fetch_all(pool)
            .await
    }

    /// Sum of expense amounts matching `filter`; zero when nothing matches.
    pub async fn total(pool: &PgPool, filter: &ExpenseFilter) -> Result<Decimal, sqlx::Error> {
        let query =
            format!("SELECT COALESCE(SUM(amount), 0) FROM company_expenses WHERE {FILTER}");
        let (total,): (Decimal,) = sqlx::query_as(&query)
            .bind(filter.from)
            .bind(filter.to)
            .bind(filter.category.as_deref())
            .fetch_one(pool)
            .await?;
        Ok(total)
    }

    /// Update an expense. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateExpense,
    ) -> Result<Option<Expense>, sqlx::Error> {
        let query = format!(
            "UPDATE company_expenses SET
                category = COALESCE($2, category),
                amount = COALESCE($3, amount),
                date = COALESCE($4, date),
                description = COALESCE($5, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(id)
            .bind(input.category.as_deref().map(str::trim))
            .bind(input.amount)
            .bind(input.date)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete an expense. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM company_expenses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
