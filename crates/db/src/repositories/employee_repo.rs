//! Repository for the `employees` table.

use margin_core::billing::{BillingType, EmployeeStatus};
use margin_core::types::DbId;
use sqlx::PgPool;

use crate::models::employee::{
    CreateEmployee, Employee, EmployeeFilter, EmployeeRateRow, UpdateEmployee,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, role, status, specialization, monthly_salary, hourly_rate, created_at";

/// Provides CRUD operations for employees.
pub struct EmployeeRepo;

impl EmployeeRepo {
    /// Insert a new employee, returning the created row.
    ///
    /// Status defaults to `Active`, specialization to `Fixed Bid` and both
    /// rates to zero.
    pub async fn create(pool: &PgPool, input: &CreateEmployee) -> Result<Employee, sqlx::Error> {
        let query = format!(
            "INSERT INTO employees (name, role, status, specialization, monthly_salary, hourly_rate)
             VALUES ($1, $2, COALESCE($3, 'Active'), COALESCE($4, 'Fixed Bid'),
                     COALESCE($5, 0), COALESCE($6, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(input.name.trim())
            .bind(input.role.trim())
            .bind(input.status.map(EmployeeStatus::as_str))
            .bind(input.specialization.map(BillingType::as_str))
            .bind(input.monthly_salary)
            .bind(input.hourly_rate)
            .fetch_one(pool)
            .await
    }

    /// Find an employee by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE id = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List employees alphabetically, optionally filtered by status and
    /// specialization.
    pub async fn list(pool: &PgPool, filter: &EmployeeFilter) -> Result<Vec<Employee>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM employees
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::text IS NULL OR specialization = $2)
             ORDER BY name ASC, id ASC"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(filter.status.map(EmployeeStatus::as_str))
            .bind(filter.specialization.map(BillingType::as_str))
            .fetch_all(pool)
            .await
    }

    /// Pay rates for the given employee IDs. Unknown IDs are simply absent.
    pub async fn rates_for_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<EmployeeRateRow>, sqlx::Error> {
        sqlx::query_as::<_, EmployeeRateRow>(
            "SELECT id, monthly_salary, hourly_rate FROM employees WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }

    /// Update an employee. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEmployee,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!(
            "UPDATE employees SET
                name = COALESCE($2, name),
                role = COALESCE($3, role),
                status = COALESCE($4, status),
                specialization = COALESCE($5, specialization),
                monthly_salary = COALESCE($6, monthly_salary),
                hourly_rate = COALESCE($7, hourly_rate)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.role.as_deref().map(str::trim))
            .bind(input.status.map(EmployeeStatus::as_str))
            .bind(input.specialization.map(BillingType::as_str))
            .bind(input.monthly_salary)
            .bind(input.hourly_rate)
            .fetch_optional(pool)
            .await
    }

    /// Delete an employee and, by cascade, their allocations.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
