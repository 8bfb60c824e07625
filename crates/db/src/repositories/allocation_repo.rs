//! Repository for the `resource_allocations` table.

use margin_core::billing::AllocationUnit;
use margin_core::types::{Date, DbId};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::allocation::{Allocation, AllocationWithEmployee, UpsertedAllocation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_id, employee_id, allocation_value, allocation_unit, start_date, end_date, created_at";

/// Provides upsert, listing and deletion for resource allocations.
pub struct AllocationRepo;

impl AllocationRepo {
    /// Assign an employee to a project.
    ///
    /// A second assignment of the same (project, employee) pair updates the
    /// existing row instead of inserting. `inserted` on the result tells the
    /// two cases apart. The start date defaults to today.
    pub async fn upsert(
        pool: &PgPool,
        project_id: DbId,
        employee_id: DbId,
        value: Decimal,
        unit: AllocationUnit,
        start_date: Option<Date>,
        end_date: Option<Date>,
    ) -> Result<UpsertedAllocation, sqlx::Error> {
        let query = format!(
            "INSERT INTO resource_allocations
                (project_id, employee_id, allocation_value, allocation_unit, start_date, end_date)
             VALUES ($1, $2, $3, $4, COALESCE($5, CURRENT_DATE), $6)
             ON CONFLICT ON CONSTRAINT uq_resource_allocations_project_employee DO UPDATE SET
                allocation_value = EXCLUDED.allocation_value,
                allocation_unit = EXCLUDED.allocation_unit,
                start_date = EXCLUDED.start_date,
                end_date = EXCLUDED.end_date
             RETURNING {COLUMNS}, (xmax = 0) AS inserted"
        );
        let row = sqlx::query_as::<_, UpsertedAllocation>(&query)
            .bind(project_id)
            .bind(employee_id)
            .bind(value)
            .bind(unit.as_str())
            .bind(start_date)
            .bind(end_date)
            .fetch_one(pool)
            .await?;

        tracing::debug!(
            allocation_id = row.allocation.id,
            project_id,
            employee_id,
            inserted = row.inserted,
            "Allocation upserted"
        );
        Ok(row)
    }

    /// Find an allocation by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Allocation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM resource_allocations WHERE id = $1");
        sqlx::query_as::<_, Allocation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Allocations of one project with the employee's name, role and rates.
    pub async fn list_for_project_with_employees(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<AllocationWithEmployee>, sqlx::Error> {
        sqlx::query_as::<_, AllocationWithEmployee>(
            "SELECT a.id, a.project_id, a.employee_id, a.allocation_value, a.allocation_unit,
                    a.start_date, a.end_date, a.created_at,
                    e.name AS employee_name, e.role AS employee_role,
                    e.monthly_salary, e.hourly_rate
             FROM resource_allocations a
             JOIN employees e ON e.id = a.employee_id
             WHERE a.project_id = $1
             ORDER BY e.name ASC, a.id ASC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// All allocations belonging to any of the given projects.
    pub async fn list_for_projects(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<Vec<Allocation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM resource_allocations WHERE project_id = ANY($1) ORDER BY id"
        );
        sqlx::query_as::<_, Allocation>(&query)
            .bind(project_ids)
            .fetch_all(pool)
            .await
    }

    /// Number of allocations on a project.
    pub async fn count_for_project(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM resource_allocations WHERE project_id = $1")
                .bind(project_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    /// Delete an allocation. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM resource_allocations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
