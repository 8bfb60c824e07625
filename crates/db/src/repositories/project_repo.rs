//! Repository for the `projects` table.
//!
//! Every read joins `clients` so rows carry `client_name`.

use margin_core::billing::ProjectStatus;
use margin_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, ProjectFilter, UpdateProject};

/// Select list for `projects p JOIN clients c`.
const SELECT: &str = "SELECT p.id, p.client_id, c.name AS client_name, p.name, p.type, p.status,
        p.revenue_earned, p.employee_costs, p.start_date, p.deadline, p.created_at
     FROM projects p
     JOIN clients c ON c.id = p.client_id";

/// Filter predicate shared by the paginated list and its count.
///
/// `$1` search, `$2` type, `$3` status, `$4` start-from, `$5` start-to.
const FILTER: &str = "($1::text IS NULL OR p.name ILIKE '%' || $1 || '%' OR c.name ILIKE '%' || $1 || '%')
       AND ($2::text IS NULL OR p.type = $2)
       AND ($3::text IS NULL OR p.status = $3)
       AND ($4::date IS NULL OR p.start_date >= $4)
       AND ($5::date IS NULL OR p.start_date <= $5)";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row (with client name).
    ///
    /// Status defaults to `Active`, revenue and stored cost to zero and the
    /// start date to today.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let id: (DbId,) = sqlx::query_as(
            "INSERT INTO projects
                (client_id, name, type, status, revenue_earned, employee_costs, start_date, deadline)
             VALUES ($1, $2, $3, COALESCE($4, 'Active'), COALESCE($5, 0), COALESCE($6, 0),
                     COALESCE($7, CURRENT_DATE), $8)
             RETURNING id",
        )
        .bind(input.client_id)
        .bind(input.name.trim())
        .bind(input.billing_type.as_str())
        .bind(input.status.map(ProjectStatus::as_str))
        .bind(input.revenue_earned)
        .bind(input.employee_costs)
        .bind(input.start_date)
        .bind(input.deadline)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id.0)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a project by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("{SELECT} WHERE p.id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of projects matching `filter`, most recently created first.
    pub async fn list_filtered(
        pool: &PgPool,
        filter: &ProjectFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "{SELECT} WHERE {FILTER} ORDER BY p.created_at DESC, p.id DESC LIMIT $6 OFFSET $7"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(filter.search.as_deref())
            .bind(filter.billing_type.map(|t| t.as_str()))
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.start_from)
            .bind(filter.start_to)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of projects matching `filter`.
    pub async fn count_filtered(pool: &PgPool, filter: &ProjectFilter) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM projects p JOIN clients c ON c.id = p.client_id WHERE {FILTER}"
        );
        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(filter.search.as_deref())
            .bind(filter.billing_type.map(|t| t.as_str()))
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.start_from)
            .bind(filter.start_to)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// All projects whose start date falls in the optional inclusive range.
    pub async fn list_started_between(
        pool: &PgPool,
        from: Option<Date>,
        to: Option<Date>,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "{SELECT}
             WHERE ($1::date IS NULL OR p.start_date >= $1)
               AND ($2::date IS NULL OR p.start_date <= $2)
             ORDER BY p.id"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// `deadline` is `Option<Option<_>>`: the outer `Some` sets the column to
    /// the inner value, `Some(None)` clears it.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET
                client_id = COALESCE($2, client_id),
                name = COALESCE($3, name),
                type = COALESCE($4, type),
                status = COALESCE($5, status),
                revenue_earned = COALESCE($6, revenue_earned),
                employee_costs = COALESCE($7, employee_costs),
                start_date = COALESCE($8, start_date),
                deadline = CASE WHEN $9 THEN $10::date ELSE deadline END
             WHERE id = $1",
        )
        .bind(id)
        .bind(input.client_id)
        .bind(input.name.as_deref().map(str::trim))
        .bind(input.billing_type.map(|t| t.as_str()))
        .bind(input.status.map(|s| s.as_str()))
        .bind(input.revenue_earned)
        .bind(input.employee_costs)
        .bind(input.start_date)
        .bind(input.deadline.is_some())
        .bind(input.deadline.flatten())
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    /// Set a project's status. Any status may follow any other.
    ///
    /// Returns `false` if no row with the given `id` exists.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: ProjectStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE projects SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a project and, by cascade, its allocations.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
