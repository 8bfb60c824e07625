//! Handler error type and its JSON rendering.
//!
//! Every failed request answers with `{"error": <message>, "code": <CODE>}`.
//! Database failures are translated through the constraint names declared in
//! the initial migration, so a duplicate category or a dangling employee id
//! reads as a client error instead of a 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use margin_core::error::CoreError;
use serde::Serialize;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// JSON body of an error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl ErrorBody {
    fn new(code: &'static str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }

    fn internal() -> Self {
        Self::new("INTERNAL_ERROR", INTERNAL_MESSAGE)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Core(err) => core_failure(err),
            AppError::Database(err) => database_failure(err),
        };
        (status, Json(body)).into_response()
    }
}

fn core_failure(err: &CoreError) -> (StatusCode, ErrorBody) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            ErrorBody::new("NOT_FOUND", format!("{entity} with id {id} not found")),
        ),
        CoreError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            ErrorBody::new("VALIDATION_ERROR", msg.as_str()),
        ),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, ErrorBody::new("CONFLICT", msg.as_str())),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal error");
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
        }
    }
}

/// Postgres SQLSTATE codes the API answers with a client error.
mod sqlstate {
    pub const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";
    pub const FOREIGN_KEY_VIOLATION: &str = "23503";
    pub const UNIQUE_VIOLATION: &str = "23505";
    pub const CHECK_VIOLATION: &str = "23514";
}

/// Human-readable text for the constraints declared in the schema.
fn constraint_message(constraint: &str) -> Option<&'static str> {
    Some(match constraint {
        "uq_resource_allocations_project_employee" => {
            "This employee is already allocated to the project"
        }
        "uq_expense_categories_name" => "An expense category with this name already exists",
        "projects_client_id_fkey" => "Referenced client does not exist",
        "resource_allocations_employee_id_fkey" => "Referenced employee does not exist",
        "resource_allocations_project_id_fkey" => "Referenced project does not exist",
        "ck_projects_revenue_non_negative" => "revenue_earned must be zero or greater",
        "ck_company_expenses_amount_non_negative" => "amount must be zero or greater",
        _ => return None,
    })
}

/// Map a sqlx error onto a status and body.
///
/// `uq_*` unique violations are 409, foreign key and check violations and
/// amounts too large for their `NUMERIC` column are 400, a missing row is
/// 404. Anything else is logged and reported as an opaque 500.
fn database_failure(err: &sqlx::Error) -> (StatusCode, ErrorBody) {
    let db_err = match err {
        sqlx::Error::RowNotFound => {
            return (
                StatusCode::NOT_FOUND,
                ErrorBody::new("NOT_FOUND", "Resource not found"),
            )
        }
        sqlx::Error::Database(db_err) => db_err,
        other => {
            tracing::error!(error = %other, "Database error");
            return (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal());
        }
    };

    let constraint = db_err.constraint().unwrap_or_default();
    let message = |fallback: String| {
        constraint_message(constraint).map_or(fallback, str::to_string)
    };

    match db_err.code().as_deref() {
        Some(sqlstate::UNIQUE_VIOLATION) if constraint.starts_with("uq_") => (
            StatusCode::CONFLICT,
            ErrorBody::new("CONFLICT", message(format!("Duplicate value violates {constraint}"))),
        ),
        Some(sqlstate::FOREIGN_KEY_VIOLATION) => (
            StatusCode::BAD_REQUEST,
            ErrorBody::new(
                "INVALID_REFERENCE",
                message(format!("Referenced record does not exist ({constraint})")),
            ),
        ),
        Some(sqlstate::CHECK_VIOLATION) => (
            StatusCode::BAD_REQUEST,
            ErrorBody::new(
                "VALIDATION_ERROR",
                message(format!("Value violates {constraint}")),
            ),
        ),
        Some(sqlstate::NUMERIC_VALUE_OUT_OF_RANGE) => (
            StatusCode::BAD_REQUEST,
            ErrorBody::new("VALIDATION_ERROR", "Amount is too large to store"),
        ),
        _ => {
            tracing::error!(error = %db_err, "Database error");
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
        }
    }
}
