//! Shared query parameter types for API handlers.
//!
//! Label filters (`type`, `status`, ...) arrive as raw strings and are parsed
//! in the handler so an unknown label yields a JSON validation error rather
//! than an extractor rejection. Empty strings count as "not given".

use std::str::FromStr;

use margin_core::error::CoreError;
use margin_core::types::Date;
use margin_core::validation::validate_date_range;
use serde::Deserialize;

/// Inclusive `startDate` / `endDate` bounds.
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeParams {
    #[serde(alias = "startDate", default, deserialize_with = "empty_as_none")]
    pub start_date: Option<Date>,
    #[serde(alias = "endDate", default, deserialize_with = "empty_as_none")]
    pub end_date: Option<Date>,
}

impl DateRangeParams {
    /// The bounds, rejecting an inverted range.
    pub fn bounds(&self) -> Result<(Option<Date>, Option<Date>), CoreError> {
        date_bounds(self.start_date, self.end_date)
    }
}

/// Query parameters for `GET /projects`.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub billing_type: Option<String>,
    pub status: Option<String>,
    #[serde(alias = "startDate", default, deserialize_with = "empty_as_none")]
    pub start_date: Option<Date>,
    #[serde(alias = "endDate", default, deserialize_with = "empty_as_none")]
    pub end_date: Option<Date>,
}

/// Query parameters for `GET /employees`.
#[derive(Debug, Default, Deserialize)]
pub struct EmployeeListParams {
    pub status: Option<String>,
    pub specialization: Option<String>,
}

/// Query parameters for `GET /expenses`.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseListParams {
    pub category: Option<String>,
    #[serde(alias = "startDate", default, deserialize_with = "empty_as_none")]
    pub start_date: Option<Date>,
    #[serde(alias = "endDate", default, deserialize_with = "empty_as_none")]
    pub end_date: Option<Date>,
}

/// Validate an optional inclusive date range and hand it back.
pub fn date_bounds(
    start: Option<Date>,
    end: Option<Date>,
) -> Result<(Option<Date>, Option<Date>), CoreError> {
    validate_date_range(start, end)?;
    Ok((start, end))
}

/// Trim a free-text parameter, treating blank as absent.
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse an optional label filter, treating blank as absent.
pub fn parse_label<T>(value: Option<&str>) -> Result<Option<T>, CoreError>
where
    T: FromStr<Err = CoreError>,
{
    non_empty(value).map(|v| v.parse()).transpose()
}

/// Deserialize an optional value where an empty string means `None`.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
