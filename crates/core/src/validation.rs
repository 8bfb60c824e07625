//! Input validation shared by the HTTP handlers.
//!
//! Allocation values are not range-checked; the cost engine accepts whatever
//! the caller stored. Their unit must agree with the project's billing type.

use rust_decimal::Decimal;

use crate::billing::{AllocationUnit, BillingType};
use crate::error::CoreError;
use crate::types::Date;

/// Maximum length of a name column (`VARCHAR(255)`).
pub const MAX_NAME_LEN: usize = 255;

/// Require a non-blank name no longer than [`MAX_NAME_LEN`] characters.
pub fn validate_name(field: &str, value: &str) -> Result<(), CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Require a monetary amount of zero or more.
pub fn validate_non_negative(field: &str, value: Decimal) -> Result<(), CoreError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(CoreError::Validation(format!(
            "{field} must be zero or greater, got {value}"
        )));
    }
    Ok(())
}

/// Same as [`validate_non_negative`] for optional fields.
pub fn validate_optional_non_negative(field: &str, value: Option<Decimal>) -> Result<(), CoreError> {
    value.map_or(Ok(()), |v| validate_non_negative(field, v))
}

/// Require `start <= end` when both bounds of a filter range are given.
pub fn validate_date_range(start: Option<Date>, end: Option<Date>) -> Result<(), CoreError> {
    match (start, end) {
        (Some(s), Some(e)) if s > e => Err(CoreError::Validation(format!(
            "startDate ({s}) must not be after endDate ({e})"
        ))),
        _ => Ok(()),
    }
}

/// Resolve the unit of an allocation on a project of `billing_type`.
///
/// An omitted unit takes the one the billing type implies. An explicit unit
/// must be that same unit: hours on T&M, percentage on Fixed Bid and Fixed
/// Value.
pub fn resolve_allocation_unit(
    billing_type: BillingType,
    unit: Option<AllocationUnit>,
) -> Result<AllocationUnit, CoreError> {
    let expected = billing_type.default_allocation_unit();
    match unit {
        Some(unit) if unit != expected => Err(CoreError::Validation(format!(
            "{billing_type} projects take allocations in {expected}, got {unit}"
        ))),
        _ => Ok(expected),
    }
}
