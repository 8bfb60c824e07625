//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Create DTOs accept the camelCase field names the web client sends as
//! aliases of the snake_case column names.

pub mod allocation;
pub mod client;
pub mod employee;
pub mod expense;
pub mod expense_category;
pub mod project;

use serde::{Deserialize, Deserializer};

/// Deserialize a field that is present in the body, `null` included, as
/// `Some`. Pair with `#[serde(default)]` so an absent key stays `None`.
pub(crate) fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::project::UpdateProject;

    #[test]
    fn deadline_distinguishes_absent_from_null() {
        let absent: UpdateProject = serde_json::from_str(r#"{"name": "X"}"#).unwrap();
        assert_eq!(absent.deadline, None);

        let cleared: UpdateProject = serde_json::from_str(r#"{"deadline": null}"#).unwrap();
        assert_eq!(cleared.deadline, Some(None));

        let set: UpdateProject = serde_json::from_str(r#"{"deadline": "2025-03-01"}"#).unwrap();
        assert_eq!(set.deadline, Some(NaiveDate::from_ymd_opt(2025, 3, 1)));
    }
}
