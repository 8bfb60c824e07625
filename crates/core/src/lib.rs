//! Domain logic for the service margin tracker.
//!
//! Everything here is free of I/O: the `db` crate persists records and the
//! `api` crate feeds them through [`cost::compute_project_cost`] on each read.

pub mod billing;
pub mod cost;
pub mod dashboard;
pub mod error;
pub mod money;
pub mod pagination;
pub mod types;
pub mod validation;
