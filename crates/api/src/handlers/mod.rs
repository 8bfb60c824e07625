pub mod allocation;
pub mod client;
pub mod dashboard;
pub mod employee;
pub mod expense;
pub mod expense_category;
pub mod project;
