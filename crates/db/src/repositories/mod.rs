//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod allocation_repo;
pub mod client_repo;
pub mod employee_repo;
pub mod expense_category_repo;
pub mod expense_repo;
pub mod project_repo;

pub use allocation_repo::AllocationRepo;
pub use client_repo::ClientRepo;
pub use employee_repo::EmployeeRepo;
pub use expense_category_repo::ExpenseCategoryRepo;
pub use expense_repo::ExpenseRepo;
pub use project_repo::ProjectRepo;
