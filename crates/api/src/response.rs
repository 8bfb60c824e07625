//! Shared response envelope types for API handlers.

use margin_core::pagination::Pagination;
use serde::Serialize;

/// `{ "data": [...], "pagination": {...} }` envelope for paginated lists.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}
