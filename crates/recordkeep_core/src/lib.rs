//! Core domain logic for the record service.
//! This crate is the single source of truth for record invariants and the
//! listing pipeline (search, sort, pagination).

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{
    Record, RecordFields, RecordId, RecordInput, RecordValidationError, START_DATE_FORMAT,
};
pub use query::pagination::{pagination_window, PageItem, PaginationWindow};
pub use query::planner::{
    plan_query, total_pages, ListRequest, QueryPlan, SortOrder, TitleFilter, DEFAULT_LIMIT,
    DEFAULT_PAGE,
};
pub use repo::record_repo::{RecordRepository, RepoError, RepoResult, SqliteRecordRepository};
pub use service::record_service::{RecordPage, RecordService, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
