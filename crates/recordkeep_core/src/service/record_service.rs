//! Record use-case service.
//!
//! # Responsibility
//! - Run the listing pipeline: plan, find, count, paginate.
//! - Validate client input before create/update.
//! - Turn absent records into `NotFound` for callers.
//!
//! # Invariants
//! - Updates always replace `title`, `start` and `description` together.
//! - Deleting an id twice fails the second time.
//! - Log lines carry ids and counts only, never record text.

use crate::model::record::{Record, RecordId, RecordInput, RecordValidationError};
use crate::query::planner::{plan_query, total_pages, ListRequest};
use crate::repo::record_repo::{RecordRepository, RepoError};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::num::NonZeroU32;

/// Service error for record use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Client input failed field validation.
    Validation(RecordValidationError),
    /// Target record does not exist.
    NotFound(RecordId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RecordValidationError> for ServiceError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// One page of records plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPage {
    pub items: Vec<Record>,
    /// Records matching the search, ignoring pagination.
    pub total: u64,
    pub total_pages: u64,
    pub page: NonZeroU32,
    pub limit: NonZeroU32,
}

/// Record service facade over repository implementations.
pub struct RecordService<R: RecordRepository> {
    repo: R,
}

impl<R: RecordRepository> RecordService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists one page of records for a parsed listing request.
    pub fn list_records(&self, request: &ListRequest) -> ServiceResult<RecordPage> {
        let plan = plan_query(request);
        let items = self.repo.find_records(&plan)?;
        let total = self.repo.count_records(&plan.filter)?;
        let total_pages = total_pages(total, request.limit);

        debug!(
            "event=record_list module=service status=ok page={} limit={} sort={:?} filtered={} returned={} total={}",
            request.page,
            request.limit,
            plan.sort,
            !request.search.is_empty(),
            items.len(),
            total
        );

        Ok(RecordPage {
            items,
            total,
            total_pages,
            page: request.page,
            limit: request.limit,
        })
    }

    pub fn create_record(&self, input: &RecordInput) -> ServiceResult<Record> {
        let fields = input.validate()?;
        let record = self.repo.create_record(&fields)?;
        info!(
            "event=record_create module=service status=ok record_id={}",
            record.id
        );
        Ok(record)
    }

    pub fn get_record(&self, id: RecordId) -> ServiceResult<Record> {
        self.repo
            .get_record(id)?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Replaces all editable fields of one record.
    pub fn update_record(&self, id: RecordId, input: &RecordInput) -> ServiceResult<Record> {
        let fields = input.validate()?;
        let record = self
            .repo
            .update_record(id, &fields)?
            .ok_or(ServiceError::NotFound(id))?;
        info!("event=record_update module=service status=ok record_id={id}");
        Ok(record)
    }

    pub fn delete_record(&self, id: RecordId) -> ServiceResult<()> {
        if !self.repo.delete_record(id)? {
            return Err(ServiceError::NotFound(id));
        }
        info!("event=record_delete module=service status=ok record_id={id}");
        Ok(())
    }
}
