//! Record query planner.
//!
//! # Responsibility
//! - Parse raw listing parameters (`page`, `limit`, `search`, `sortBy`).
//! - Produce a deterministic [`QueryPlan`] for the store.
//! - Compute `total_pages` from the filtered count.
//!
//! # Invariants
//! - `skip = (page - 1) * limit` and `take = limit`.
//! - `total_pages = ceil(total / limit)`, zero when `total` is zero.
//! - Search matches `title` only, case-insensitively, as a literal substring.

use std::num::NonZeroU32;

/// Page used when the parameter is absent, non-numeric or below one.
pub const DEFAULT_PAGE: NonZeroU32 = NonZeroU32::MIN;

/// Page size used when the parameter is absent, non-numeric or zero.
pub const DEFAULT_LIMIT: NonZeroU32 = match NonZeroU32::new(10) {
    Some(value) => value,
    None => panic!("default limit must be non-zero"),
};

/// Name of the SQL scalar function backing [`TitleFilter::Contains`].
pub const TITLE_CONTAINS_SQL_FN: &str = "title_contains";

/// Sort option selected by the `sortBy` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// `start` descending, newest creation first on ties.
    StartDesc,
    /// `createdAt` descending.
    CreatedAtDesc,
    /// No explicit ordering; the store returns its natural insertion order.
    Natural,
}

impl SortOrder {
    /// Resolves the `sortBy` parameter.
    ///
    /// Absent or empty values select the client default (`createdAtDesc`).
    /// Anything else that is not an exact key, padded keys included, falls
    /// through to [`SortOrder::Natural`].
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            None | Some("") => Self::CreatedAtDesc,
            Some("startDesc") => Self::StartDesc,
            Some("createdAtDesc") => Self::CreatedAtDesc,
            Some(_) => Self::Natural,
        }
    }

    /// Wire name of this option, `None` for natural order.
    pub fn as_param(self) -> Option<&'static str> {
        match self {
            Self::StartDesc => Some("startDesc"),
            Self::CreatedAtDesc => Some("createdAtDesc"),
            Self::Natural => None,
        }
    }
}

/// Title filter derived from the `search` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleFilter {
    /// Matches every record.
    All,
    /// Case-insensitive substring match; the needle is stored lowercased.
    Contains(String),
}

impl TitleFilter {
    /// Builds a filter from raw search text. Only the empty string matches
    /// everything; whitespace is part of the needle.
    pub fn from_search(search: &str) -> Self {
        if search.is_empty() {
            Self::All
        } else {
            Self::Contains(search.to_lowercase())
        }
    }

    /// Evaluates the filter against one title.
    pub fn matches(&self, title: &str) -> bool {
        match self {
            Self::All => true,
            Self::Contains(needle) => title_contains(title, needle),
        }
    }
}

/// Substring test shared by Rust callers and SQL. `needle` must already be
/// lowercased, as stored in [`TitleFilter::Contains`].
pub fn title_contains(title: &str, needle: &str) -> bool {
    title.to_lowercase().contains(needle)
}

/// Parsed listing request. Always valid by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub page: NonZeroU32,
    pub limit: NonZeroU32,
    pub search: String,
    pub sort: SortOrder,
}

impl Default for ListRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            search: String::new(),
            sort: SortOrder::CreatedAtDesc,
        }
    }
}

impl ListRequest {
    /// Parses raw query-string values, mapping bad input to defaults.
    pub fn from_params(
        page: Option<&str>,
        limit: Option<&str>,
        search: Option<&str>,
        sort_by: Option<&str>,
    ) -> Self {
        Self {
            page: parse_positive(page, DEFAULT_PAGE),
            limit: parse_positive(limit, DEFAULT_LIMIT),
            search: search.unwrap_or_default().to_string(),
            sort: SortOrder::from_param(sort_by),
        }
    }
}

/// Store instructions for one listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub filter: TitleFilter,
    pub sort: SortOrder,
    pub skip: u64,
    pub take: u32,
}

/// Translates a listing request into store instructions.
pub fn plan_query(request: &ListRequest) -> QueryPlan {
    let page_index = u64::from(request.page.get() - 1);
    QueryPlan {
        filter: TitleFilter::from_search(&request.search),
        sort: request.sort,
        skip: page_index * u64::from(request.limit.get()),
        take: request.limit.get(),
    }
}

/// Number of pages needed to show `total` items, `limit` per page.
pub fn total_pages(total: u64, limit: NonZeroU32) -> u64 {
    total.div_ceil(u64::from(limit.get()))
}

fn parse_positive(value: Option<&str>, default: NonZeroU32) -> NonZeroU32 {
    value
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .and_then(NonZeroU32::new)
        .unwrap_or(default)
}
