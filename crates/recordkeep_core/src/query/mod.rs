//! Listing pipeline for the record collection.
//!
//! # Responsibility
//! - Translate listing parameters into filter, sort and skip/take.
//! - Compute pagination metadata and the page-number strip shown to users.
//!
//! # Invariants
//! - Parameter parsing never fails; bad input maps to documented defaults.
//! - `limit` is never zero past parsing, so page math cannot divide by zero.

pub mod pagination;
pub mod planner;
