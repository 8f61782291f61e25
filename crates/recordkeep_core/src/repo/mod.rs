//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record store contract used by the service layer.
//! - Isolate SQLite query details from use-case orchestration.
//!
//! # Invariants
//! - Repository writes validate `RecordFields` before persistence.
//! - Absent records are reported as `None`/`false`, never as errors.

pub mod record_repo;
