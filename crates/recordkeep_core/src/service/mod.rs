//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate planner and repository calls into use-case level APIs.
//! - Keep the HTTP layer decoupled from storage details.

pub mod record_service;
