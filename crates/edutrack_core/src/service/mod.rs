//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and storage calls into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod dashboard_service;
pub mod session_service;
pub mod task_service;
