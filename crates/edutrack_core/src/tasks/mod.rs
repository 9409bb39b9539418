//! Study and health task suggestions.
//!
//! # Responsibility
//! - Map a subject to a fixed task list (local reference supplier).
//! - Define the boundary for an external task-generation provider.
//!
//! # Invariants
//! - Every task handed to callers has non-blank title, type, duration,
//!   priority and description.
//! - Supplying tasks has no side effects.

pub mod draft;
pub mod provider;
pub mod supplier;
mod templates;
