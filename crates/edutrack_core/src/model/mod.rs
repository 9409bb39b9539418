//! Domain model for attendance, tasks and login sessions.
//!
//! # Responsibility
//! - Define the wire shapes persisted in key/value storage.
//! - Keep display-only task descriptors separate from persisted records.
//!
//! # Invariants
//! - Attendance records are immutable once created.
//! - Tasks are regenerated per request and never persisted.

pub mod attendance;
pub mod session;
pub mod task;
