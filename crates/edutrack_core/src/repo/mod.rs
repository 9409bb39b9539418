//! Repository layer over key/value storage.
//!
//! # Responsibility
//! - Define use-case oriented access contracts for persisted records.
//! - Isolate JSON slot encoding from service orchestration.
//!
//! # Invariants
//! - Corrupt or missing slot content reads as empty and is never an error.
//! - Transport failures from the storage backend are still propagated.

pub mod attendance_repo;
