//! Simulated attendance capture flows.
//!
//! # Responsibility
//! - Model QR, proximity and face-recognition capture as explicit state machines.
//! - Drive timed transitions from a virtual-time scheduler instead of real timeouts.
//! - Append exactly one attendance record when a flow reaches `Done`.
//!
//! # Invariants
//! - A flow never writes a record after it has been abandoned.
//! - Timers fire in due-time order; ties fire in scheduling order.

pub mod clock;
pub mod flow;
pub mod scheduler;
pub mod session;
