//! UI bridge over `edutrack_core`.

pub mod api;
