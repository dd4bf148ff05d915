//! Adapter implementations of the task ports.
//!
//! - [`memory`]: lock-guarded in-memory storage
//! - [`postgres`]: Diesel-backed `PostgreSQL` storage

pub mod memory;
pub mod postgres;
