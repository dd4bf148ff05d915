//! Task tracking for Tasktracker.
//!
//! This module creates tasks on behalf of registered users, records who
//! created and last modified each task, and enforces the status workflow
//! (open, in progress, closed with a resolution, reopened). Tags are attached
//! through a join table and loaded with each task. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
