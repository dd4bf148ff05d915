//! Tasktracker: task tracking domain and persistence.
//!
//! This crate provides the task model of a small issue tracker together with
//! the repositories that persist it. Registered users create tasks, move them
//! through an open, in-progress and closed workflow, and tag them.
//!
//! # Architecture
//!
//! Tasktracker follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, memory)
//!
//! # Modules
//!
//! - [`task`]: Task domain, repository port, adapters and services
//! - [`config`]: Layered settings and connection pool construction
//! - [`logging`]: `tracing` subscriber setup

pub mod config;
pub mod logging;
pub mod task;
