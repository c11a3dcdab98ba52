//! Taskboard server library.
//!
//! Exposes the task store, configuration, HTML rendering, and the axum
//! router/server for use in tests and embedding.

pub mod config;
pub mod render;
pub mod server;
pub mod store;
