//! Shared entity definitions for Taskboard.

pub mod task;

pub use task::{Task, TaskAttributes, TaskId, parse_completion_date};
