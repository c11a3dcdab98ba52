//! Task entity types for Taskboard.
//!
//! Defines the persisted [`Task`] record, the [`TaskId`] identifier newtype,
//! and [`TaskAttributes`] — the payload applied on create and update. The
//! completion date is the sole completion signal: `None` means incomplete,
//! any value means complete.

use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// Shape of an HTML `datetime-local` input value, without seconds.
const DATETIME_LOCAL: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");

/// `datetime-local` variant that carries seconds.
const DATETIME_LOCAL_SECONDS: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Unique identifier for a task, assigned sequentially by the store.
///
/// The inner value is signed so that ids arriving from the outside (URL
/// path segments) can hold values the store never assigns, such as `-1`;
/// those simply resolve to "not found".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TaskId(i64);

impl TaskId {
    /// Wraps a raw id value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted task record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Store-assigned identifier, immutable once persisted.
    pub id: TaskId,
    /// Required display name.
    pub name: String,
    /// Free-form description, may be empty.
    pub description: String,
    /// When the task was completed; `None` while incomplete.
    pub completion_date: Option<OffsetDateTime>,
}

impl Task {
    /// Returns true when the task has a completion date.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.completion_date.is_some()
    }

    /// Overwrites the mutable fields from `attrs`. The id never changes.
    pub fn apply(&mut self, attrs: TaskAttributes) {
        self.name = attrs.name;
        self.description = attrs.description;
        self.completion_date = attrs.completion_date;
    }

    /// Completion date formatted as RFC 3339 for display, if set.
    #[must_use]
    pub fn completion_date_rfc3339(&self) -> Option<String> {
        self.completion_date.and_then(|d| d.format(&Rfc3339).ok())
    }

    /// Completion date shaped as an HTML `datetime-local` input value, if set.
    #[must_use]
    pub fn completion_date_input_value(&self) -> Option<String> {
        self.completion_date
            .and_then(|d| d.format(DATETIME_LOCAL).ok())
    }
}

/// Attribute payload used to create a task or overwrite an existing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskAttributes {
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Completion date; `None` means incomplete.
    pub completion_date: Option<OffsetDateTime>,
}

/// Parses a completion date from form input.
///
/// Empty or whitespace-only input means "incomplete". Accepts RFC 3339
/// (`2024-05-01T10:30:00Z`) and the HTML `datetime-local` shapes
/// (`2024-05-01T10:30`, optionally with seconds), which are assumed UTC.
/// Unparseable input degrades to `None` — there is no validation-failure
/// path for task forms.
#[must_use]
pub fn parse_completion_date(input: &str) -> Option<OffsetDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(date) = OffsetDateTime::parse(input, &Rfc3339) {
        return Some(date);
    }
    PrimitiveDateTime::parse(input, DATETIME_LOCAL_SECONDS)
        .or_else(|_| PrimitiveDateTime::parse(input, DATETIME_LOCAL))
        .map(PrimitiveDateTime::assume_utc)
        .ok()
}
