//! Error types for the coursecal ecosystem.

use thiserror::Error;

/// Validation failures from the recurring event builder.
///
/// These are returned as values, never panicked; the caller decides how
/// to present each kind. Nothing is retried automatically.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// No weekday was selected for the course.
    #[error("at least one weekday must be selected")]
    NoDaysSelected,

    /// The end time is not strictly after the start time on the same day.
    #[error("end time must be after start time")]
    EndBeforeOrEqualStart,

    /// The date and time components do not form a valid instant in the
    /// calendar system (e.g. a wall-clock time skipped by a DST jump).
    #[error("failed to compose the event dates")]
    InvalidDateComposition,
}

/// Errors that can occur in coursecal operations.
///
/// Builder validation has its own type above; everything else (config,
/// sinks, recurrence expansion) lands here. Sink failures carry the
/// store's own reason and are opaque beyond that.
#[derive(Error, Debug)]
pub enum CourseCalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown timezone: {0}")]
    Timezone(String),

    #[error("Not a recognized weekday: {0}")]
    InvalidWeekday(String),

    #[error("Sink '{0}' not found. Install it with: cargo install coursecal-sink-{0}")]
    SinkNotInstalled(String),

    #[error("Sink request timed out after {0}s")]
    SinkTimeout(u64),

    #[error("Calendar access denied")]
    AccessDenied,

    #[error("Sink error: {0}")]
    Sink(String),

    #[error("Recurrence error: {0}")]
    Recurrence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result type alias for coursecal operations.
pub type CourseCalResult<T> = Result<T, CourseCalError>;
