//! Course input as collected from the user.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::weekday::Weekday;

/// A snapshot of the course form, taken once at submission time.
///
/// The builder consumes this by value; nothing mutates it after the
/// snapshot is taken. `name` may be empty; a nameless course is allowed
/// and passes through to the calendar as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseInput {
    pub name: String,
    pub location: String,
    pub instructor: String,
    /// Only hour and minute are used; seconds are discarded.
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub selected_days: BTreeSet<Weekday>,
    /// Last day of the semester, inclusive.
    pub semester_end_date: NaiveDate,
}
