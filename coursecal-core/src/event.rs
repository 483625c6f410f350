//! The builder's output: a validated recurring event descriptor.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::weekday::Weekday;

/// An event boundary: wall-clock time pinned to a named timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instant {
    pub local: NaiveDateTime,
    pub tzid: String,
}

impl Instant {
    /// ICS-style local timestamp, e.g. "20250320T090000".
    pub fn to_ics_string(&self) -> String {
        self.local.format("%Y%m%dT%H%M%S").to_string()
    }
}

/// How often the event repeats. Course meetings are always weekly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
}

impl Frequency {
    pub fn as_rrule(self) -> &'static str {
        match self {
            Frequency::Weekly => "WEEKLY",
        }
    }
}

/// Weekly recurrence with a fixed termination date.
///
/// Built only by the event builder: `days_of_week` is never empty and
/// `until` is inclusive: the course still meets on the end date itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceSpec {
    pub frequency: Frequency,
    pub interval: u32,
    pub days_of_week: BTreeSet<Weekday>,
    pub until: NaiveDate,
}

impl RecurrenceSpec {
    /// Render as an RFC 5545 RRULE value.
    ///
    /// BYDAY codes come out Sunday-first. UNTIL is the last moment of the
    /// end date so that a meeting on that day is still generated.
    pub fn to_rrule(&self) -> String {
        let byday = self
            .days_of_week
            .iter()
            .map(|day| day.ics_code())
            .collect::<Vec<_>>()
            .join(",");

        format!(
            "FREQ={};INTERVAL={};BYDAY={};UNTIL={}T235959Z",
            self.frequency.as_rrule(),
            self.interval,
            byday,
            self.until.format("%Y%m%d"),
        )
    }
}

/// A validated recurring event, ready for a calendar sink.
///
/// Constructed once per submission by the builder and immutable
/// afterwards. `end.local > start.local` always holds, and both instants
/// share the same calendar day and timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDescriptor {
    pub title: String,
    pub location: String,
    pub instructor: String,
    pub start: Instant,
    pub end: Instant,
    pub recurrence: RecurrenceSpec,
}

impl EventDescriptor {
    /// Deterministic UID: start timestamp plus the title with spaces
    /// dashed. Stable across rebuilds of the same input, so repeated
    /// saves land on the same event.
    pub fn uid(&self) -> String {
        format!(
            "{}_{}@coursecal",
            self.start.to_ics_string(),
            self.title.replace(' ', "-")
        )
    }
}
