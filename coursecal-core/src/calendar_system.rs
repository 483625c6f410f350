//! Timezone-aware composition of event instants.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

use crate::error::{CourseCalError, CourseCalResult};

/// Resolves calendar date and wall-clock components to concrete instants
/// in a single named timezone.
///
/// Injected into the builder instead of a global default so that "today"
/// composition is deterministic and testable under any zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarSystem {
    tz: Tz,
}

impl CalendarSystem {
    pub fn new(tz: Tz) -> Self {
        CalendarSystem { tz }
    }

    /// Look up an IANA timezone name, e.g. "America/New_York".
    pub fn from_tzid(tzid: &str) -> CourseCalResult<Self> {
        let tz = tzid
            .parse::<Tz>()
            .map_err(|_| CourseCalError::Timezone(tzid.to_string()))?;
        Ok(CalendarSystem { tz })
    }

    pub fn tzid(&self) -> &'static str {
        self.tz.name()
    }

    /// Compose a local date and time into a concrete instant.
    ///
    /// Returns `None` when the wall-clock time does not exist in this
    /// zone (skipped by a DST transition). An ambiguous time resolves to
    /// the earlier of the two instants.
    pub fn compose(&self, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Tz>> {
        self.tz.from_local_datetime(&date.and_time(time)).earliest()
    }
}
