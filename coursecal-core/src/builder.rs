//! The recurring event builder.
//!
//! The one entry point of the core: validate a course snapshot and turn
//! it into a recurring event descriptor anchored on a reference date.

use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::calendar_system::CalendarSystem;
use crate::course::CourseInput;
use crate::error::ValidationError;
use crate::event::{EventDescriptor, Frequency, Instant, RecurrenceSpec};

/// Build a recurring event from a course snapshot.
///
/// `reference_date` anchors the first occurrence ("today" in the UI
/// flow); it is passed in rather than read from the clock so the
/// function stays pure. Start and end land on the same calendar day;
/// cross-midnight spans are not supported and fail the time-order check.
///
/// Validation order is part of the contract: date composition first,
/// then day selection, then time ordering. When the day set is empty
/// *and* the times are reversed, the day-selection error wins.
pub fn build(
    input: CourseInput,
    reference_date: NaiveDate,
    calendar: &CalendarSystem,
) -> Result<EventDescriptor, ValidationError> {
    let start_time = truncate_to_minute(input.start_time)?;
    let end_time = truncate_to_minute(input.end_time)?;

    let start = calendar
        .compose(reference_date, start_time)
        .ok_or(ValidationError::InvalidDateComposition)?;
    let end = calendar
        .compose(reference_date, end_time)
        .ok_or(ValidationError::InvalidDateComposition)?;

    if input.selected_days.is_empty() {
        return Err(ValidationError::NoDaysSelected);
    }

    if end <= start {
        return Err(ValidationError::EndBeforeOrEqualStart);
    }

    let recurrence = RecurrenceSpec {
        frequency: Frequency::Weekly,
        interval: 1,
        days_of_week: input.selected_days,
        until: input.semester_end_date,
    };

    Ok(EventDescriptor {
        title: input.name,
        location: input.location,
        instructor: input.instructor,
        start: Instant {
            local: start.naive_local(),
            tzid: calendar.tzid().to_string(),
        },
        end: Instant {
            local: end.naive_local(),
            tzid: calendar.tzid().to_string(),
        },
        recurrence,
    })
}

/// Only hour and minute participate in event boundaries; seconds and
/// sub-second precision are discarded.
fn truncate_to_minute(time: NaiveTime) -> Result<NaiveTime, ValidationError> {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0)
        .ok_or(ValidationError::InvalidDateComposition)
}
