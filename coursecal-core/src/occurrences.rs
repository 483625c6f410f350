//! Recurrence expansion for built events.
//!
//! Expands an event descriptor's weekly rule into the concrete course
//! meetings, bounded by the semester end date.

use rrule::RRuleSet;

use crate::error::{CourseCalError, CourseCalResult};
use crate::event::{EventDescriptor, Instant};

/// Build an iCalendar-format recurrence block for the rrule crate parser.
fn build_rrule_string(start: &Instant, rrule: &str) -> String {
    format!(
        "DTSTART;TZID={}:{}\nRRULE:{}",
        start.tzid,
        start.to_ics_string(),
        rrule
    )
}

/// Expand the first `limit` meetings of a course, in ascending order.
///
/// The rule's UNTIL bound keeps the expansion finite; `limit` only caps
/// how much of it is materialized. Each returned instant is a meeting
/// start; meetings share the descriptor's start/end wall-clock times.
pub fn occurrences(event: &EventDescriptor, limit: u16) -> CourseCalResult<Vec<Instant>> {
    let rrule_str = build_rrule_string(&event.start, &event.recurrence.to_rrule());

    let rrule_set: RRuleSet = rrule_str.parse().map_err(|e| {
        CourseCalError::Recurrence(format!(
            "Failed to parse rule for event '{}': {}",
            event.title, e
        ))
    })?;

    let result = rrule_set.all(limit);

    Ok(result
        .dates
        .iter()
        .map(|occurrence| Instant {
            local: occurrence.naive_local(),
            tzid: event.start.tzid.clone(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Frequency, RecurrenceSpec};
    use crate::weekday::Weekday;
    use chrono::{Datelike, NaiveDate};

    fn make_test_event(until: NaiveDate) -> EventDescriptor {
        // 2025-03-17 is a Monday.
        let date = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
        EventDescriptor {
            title: "Linear Algebra".to_string(),
            location: String::new(),
            instructor: String::new(),
            start: Instant {
                local: date.and_hms_opt(9, 0, 0).unwrap(),
                tzid: "America/New_York".to_string(),
            },
            end: Instant {
                local: date.and_hms_opt(10, 30, 0).unwrap(),
                tzid: "America/New_York".to_string(),
            },
            recurrence: RecurrenceSpec {
                frequency: Frequency::Weekly,
                interval: 1,
                days_of_week: [Weekday::Monday, Weekday::Wednesday].into_iter().collect(),
                until,
            },
        }
    }

    #[test]
    fn expands_selected_weekdays_until_semester_end() {
        let until = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let meetings = occurrences(&make_test_event(until), 50).unwrap();

        // Mondays: Mar 17, 24, 31; Wednesdays: Mar 19, 26.
        assert_eq!(meetings.len(), 5, "Expected 5 meetings, got {:?}", meetings);

        for meeting in &meetings {
            let day = meeting.local.weekday();
            assert!(
                day == Weekday::Monday.to_chrono() || day == Weekday::Wednesday.to_chrono(),
                "Meeting on unselected weekday: {}",
                meeting.local
            );
            assert_eq!(meeting.local.time(), make_test_event(until).start.local.time());
        }
    }

    #[test]
    fn first_meeting_is_the_anchor() {
        let until = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let event = make_test_event(until);
        let meetings = occurrences(&event, 50).unwrap();
        assert_eq!(meetings[0].local, event.start.local);
    }

    #[test]
    fn meetings_are_ascending() {
        let until = NaiveDate::from_ymd_opt(2025, 4, 30).unwrap();
        let meetings = occurrences(&make_test_event(until), 50).unwrap();
        assert!(
            meetings.windows(2).all(|pair| pair[0].local < pair[1].local),
            "Meetings out of order: {:?}",
            meetings
        );
    }

    #[test]
    fn until_date_is_inclusive() {
        // 2025-03-31 is a Monday; the course still meets that day.
        let until = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let meetings = occurrences(&make_test_event(until), 50).unwrap();
        assert_eq!(
            meetings.last().unwrap().local.date(),
            until,
            "Semester end date should still hold a meeting"
        );
    }

    #[test]
    fn limit_caps_expansion() {
        let until = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        let meetings = occurrences(&make_test_event(until), 3).unwrap();
        assert_eq!(meetings.len(), 3);
    }
}
