//! ICS generation for built events.

use chrono::Utc;
use icalendar::{Calendar, Component, EventLike, Property};

use crate::event::{EventDescriptor, Instant};

/// Generate .ics content for a built event.
///
/// The single VEVENT carries TZID-parameterized start/end times and the
/// weekly RRULE; the instructor travels in the description since course
/// events have no attendee emails to attach.
pub fn generate_ics(event: &EventDescriptor) -> String {
    let mut cal = Calendar::new();

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.uid());
    ics_event.summary(&event.title);

    // DTSTAMP - required by RFC 5545; generation time is the only
    // non-deterministic line in the output.
    let dtstamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    ics_event.add_property("DTSTAMP", &dtstamp);

    add_zoned_property(&mut ics_event, "DTSTART", &event.start);
    add_zoned_property(&mut ics_event, "DTEND", &event.end);

    if !event.location.is_empty() {
        ics_event.location(&event.location);
    }

    if !event.instructor.is_empty() {
        ics_event.description(&format!("Instructor: {}", event.instructor));
    }

    ics_event.add_property("RRULE", event.recurrence.to_rrule());

    let ics_event = ics_event.done();
    cal.push(ics_event);
    let cal = cal.done();

    // Post-process to remove unnecessary bloat from the icalendar crate's output
    strip_ics_bloat(&cal.to_string())
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with COURSECAL (we post-process the output)
/// - Remove CALSCALE:GREGORIAN (it's the default)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:COURSECAL\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

/// Add a datetime property carrying the instant's TZID parameter.
fn add_zoned_property(ics_event: &mut icalendar::Event, name: &str, instant: &Instant) {
    let mut prop = Property::new(name, instant.to_ics_string());
    prop.add_parameter("TZID", &instant.tzid);
    ics_event.append_property(prop);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Frequency, RecurrenceSpec};
    use crate::weekday::Weekday;
    use chrono::NaiveDate;

    fn make_test_event() -> EventDescriptor {
        let date = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
        EventDescriptor {
            title: "Linear Algebra".to_string(),
            location: "Hall B".to_string(),
            instructor: "Dr. Petrov".to_string(),
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
                until: NaiveDate::from_ymd_opt(2025, 5, 30).unwrap(),
            },
        }
    }

    #[test]
    fn ics_has_zoned_start_and_end() {
        let ics = generate_ics(&make_test_event());

        assert!(
            ics.contains("DTSTART;TZID=America/New_York:20250317T090000"),
            "DTSTART should carry the TZID parameter. ICS:\n{}",
            ics
        );
        assert!(
            ics.contains("DTEND;TZID=America/New_York:20250317T103000"),
            "DTEND should carry the TZID parameter. ICS:\n{}",
            ics
        );
    }

    #[test]
    fn ics_has_weekly_rrule() {
        let ics = generate_ics(&make_test_event());
        assert!(
            ics.contains("RRULE:FREQ=WEEKLY;INTERVAL=1;BYDAY=MO,WE;UNTIL=20250530T235959Z"),
            "Missing RRULE line. ICS:\n{}",
            ics
        );
    }

    #[test]
    fn ics_carries_course_fields() {
        let ics = generate_ics(&make_test_event());
        assert!(ics.contains("SUMMARY:Linear Algebra"), "Missing summary");
        assert!(ics.contains("LOCATION:Hall B"), "Missing location");
        assert!(
            ics.contains("DESCRIPTION:Instructor: Dr. Petrov"),
            "Missing instructor description. ICS:\n{}",
            ics
        );
    }

    #[test]
    fn ics_skips_empty_optional_fields() {
        let mut event = make_test_event();
        event.location = String::new();
        event.instructor = String::new();

        let ics = generate_ics(&event);
        assert!(!ics.contains("LOCATION"), "Empty location should be omitted");
        assert!(
            !ics.contains("DESCRIPTION"),
            "Empty instructor should be omitted"
        );
    }

    #[test]
    fn ics_has_exactly_one_dtstamp() {
        let ics = generate_ics(&make_test_event());
        assert_eq!(
            ics.lines().filter(|l| l.starts_with("DTSTAMP:")).count(),
            1,
            "VEVENT requires exactly one DTSTAMP. ICS:\n{}",
            ics
        );
    }

    #[test]
    fn ics_is_stripped_of_bloat() {
        let ics = generate_ics(&make_test_event());
        assert!(ics.contains("PRODID:COURSECAL"), "PRODID should be rewritten");
        assert!(!ics.contains("CALSCALE"), "CALSCALE should be dropped");
    }
}
