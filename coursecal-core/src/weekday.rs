//! Weekdays as numbered by the recurrence model.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CourseCalError;

/// A day of the week, ordered the way calendar recurrence rules order
/// them: Sunday first, ordinal 1 through 7.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// 1-based ordinal: Sunday = 1 through Saturday = 7.
    pub fn ordinal(self) -> u8 {
        self as u8 + 1
    }

    pub fn from_ordinal(n: u8) -> Option<Weekday> {
        match n {
            1..=7 => Some(Weekday::ALL[(n - 1) as usize]),
            _ => None,
        }
    }

    /// Two-letter day code from RFC 5545 (BYDAY).
    pub fn ics_code(self) -> &'static str {
        match self {
            Weekday::Sunday => "SU",
            Weekday::Monday => "MO",
            Weekday::Tuesday => "TU",
            Weekday::Wednesday => "WE",
            Weekday::Thursday => "TH",
            Weekday::Friday => "FR",
            Weekday::Saturday => "SA",
        }
    }

    pub fn to_chrono(self) -> chrono::Weekday {
        match self {
            Weekday::Sunday => chrono::Weekday::Sun,
            Weekday::Monday => chrono::Weekday::Mon,
            Weekday::Tuesday => chrono::Weekday::Tue,
            Weekday::Wednesday => chrono::Weekday::Wed,
            Weekday::Thursday => chrono::Weekday::Thu,
            Weekday::Friday => chrono::Weekday::Fri,
            Weekday::Saturday => chrono::Weekday::Sat,
        }
    }
}

impl FromStr for Weekday {
    type Err = CourseCalError;

    /// Accepts full names and the usual abbreviations, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sun" | "sunday" => Ok(Weekday::Sunday),
            "mon" | "monday" => Ok(Weekday::Monday),
            "tue" | "tues" | "tuesday" => Ok(Weekday::Tuesday),
            "wed" | "wednesday" => Ok(Weekday::Wednesday),
            "thu" | "thur" | "thurs" | "thursday" => Ok(Weekday::Thursday),
            "fri" | "friday" => Ok(Weekday::Friday),
            "sat" | "saturday" => Ok(Weekday::Saturday),
            _ => Err(CourseCalError::InvalidWeekday(s.to_string())),
        }
    }
}
