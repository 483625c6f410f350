//! The form input source: raw field parsing and interactive prompts.
//!
//! Everything here produces an immutable `CourseInput` snapshot; no live
//! form state crosses into the core.

use std::collections::BTreeSet;

use anyhow::Result;
use chrono::{Duration, NaiveDate, NaiveTime};
use coursecal_core::calendar_system::CalendarSystem;
use coursecal_core::config::GlobalConfig;
use coursecal_core::course::CourseInput;
use coursecal_core::weekday::Weekday;
use dialoguer::Input;
use owo_colors::OwoColorize;

use crate::CourseArgs;

/// Parse a wall-clock time in HH:MM form.
pub fn parse_time(input: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M")
        .map_err(|_| anyhow::anyhow!("Invalid time '{}'. Expected HH:MM", input))
}

/// Parse YYYY-MM-DD.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid date format '{}'. Expected YYYY-MM-DD", input))
}

/// Parse a comma-separated day list ("mon,wed,fri") into a day set.
///
/// An empty input parses to an empty set; whether that is acceptable is
/// the builder's call, not the parser's.
pub fn parse_days(input: &str) -> Result<BTreeSet<Weekday>> {
    let mut days = BTreeSet::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        days.insert(part.parse::<Weekday>()?);
    }

    Ok(days)
}

/// Parse an end input: a wall-clock time ("10:30") or a class length
/// applied to the start time ("1h 30m", "90m").
pub fn parse_end(input: &str, start: NaiveTime) -> Result<NaiveTime> {
    if let Ok(std_dur) = humantime::parse_duration(input.trim()) {
        let length = Duration::from_std(std_dur)
            .map_err(|_| anyhow::anyhow!("Class length too large: \"{}\"", input))?;
        let (end, wrapped) = start.overflowing_add_signed(length);
        if wrapped != 0 {
            anyhow::bail!("Class cannot cross midnight");
        }
        return Ok(end);
    }

    parse_time(input)
}

/// Pick the calendar system: flag, then config, then the machine's zone.
pub fn resolve_calendar_system(
    flag: Option<&str>,
    config: &GlobalConfig,
) -> Result<CalendarSystem> {
    if let Some(tzid) = flag {
        return Ok(CalendarSystem::from_tzid(tzid)?);
    }

    if let Some(tzid) = &config.timezone {
        return Ok(CalendarSystem::from_tzid(tzid)?);
    }

    let tzid = iana_time_zone::get_timezone()?;
    Ok(CalendarSystem::from_tzid(&tzid)?)
}

/// Assemble the course snapshot from flags, prompting for whatever is
/// missing. Prompt order follows the form: details, times, days, end
/// date.
pub fn collect_input(args: &CourseArgs) -> Result<CourseInput> {
    let interactive = args.name.is_none() || args.start.is_none();

    // --- Course details ---
    let name = match &args.name {
        Some(name) => name.clone(),
        None => Input::<String>::new()
            .with_prompt("  Course name")
            .allow_empty(true)
            .interact_text()?,
    };

    let location = optional_field(&args.location, interactive, "  Where? (skip)")?;
    let instructor = optional_field(&args.instructor, interactive, "  Instructor? (skip)")?;

    // --- Times ---
    let start_time = match &args.start {
        Some(s) => parse_time(s)?,
        None => prompt_with_retry("  Starts at? (HH:MM)", parse_time)?,
    };

    let end_time = if let Some(end_input) = &args.end {
        parse_end(end_input, start_time)?
    } else if let Some(dur_input) = &args.duration {
        parse_end(dur_input, start_time)?
    } else if interactive {
        prompt_with_retry("  Ends at? (HH:MM or length, e.g. 1h 30m)", |raw| {
            parse_end(raw, start_time)
        })?
    } else {
        // One-hour class when nothing was given non-interactively.
        parse_end("1h", start_time)?
    };

    // --- Days ---
    let selected_days = match &args.days {
        Some(days) => parse_days(days)?,
        None if interactive => prompt_with_retry("  Which days? (e.g. mon,wed)", parse_days)?,
        // Empty set; the builder rejects it with its own error.
        None => BTreeSet::new(),
    };

    // --- Semester end ---
    let semester_end_date = match &args.until {
        Some(s) => parse_date(s)?,
        None if interactive => prompt_with_retry("  Semester ends? (YYYY-MM-DD)", parse_date)?,
        None => anyhow::bail!("Missing --until (semester end date)"),
    };

    Ok(CourseInput {
        name,
        location,
        instructor,
        start_time,
        end_time,
        selected_days,
        semester_end_date,
    })
}

fn optional_field(value: &Option<String>, interactive: bool, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v.clone()),
        None if interactive => Ok(Input::<String>::new()
            .with_prompt(prompt)
            .default(String::new())
            .show_default(false)
            .interact_text()?),
        None => Ok(String::new()),
    }
}

/// Prompt the user with retry on parse errors.
fn prompt_with_retry<T>(prompt: &str, parse: impl Fn(&str) -> Result<T>) -> Result<T> {
    loop {
        let input: String = Input::new().with_prompt(prompt).interact_text()?;
        match parse(&input) {
            Ok(result) => return Ok(result),
            Err(e) => {
                eprintln!("  {}", e.to_string().red());
            }
        }
    }
}
