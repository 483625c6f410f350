use anyhow::Result;
use chrono::Local;
use coursecal_core::builder;
use coursecal_core::config::GlobalConfig;
use coursecal_core::error::CourseCalError;
use coursecal_core::ics;
use coursecal_core::occurrences;
use owo_colors::OwoColorize;

use crate::CourseArgs;
use crate::utils::input;
use crate::utils::tui;

/// How many upcoming meetings to list.
const PREVIEW_MEETINGS: u16 = 8;

pub fn run(args: CourseArgs) -> Result<()> {
    let config = GlobalConfig::load()?;
    let calendar = input::resolve_calendar_system(args.timezone.as_deref(), &config)?;

    let reference_date = match args.date.as_deref() {
        Some(s) => input::parse_date(s)?,
        None => Local::now().date_naive(),
    };

    let course = input::collect_input(&args)?;
    let event =
        builder::build(course, reference_date, &calendar).map_err(CourseCalError::Validation)?;

    let meetings = occurrences::occurrences(&event, PREVIEW_MEETINGS)?;

    println!();
    println!("  {}", tui::display_title(&event.title).bold());
    for meeting in &meetings {
        println!(
            "  {} {}-{}",
            meeting.local.format("%a %Y-%m-%d"),
            meeting.local.format("%H:%M"),
            event.end.local.time().format("%H:%M")
        );
    }
    if meetings.len() == PREVIEW_MEETINGS as usize {
        println!("  ...");
    }

    println!();
    print!("{}", ics::generate_ics(&event));

    Ok(())
}
