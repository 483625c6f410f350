use anyhow::Result;
use chrono::Local;
use coursecal_core::builder;
use coursecal_core::config::GlobalConfig;
use coursecal_core::error::CourseCalError;
use coursecal_core::event::EventDescriptor;
use coursecal_core::sink::{CalendarSink, DirectorySink, SinkProcess};
use owo_colors::OwoColorize;

use crate::CourseArgs;
use crate::utils::input;
use crate::utils::tui;

pub async fn run(args: CourseArgs, sink: Option<String>) -> Result<()> {
    let config = GlobalConfig::load()?;
    let calendar = input::resolve_calendar_system(args.timezone.as_deref(), &config)?;

    let reference_date = match args.date.as_deref() {
        Some(s) => input::parse_date(s)?,
        None => Local::now().date_naive(),
    };

    let course = input::collect_input(&args)?;
    let event =
        builder::build(course, reference_date, &calendar).map_err(CourseCalError::Validation)?;

    let sink_name = sink.or_else(|| config.sink.clone());
    let sink: Box<dyn CalendarSink> = match &sink_name {
        Some(name) => Box::new(SinkProcess::from_name(name)),
        None => Box::new(DirectorySink::new(config.data_path())),
    };

    let spinner = tui::spinner("  Saving");
    let saved = save_through_sink(sink.as_ref(), &event).await;
    spinner.finish_and_clear();
    saved?;

    let target = match &sink_name {
        Some(name) => name.clone(),
        None => config.display_path().display().to_string(),
    };
    println!(
        "{}",
        format!("  Added: {} -> {}", tui::display_title(&event.title), target).green()
    );

    Ok(())
}

/// Access must be granted before the sink sees the event; the built
/// descriptor already exists by the time this runs.
async fn save_through_sink(sink: &dyn CalendarSink, event: &EventDescriptor) -> Result<()> {
    let granted = sink.request_access().await?;

    if !granted {
        return Err(CourseCalError::AccessDenied.into());
    }

    sink.save(event).await?;
    Ok(())
}
