//! Calendar sinks.
//!
//! A sink persists a built event descriptor. Two implementations ship
//! with coursecal: writing .ics files into a calendar directory, and
//! delegating to an external sink binary (e.g. `coursecal-sink-google`)
//! that speaks the JSON protocol over stdin/stdout.
//!
//! Sinks manage their own credentials and stores. Coursecal only passes
//! the built event and reads back a status; save failures surface the
//! sink's own reason.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;

use crate::error::{CourseCalError, CourseCalResult};
use crate::event::EventDescriptor;
use crate::ics;
use crate::protocol::{Command, Request, Response};

const SINK_TIMEOUT: Duration = Duration::from_secs(10);

/// Where a built event ends up.
///
/// Access must be requested (and granted) before `save` is invoked; the
/// builder's result must exist before either call.
#[async_trait::async_trait]
pub trait CalendarSink {
    /// Ask for write access to the underlying store.
    async fn request_access(&self) -> CourseCalResult<bool>;

    /// Persist the event. Only called after access was granted.
    async fn save(&self, event: &EventDescriptor) -> CourseCalResult<()>;
}

// =============================================================================
// Directory sink
// =============================================================================

/// Saves events as .ics files in a calendar directory.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySink { dir: dir.into() }
    }
}

#[async_trait::async_trait]
impl CalendarSink for DirectorySink {
    async fn request_access(&self) -> CourseCalResult<bool> {
        std::fs::create_dir_all(&self.dir)?;
        let granted = !std::fs::metadata(&self.dir)?.permissions().readonly();
        Ok(granted)
    }

    async fn save(&self, event: &EventDescriptor) -> CourseCalResult<()> {
        let content = ics::generate_ics(event);
        let filename = filename_for(event, &self.dir)?;
        let path = self.dir.join(&filename);

        std::fs::write(&path, &content)
            .map_err(|e| CourseCalError::Sink(format!("Failed to write {}: {}", path.display(), e)))?;

        Ok(())
    }
}

/// Generate the filename to use for an event in a directory.
/// Handles collisions by adding numeric suffixes (-2, -3, etc).
fn filename_for(event: &EventDescriptor, dir: &Path) -> CourseCalResult<String> {
    let base_filename = generate_base_filename(event);
    unique_filename(&base_filename, dir, &event.uid())
}

/// Course events always recur, so the filename leads with a recurring
/// marker instead of a date.
fn generate_base_filename(event: &EventDescriptor) -> String {
    let slug = slugify(&event.title);

    if slug.is_empty() {
        return "_recurring__course.ics".to_string();
    }

    format!("_recurring__{}.ics", slug)
}

/// Convert a string to a filename-safe slug
fn slugify(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(50)
        .collect()
}

/// Generate a unique filename, adding -2, -3, etc. suffix if there's a
/// collision with a different event. A file already holding this event's
/// UID is reused, so repeated saves stay idempotent.
fn unique_filename(base_filename: &str, dir: &Path, own_uid: &str) -> CourseCalResult<String> {
    let base = base_filename.trim_end_matches(".ics");

    let base_path = dir.join(base_filename);
    if !base_path.exists() {
        return Ok(base_filename.to_string());
    }

    if holds_uid(&base_path, own_uid) {
        return Ok(base_filename.to_string());
    }

    for n in 2..=100 {
        let suffixed = format!("{}-{}.ics", base, n);
        let suffixed_path = dir.join(&suffixed);

        if !suffixed_path.exists() {
            return Ok(suffixed);
        }

        if holds_uid(&suffixed_path, own_uid) {
            return Ok(suffixed);
        }
    }

    Err(CourseCalError::Sink(format!(
        "Too many filename collisions for {}",
        base_filename
    )))
}

fn holds_uid(path: &Path, uid: &str) -> bool {
    match std::fs::read_to_string(path) {
        Ok(content) => content.contains(&format!("UID:{}", uid)),
        Err(_) => false,
    }
}

// =============================================================================
// Subprocess sink
// =============================================================================

/// Delegates persistence to an external sink binary.
#[derive(Clone)]
pub struct SinkProcess(String);

impl SinkProcess {
    pub fn from_name(name: &str) -> Self {
        SinkProcess(name.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    fn binary_path(&self) -> CourseCalResult<PathBuf> {
        let binary_name = format!("coursecal-sink-{}", self.0);
        let binary_path = which::which(&binary_name)
            .map_err(|_| CourseCalError::SinkNotInstalled(self.0.clone()))?;
        Ok(binary_path)
    }

    async fn call_with_timeout<R: DeserializeOwned>(
        &self,
        command: Command,
        params: serde_json::Value,
    ) -> CourseCalResult<R> {
        timeout(SINK_TIMEOUT, self.call(command, params))
            .await
            .map_err(|_| CourseCalError::SinkTimeout(SINK_TIMEOUT.as_secs()))?
    }

    async fn call<R: DeserializeOwned>(
        &self,
        command: Command,
        params: serde_json::Value,
    ) -> CourseCalResult<R> {
        let request = Request { command, params };
        let request_json = serde_json::to_string(&request)
            .map_err(|e| CourseCalError::Serialization(e.to_string()))?;

        let binary_path = self.binary_path()?;

        let mut child = tokio::process::Command::new(&binary_path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .spawn()
            .map_err(|e| {
                CourseCalError::Sink(format!("Failed to spawn {}: {}", binary_path.display(), e))
            })?;

        // Write request to stdin (unwrap safe: we piped stdin above)
        let mut stdin = child.stdin.take().unwrap();
        stdin
            .write_all(format!("{request_json}\n").as_bytes())
            .await?;
        drop(stdin);

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(CourseCalError::Sink(format!(
                "Sink exited with status: {}",
                output.status.code().unwrap_or(-1)
            )));
        }

        let response_str = String::from_utf8_lossy(&output.stdout);
        if response_str.is_empty() {
            return Err(CourseCalError::Sink("Sink returned no response".into()));
        }

        let response: Response<R> = serde_json::from_str(&response_str)
            .map_err(|e| CourseCalError::Sink(format!("Failed to parse response: {}", e)))?;

        match response {
            Response::Success { data } => Ok(data),
            Response::Error { error } => Err(CourseCalError::Sink(error)),
        }
    }
}

#[async_trait::async_trait]
impl CalendarSink for SinkProcess {
    async fn request_access(&self) -> CourseCalResult<bool> {
        self.call_with_timeout(Command::RequestAccess, serde_json::json!({}))
            .await
    }

    async fn save(&self, event: &EventDescriptor) -> CourseCalResult<()> {
        let params = serde_json::to_value(event)
            .map_err(|e| CourseCalError::Serialization(e.to_string()))?;
        self.call_with_timeout(Command::SaveEvent, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Frequency, Instant, RecurrenceSpec};
    use crate::weekday::Weekday;
    use chrono::NaiveDate;

    fn make_test_event(title: &str) -> EventDescriptor {
        let date = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
        EventDescriptor {
            title: title.to_string(),
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
                days_of_week: [Weekday::Monday].into_iter().collect(),
                until: NaiveDate::from_ymd_opt(2025, 5, 30).unwrap(),
            },
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Linear Algebra"), "linear-algebra");
        assert_eq!(slugify("Intro: CS 101!"), "intro-cs-101");
        assert_eq!(slugify("  Lots   of   spaces  "), "lots-of-spaces");
    }

    #[test]
    fn test_slugify_truncates_long_titles() {
        let long_title = "a".repeat(100);
        assert_eq!(slugify(&long_title).len(), 50);
    }

    #[test]
    fn test_generate_base_filename() {
        let event = make_test_event("Linear Algebra");
        assert_eq!(
            generate_base_filename(&event),
            "_recurring__linear-algebra.ics"
        );
    }

    #[test]
    fn test_generate_base_filename_untitled() {
        let event = make_test_event("");
        assert_eq!(generate_base_filename(&event), "_recurring__course.ics");
    }
}
