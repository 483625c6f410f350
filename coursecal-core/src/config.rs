//! Global coursecal configuration.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{CourseCalError, CourseCalResult};

static DEFAULT_CALENDAR_DIR: &str = "~/calendar/courses";

fn default_calendar_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CALENDAR_DIR)
}

/// Global configuration at ~/.config/coursecal/config.toml
#[derive(Deserialize, Clone)]
pub struct GlobalConfig {
    /// Where course .ics files land when no external sink is configured.
    #[serde(default = "default_calendar_dir")]
    pub calendar_dir: PathBuf,

    /// IANA timezone name; the machine's zone when unset.
    pub timezone: Option<String>,

    /// External sink name (`coursecal-sink-<name>`); events are written
    /// into `calendar_dir` when unset.
    pub sink: Option<String>,
}

impl GlobalConfig {
    pub fn config_path() -> CourseCalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CourseCalError::Config("Could not determine config directory".into()))?
            .join("coursecal");

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> CourseCalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        let config: GlobalConfig = config::Config::builder()
            .add_source(config::File::from(config_path).required(false))
            .build()
            .map_err(|e| CourseCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CourseCalError::Config(e.to_string()))?;

        Ok(config)
    }

    /// Calendar directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str =
            shellexpand::tilde(&self.calendar_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// Calendar directory in display-friendly form, keeping `~` instead
    /// of expanding to the full home directory.
    pub fn display_path(&self) -> PathBuf {
        self.calendar_dir.clone()
    }

    /// Create a default config file with all options commented out.
    fn create_default_config(path: &std::path::Path) -> CourseCalResult<()> {
        let contents = format!(
            "\
# coursecal configuration

# Where course events are saved when no sink is configured:
# calendar_dir = \"{}\"

# IANA timezone for composing event times (default: system zone):
# timezone = \"Europe/Berlin\"

# External calendar sink (a `coursecal-sink-<name>` binary on PATH):
# sink = \"google\"
",
            DEFAULT_CALENDAR_DIR
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CourseCalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CourseCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
