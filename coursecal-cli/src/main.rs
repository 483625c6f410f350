mod commands;
mod utils;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "coursecal")]
#[command(about = "Turn a course schedule into a recurring calendar event")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Course fields shared by `add` and `preview`. Anything missing is
/// prompted for interactively.
#[derive(Args)]
struct CourseArgs {
    /// Course name
    #[arg(short, long)]
    name: Option<String>,

    /// Where the course meets
    #[arg(short, long)]
    location: Option<String>,

    /// Who teaches it
    #[arg(short, long)]
    instructor: Option<String>,

    /// Start time (HH:MM)
    #[arg(short, long)]
    start: Option<String>,

    /// End time (HH:MM)
    #[arg(short, long)]
    end: Option<String>,

    /// Class length (e.g. "1h 30m"), alternative to --end
    #[arg(short, long, conflicts_with = "end")]
    duration: Option<String>,

    /// Meeting days, comma-separated (e.g. "mon,wed,fri")
    #[arg(long)]
    days: Option<String>,

    /// Semester end date (YYYY-MM-DD)
    #[arg(short, long)]
    until: Option<String>,

    /// Anchor date for the first occurrence (YYYY-MM-DD, default: today)
    #[arg(long)]
    date: Option<String>,

    /// IANA timezone (default: config, then the system zone)
    #[arg(long)]
    timezone: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a course to the calendar
    Add {
        #[command(flatten)]
        course: CourseArgs,

        /// External sink name (default: config, then the calendar directory)
        #[arg(long)]
        sink: Option<String>,
    },

    /// Build a course event and print it without saving
    Preview {
        #[command(flatten)]
        course: CourseArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Add { course, sink } => commands::add::run(course, sink).await,
        Commands::Preview { course } => commands::preview::run(course),
    }
}
