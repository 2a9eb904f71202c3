use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{CheckInCommands, ExportArgs, PlanCommands, TickArgs, TodayArgs};

/// Study supervisor for long-term goals
///
/// Proctor breaks a goal into time-boxed task blocks, reminds you when a
/// block has ended without a check-in, and grades each check-in, asking for
/// evidence when a report is vague. Grading and planning use an
/// OpenAI-compatible endpoint when `OPENAI_API_KEY` is set and fall back to
/// built-in templates otherwise.
#[derive(Parser)]
#[command(version, about, name = "proctor")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/proctor/proctor.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Path to a TOML configuration file. Defaults to
    /// $XDG_CONFIG_HOME/proctor/config.toml when present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Proctor CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Manage plans and their blocks
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Submit and review check-ins
    #[command(alias = "c")]
    Checkin {
        #[command(subcommand)]
        command: CheckInCommands,
    },
    /// Show the blocks scheduled for today
    #[command(alias = "t")]
    Today(TodayArgs),
    /// Run one reminder pass and print the reminders sent
    Tick(TickArgs),
    /// Keep sending reminders until interrupted with Ctrl-C
    Watch,
    /// Write every plan, block and check-in as JSON
    Export(ExportArgs),
}
