//! Subcommand arguments and their handlers.
//!
//! Argument structs carry the clap derives and convert into the core
//! parameter types with `From`, so validation happens once in the core:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Supervisor
//! ```

use std::{future::Future, io, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand};
use jiff::{
    civil::{Date, Time},
    Timestamp,
};
use log::{error, info};
use proctor_core::{
    config::parse_clock,
    display::{
        CheckInHistory, CheckIns, CreateResult, DayBlocks, Notifications, PlanSummaries,
        ZonedDisplay,
    },
    params::{AddBlock, CreatePlan, Id, RecentCheckIns, SubmitCheckIn},
    Supervisor,
};

use crate::renderer::TerminalRenderer;

fn clock_arg(value: &str) -> std::result::Result<Time, String> {
    parse_clock(value).map_err(|e| e.to_string())
}

/// Create a plan for a goal
#[derive(Args)]
pub struct CreatePlanArgs {
    /// The long-term goal, e.g. "Learn Rust in a month"
    pub goal: String,
}

impl From<CreatePlanArgs> for CreatePlan {
    fn from(val: CreatePlanArgs) -> Self {
        CreatePlan { goal: val.goal }
    }
}

/// Show a plan with all of its blocks
#[derive(Args)]
pub struct ShowPlanArgs {
    #[arg(help = "Unique identifier of the plan to show")]
    pub id: u64,
}

impl From<ShowPlanArgs> for Id {
    fn from(val: ShowPlanArgs) -> Self {
        Id { id: val.id }
    }
}

/// Add a block to an existing plan by hand
///
/// Times are local wall-clock times in the configured zone. The block may lie
/// outside the plan's horizon but must not overlap another block on the same
/// day.
#[derive(Args)]
pub struct AddBlockArgs {
    #[arg(help = "Unique identifier of the plan to add the block to")]
    pub plan_id: u64,
    #[arg(help = "Day of the block as YYYY-MM-DD")]
    pub day: Date,
    #[arg(value_parser = clock_arg, help = "Start time as HH:MM")]
    pub start: Time,
    #[arg(value_parser = clock_arg, help = "End time as HH:MM")]
    pub end: Time,
    /// Short label for the block
    pub title: String,
    #[arg(
        short,
        long,
        help = "What must be done and how completion is verified"
    )]
    pub description: Option<String>,
}

impl From<AddBlockArgs> for AddBlock {
    fn from(val: AddBlockArgs) -> Self {
        AddBlock {
            plan_id: val.plan_id,
            day: val.day,
            start: val.start,
            end: val.end,
            title: val.title,
            description: val.description,
        }
    }
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Create a plan for a goal
    #[command(alias = "c")]
    Create(CreatePlanArgs),
    /// List all plans
    #[command(aliases = ["l", "ls"])]
    List,
    /// Show a plan with all of its blocks
    #[command(alias = "s")]
    Show(ShowPlanArgs),
    /// Add a block to an existing plan
    #[command(alias = "a")]
    AddBlock(AddBlockArgs),
}

/// Report work done on a block
#[derive(Args)]
pub struct SubmitArgs {
    #[arg(help = "Unique identifier of the block to check in")]
    pub block_id: u64,
    /// What you did
    pub report: String,
    #[arg(
        short,
        long,
        value_delimiter = ',',
        help = "Evidence such as commit hashes, links or note excerpts as comma-separated list"
    )]
    pub evidence: Vec<String>,
    #[arg(short, long, help = "How well it went, from 0 to 10")]
    pub self_score: Option<u8>,
}

impl From<SubmitArgs> for SubmitCheckIn {
    fn from(val: SubmitArgs) -> Self {
        SubmitCheckIn {
            block_id: val.block_id,
            report: val.report,
            evidence: val.evidence,
            self_score: val.self_score,
        }
    }
}

/// List the check-ins recorded for a block
#[derive(Args)]
pub struct ListCheckInsArgs {
    #[arg(help = "Unique identifier of the block")]
    pub block_id: u64,
}

impl From<ListCheckInsArgs> for Id {
    fn from(val: ListCheckInsArgs) -> Self {
        Id { id: val.block_id }
    }
}

/// Show the latest check-ins across all blocks
#[derive(Args)]
pub struct HistoryArgs {
    #[arg(
        short = 'n',
        long,
        default_value_t = RecentCheckIns::default().limit,
        help = "Number of check-ins to show"
    )]
    pub limit: u32,
}

impl From<HistoryArgs> for RecentCheckIns {
    fn from(val: HistoryArgs) -> Self {
        RecentCheckIns { limit: val.limit }
    }
}

#[derive(Subcommand)]
pub enum CheckInCommands {
    /// Report work done on a block
    #[command(alias = "s")]
    Submit(SubmitArgs),
    /// List the check-ins recorded for a block
    #[command(aliases = ["l", "ls"])]
    List(ListCheckInsArgs),
    /// Show the latest check-ins across all blocks
    #[command(alias = "h")]
    History(HistoryArgs),
}

/// Show the blocks scheduled for a day
#[derive(Args)]
pub struct TodayArgs {
    #[arg(long, help = "Day to show as YYYY-MM-DD instead of today")]
    pub day: Option<Date>,
}

/// Run one reminder pass
#[derive(Args)]
pub struct TickArgs {
    #[arg(
        long,
        help = "Evaluate at this RFC 3339 instant instead of now, e.g. 2026-03-02T21:00:00Z"
    )]
    pub at: Option<Timestamp>,
}

/// Export the store as JSON
#[derive(Args)]
pub struct ExportArgs {
    #[arg(short, long, help = "Write to this file instead of standard output")]
    pub output: Option<PathBuf>,
}

/// Resolves when `signal` reports shutdown. A signal that fails is logged and
/// never resolves, so the loop keeps running instead of exiting silently.
pub async fn shutdown_signal<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!("Failed to listen for Ctrl-C: {e}; stop proctor with a signal instead");
        std::future::pending::<()>().await;
    }
}

/// Runs one command against the supervisor and renders the result.
pub struct Cli {
    supervisor: Supervisor,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(supervisor: Supervisor, renderer: TerminalRenderer) -> Self {
        Self {
            supervisor,
            renderer,
        }
    }

    fn render_zoned<T: ZonedDisplay>(&self, value: &T) -> Result<()> {
        self.renderer
            .render(&value.in_zone(self.supervisor.time_zone()).to_string())
    }

    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::Create(args) => {
                let plan = self
                    .supervisor
                    .create_plan(&args.into(), Timestamp::now())
                    .await
                    .context("Failed to create plan")?;
                self.render_zoned(&CreateResult::new(plan))
            }
            PlanCommands::List => self.list_plans().await,
            PlanCommands::Show(args) => {
                let id: Id = args.into();
                let plan = self
                    .supervisor
                    .get_plan(&id)
                    .await
                    .context("Failed to load plan")?
                    .ok_or_else(|| anyhow!("Plan with ID {} not found", id.id))?;
                self.render_zoned(&plan)
            }
            PlanCommands::AddBlock(args) => {
                let block = self
                    .supervisor
                    .add_block(&args.into(), Timestamp::now())
                    .await
                    .context("Failed to add block")?;
                self.render_zoned(&CreateResult::new(block))
            }
        }
    }

    pub async fn handle_checkin_command(&self, command: CheckInCommands) -> Result<()> {
        match command {
            CheckInCommands::Submit(args) => {
                let check_in = self
                    .supervisor
                    .submit_check_in(&args.into(), Timestamp::now())
                    .await
                    .context("Failed to submit check-in")?;
                self.render_zoned(&CreateResult::new(check_in))
            }
            CheckInCommands::List(args) => {
                let check_ins = self
                    .supervisor
                    .check_ins_for_block(&args.into())
                    .await
                    .context("Failed to list check-ins")?;
                self.render_zoned(&CheckIns(check_ins))
            }
            CheckInCommands::History(args) => {
                let entries = self
                    .supervisor
                    .recent_check_ins(&args.into())
                    .await
                    .context("Failed to load check-in history")?;
                self.render_zoned(&CheckInHistory(entries))
            }
        }
    }

    pub async fn today(&self, args: TodayArgs) -> Result<()> {
        let day = args
            .day
            .unwrap_or_else(|| self.supervisor.today(Timestamp::now()));
        let blocks = self
            .supervisor
            .blocks_for_day(day)
            .await
            .context("Failed to list blocks")?;
        self.render_zoned(&DayBlocks { day, blocks })
    }

    pub async fn list_plans(&self) -> Result<()> {
        let plans = self
            .supervisor
            .list_plans()
            .await
            .context("Failed to list plans")?;
        self.render_zoned(&PlanSummaries(plans))
    }

    pub async fn tick(&self, args: TickArgs) -> Result<()> {
        let now = args.at.unwrap_or_else(Timestamp::now);
        let notifications = self
            .supervisor
            .tick(now)
            .await
            .context("Reminder pass failed")?;
        self.renderer.render(&Notifications(notifications).to_string())
    }

    /// Blocks until Ctrl-C. Reminders reach the terminal through the sink the
    /// supervisor was built with.
    pub async fn watch(&self) -> Result<()> {
        info!(
            "Watching {} for due blocks",
            self.supervisor.database_path().display()
        );
        self.supervisor
            .watch(shutdown_signal(tokio::signal::ctrl_c()))
            .await
            .context("Reminder loop failed")
    }

    pub async fn export(&self, args: ExportArgs) -> Result<()> {
        let document = self
            .supervisor
            .export(Timestamp::now())
            .await
            .context("Failed to read store")?;
        match args.output {
            Some(path) => {
                document
                    .write_to(&path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                self.renderer.render(&format!(
                    "Exported {} plans, {} blocks and {} check-ins to {}\n",
                    document.plans.len(),
                    document.blocks.len(),
                    document.check_ins.len(),
                    path.display()
                ))
            }
            None => {
                println!("{}", document.to_json().context("Failed to encode export")?);
                Ok(())
            }
        }
    }
}
