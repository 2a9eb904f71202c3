//! High-level entry point tying the planner, the reminder scheduler, the
//! check-in processor and the exporter to one store.
//!
//! Every store access opens its own connection on the blocking thread pool,
//! so a `Supervisor` can be shared freely between tasks.
//!
//! ```rust
//! use proctor_core::{params::CreatePlan, SupervisorBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let supervisor = SupervisorBuilder::new()
//!     .with_database_path(Some("proctor.db"))
//!     .build()
//!     .await?;
//!
//! let now = jiff::Timestamp::now();
//! let plan = supervisor
//!     .create_plan(&CreatePlan { goal: "Learn Rust".to_string() }, now)
//!     .await?;
//! println!("{plan}");
//!
//! for notification in supervisor.tick(now).await? {
//!     println!("{notification}");
//! }
//! # Ok(())
//! # }
//! ```

use std::{
    future::Future,
    path::{Path, PathBuf},
};

use jiff::{civil::Date, tz::TimeZone, Timestamp};

use crate::{
    checkin::CheckInProcessor,
    config::Config,
    error::Result,
    export::Exporter,
    models::{
        CheckIn, CheckInEntry, ExportDocument, Notification, Plan, PlanSummary, TaskBlock,
    },
    params::{AddBlock, CreatePlan, Id, RecentCheckIns, SubmitCheckIn},
    planner::Planner,
    scheduler::ReminderScheduler,
};

pub mod builder;

pub use builder::SupervisorBuilder;

/// Study supervision engine over one SQLite store.
pub struct Supervisor {
    db_path: PathBuf,
    config: Config,
    time_zone: TimeZone,
    planner: Planner,
    scheduler: ReminderScheduler,
    checkins: CheckInProcessor,
    exporter: Exporter,
}

impl Supervisor {
    pub fn database_path(&self) -> &Path {
        &self.db_path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Zone used for horizons and local block times.
    pub fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    pub fn scheduler(&self) -> &ReminderScheduler {
        &self.scheduler
    }

    /// Creates a plan for a goal. See [`Planner::create_plan`].
    pub async fn create_plan(&self, params: &CreatePlan, now: Timestamp) -> Result<Plan> {
        self.planner.create_plan(params, now).await
    }

    /// Adds a manual block to a plan.
    pub async fn add_block(&self, params: &AddBlock, now: Timestamp) -> Result<TaskBlock> {
        self.planner.add_block(params, now).await
    }

    pub async fn get_plan(&self, params: &Id) -> Result<Option<Plan>> {
        self.planner.get_plan(params).await
    }

    pub async fn list_plans(&self) -> Result<Vec<PlanSummary>> {
        self.planner.list_plans().await
    }

    pub async fn get_block(&self, params: &Id) -> Result<Option<TaskBlock>> {
        self.planner.get_block(params).await
    }

    /// The local date of `now` in the configured zone.
    pub fn today(&self, now: Timestamp) -> Date {
        self.planner.today(now)
    }

    /// Blocks of every plan scheduled on `day`.
    pub async fn blocks_for_day(&self, day: Date) -> Result<Vec<TaskBlock>> {
        self.planner.blocks_for_day(day).await
    }

    /// One reminder pass. See [`ReminderScheduler::tick`].
    pub async fn tick(&self, now: Timestamp) -> Result<Vec<Notification>> {
        self.scheduler.tick(now).await
    }

    /// Runs the reminder loop at the configured poll interval until
    /// `shutdown` resolves.
    pub async fn watch<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        self.scheduler
            .run(self.config.reminders.poll_interval(), shutdown)
            .await
    }

    /// Submits a check-in. See [`CheckInProcessor::submit`].
    pub async fn submit_check_in(&self, params: &SubmitCheckIn, now: Timestamp) -> Result<CheckIn> {
        self.checkins.submit(params, now).await
    }

    pub async fn check_ins_for_block(&self, params: &Id) -> Result<Vec<CheckIn>> {
        self.checkins.list_check_ins(params).await
    }

    /// Check-in history across all blocks, newest first.
    pub async fn recent_check_ins(&self, params: &RecentCheckIns) -> Result<Vec<CheckInEntry>> {
        self.checkins.recent_check_ins(params).await
    }

    /// Snapshot of the whole store.
    pub async fn export(&self, now: Timestamp) -> Result<ExportDocument> {
        self.exporter.read_all(now).await
    }
}
