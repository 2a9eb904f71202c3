//! Goal decomposition into task blocks.
//!
//! [`Planner::create_plan`] computes the horizon, asks the [`Advisor`] for a
//! breakdown and validates the whole proposal. If the advisor fails, times
//! out or proposes anything invalid, the deterministic template from
//! [`fallback`] is used instead. The plan and all of its blocks are written in
//! one transaction.

use std::{path::PathBuf, sync::Arc, time::Duration};

use jiff::{
    civil::{Date, Time},
    tz::TimeZone,
    Timestamp,
};
use log::{debug, info, warn};

use crate::{
    collaborator::{Advisor, DecomposeRequest, Proposal},
    db::run_blocking,
    error::{CollaboratorError, ProctorError, Result},
    models::{plan::horizon_from, NewPlan, Plan, PlanSummary, Source, TaskBlock},
    params::{AddBlock, CreatePlan, Id},
};

pub mod fallback;
pub mod proposal;

pub use fallback::fallback_blocks;
pub use proposal::validate_proposal;

const DEFAULT_BLOCK_DESCRIPTION: &str = "Acceptance: provide verifiable evidence";

/// Creates plans and blocks and reads them back.
pub struct Planner {
    pub(crate) db_path: PathBuf,
    pub(crate) advisor: Arc<dyn Advisor>,
    pub(crate) time_zone: TimeZone,
    pub(crate) horizon_days: u16,
    pub(crate) slots: Vec<(Time, Time)>,
    pub(crate) timeout: Duration,
}

impl Planner {
    /// The local date of `now` in the configured zone.
    pub fn today(&self, now: Timestamp) -> Date {
        now.to_zoned(self.time_zone.clone()).date()
    }

    /// The horizon days starting on the local date of `now`.
    pub fn horizon(&self, now: Timestamp) -> Result<Vec<Date>> {
        let today = self.today(now);
        horizon_from(today, self.horizon_days).map_err(|e| {
            ProctorError::invalid_input("horizon", format!("Cannot build horizon from {today}: {e}"))
        })
    }

    async fn ask_advisor(
        &self,
        request: &DecomposeRequest,
    ) -> std::result::Result<Proposal, CollaboratorError> {
        match tokio::time::timeout(self.timeout, self.advisor.decompose(request)).await {
            Ok(result) => result,
            Err(_) => Err(CollaboratorError::Timeout {
                seconds: self.timeout.as_secs(),
            }),
        }
    }

    /// Builds and stores a plan for `goal`, created at `now`.
    pub async fn create_plan(&self, params: &CreatePlan, now: Timestamp) -> Result<Plan> {
        params.validate()?;
        let goal = params.goal.trim().to_string();
        let horizon = self.horizon(now)?;

        let request = DecomposeRequest {
            goal: goal.clone(),
            horizon: horizon.clone(),
        };
        let accepted = match self.ask_advisor(&request).await {
            Ok(proposal) => match validate_proposal(&proposal, &horizon, &self.time_zone) {
                Ok(blocks) => Some((proposal.advice, blocks)),
                Err(reason) => {
                    warn!("Rejected advisor proposal for '{goal}': {reason}; using fallback template");
                    None
                }
            },
            Err(e) => {
                warn!("Advisor unavailable for '{goal}': {e}; using fallback template");
                None
            }
        };

        let (origin, advice, blocks) = match accepted {
            Some((advice, blocks)) => (Source::Collaborator, advice, blocks),
            None => (
                Source::Fallback,
                None,
                fallback_blocks(&goal, &horizon, &self.slots, &self.time_zone)?,
            ),
        };

        let new_plan = NewPlan {
            goal,
            advice,
            origin,
            horizon,
            created_at: now,
            blocks,
        };
        let plan = run_blocking(&self.db_path, move |db| db.insert_plan(&new_plan)).await?;

        info!(
            "Created plan {} with {} blocks ({})",
            plan.id,
            plan.blocks.len(),
            plan.origin.as_str()
        );
        Ok(plan)
    }

    /// Adds a manual block to an existing plan. The block may lie in the
    /// past, in which case it is due on the next tick.
    pub async fn add_block(&self, params: &AddBlock, now: Timestamp) -> Result<TaskBlock> {
        params.validate()?;
        let description = params
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_BLOCK_DESCRIPTION)
            .to_string();

        let block = proposal::local_block(
            params.day,
            params.start,
            params.end,
            &params.title,
            &description,
            &self.time_zone,
        )?;

        let plan_id = params.plan_id;
        let block =
            run_blocking(&self.db_path, move |db| db.add_block(plan_id, &block, now)).await?;

        debug!("Added block {} to plan {}", block.id, block.plan_id);
        Ok(block)
    }

    /// Retrieves a plan with its blocks.
    pub async fn get_plan(&self, params: &Id) -> Result<Option<Plan>> {
        let plan_id = params.id;
        run_blocking(&self.db_path, move |db| db.get_plan(plan_id)).await
    }

    /// Lists every plan with its block counts, newest first.
    pub async fn list_plans(&self) -> Result<Vec<PlanSummary>> {
        run_blocking(&self.db_path, |db| db.list_plan_summaries()).await
    }

    /// Blocks of every plan scheduled on a local day, by start time.
    pub async fn blocks_for_day(&self, day: Date) -> Result<Vec<TaskBlock>> {
        run_blocking(&self.db_path, move |db| db.blocks_for_day(day)).await
    }

    /// Retrieves a single block.
    pub async fn get_block(&self, params: &Id) -> Result<Option<TaskBlock>> {
        let block_id = params.id;
        run_blocking(&self.db_path, move |db| db.get_block(block_id)).await
    }
}
