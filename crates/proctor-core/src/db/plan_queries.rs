//! Plan-related database queries.

use rusqlite::{params, OptionalExtension, TransactionBehavior};

use super::utils::{horizon, id, parse_column};
use crate::{
    error::{DatabaseResultExt, ProctorError, Result},
    models::{NewPlan, Plan, PlanSummary},
};

const INSERT_PLAN_SQL: &str = "INSERT INTO plans (goal, advice, origin, start_date, horizon_days, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
pub(super) const SELECT_PLAN_SQL: &str =
    "SELECT id, goal, advice, origin, start_date, horizon_days, created_at FROM plans";
const SELECT_SUMMARIES_SQL: &str = "SELECT id, goal, created_at, total_blocks, checked_in_blocks, exhausted_blocks, open_blocks FROM plan_summaries ORDER BY id DESC";

impl super::Database {
    /// Builds a plan without its blocks from a row selected with
    /// `SELECT_PLAN_SQL`.
    pub(super) fn build_plan_from_row(row: &rusqlite::Row) -> rusqlite::Result<Plan> {
        Ok(Plan {
            id: id(row, 0)?,
            goal: row.get(1)?,
            advice: row.get(2)?,
            origin: parse_column(row, 3)?,
            horizon: horizon(row, 4, 5)?,
            created_at: parse_column(row, 6)?,
            blocks: Vec::new(),
        })
    }

    /// Writes a plan and all its blocks atomically.
    ///
    /// Either every row lands or none does.
    pub fn insert_plan(&mut self, plan: &NewPlan) -> Result<Plan> {
        let start = plan
            .horizon
            .first()
            .copied()
            .ok_or_else(|| ProctorError::invalid_input("horizon", "Horizon cannot be empty"))?;
        let horizon_days = u16::try_from(plan.horizon.len())
            .map_err(|_| ProctorError::invalid_input("horizon", "Horizon is too long"))?;

        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        tx.execute(
            INSERT_PLAN_SQL,
            params![
                &plan.goal,
                &plan.advice,
                plan.origin.as_str(),
                start.to_string(),
                i64::from(horizon_days),
                plan.created_at.to_string(),
            ],
        )
        .db_context("Failed to insert plan")?;
        let plan_id = tx.last_insert_rowid() as u64;

        let mut blocks = plan
            .blocks
            .iter()
            .map(|block| Self::insert_block_row(&tx, plan_id, block, plan.created_at))
            .collect::<Result<Vec<_>>>()?;

        tx.commit().db_context("Failed to commit transaction")?;

        blocks.sort_by(|a, b| a.starts_at.cmp(&b.starts_at).then(a.id.cmp(&b.id)));

        Ok(Plan {
            id: plan_id,
            goal: plan.goal.clone(),
            advice: plan.advice.clone(),
            origin: plan.origin,
            horizon: plan.horizon.clone(),
            created_at: plan.created_at,
            blocks,
        })
    }

    /// Retrieves a plan with its blocks.
    pub fn get_plan(&self, plan_id: u64) -> Result<Option<Plan>> {
        let plan = self
            .connection
            .query_row(
                &format!("{SELECT_PLAN_SQL} WHERE id = ?1"),
                params![plan_id as i64],
                Self::build_plan_from_row,
            )
            .optional()
            .db_context("Failed to get plan")?;

        match plan {
            Some(mut plan) => {
                plan.blocks = self.get_blocks(plan_id)?;
                Ok(Some(plan))
            }
            None => Ok(None),
        }
    }

    /// Lists plan summaries with block counts, newest first.
    pub fn list_plan_summaries(&self) -> Result<Vec<PlanSummary>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_SUMMARIES_SQL)
            .db_context("Failed to prepare query")?;

        let count = |row: &rusqlite::Row, idx: usize| -> rusqlite::Result<u32> {
            let raw: i64 = row.get(idx)?;
            u32::try_from(raw).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    rusqlite::types::Type::Integer,
                    Box::new(e),
                )
            })
        };

        let summaries = stmt
            .query_map([], |row| {
                Ok(PlanSummary {
                    id: id(row, 0)?,
                    goal: row.get(1)?,
                    created_at: parse_column(row, 2)?,
                    total_blocks: count(row, 3)?,
                    checked_in_blocks: count(row, 4)?,
                    exhausted_blocks: count(row, 5)?,
                    open_blocks: count(row, 6)?,
                })
            })
            .db_context("Failed to query plan summaries")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch plan summaries")?;

        Ok(summaries)
    }
}
