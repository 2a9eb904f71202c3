//! Task block queries and the guarded read-modify-write used by the
//! scheduler.

use jiff::{civil::Date, Timestamp};
use rusqlite::{params, OptionalExtension, TransactionBehavior};

use super::utils::{id, optional_timestamp, parse_column, small_int};
use crate::{
    error::{DatabaseResultExt, ProctorError, Result},
    models::{NewBlock, TaskBlock},
};

const BLOCK_COLUMNS: &str = "id, plan_id, day, starts_at, ends_at, title, description, status, reminder_count, last_reminded_at, created_at";
const CHECK_PLAN_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM plans WHERE id = ?1)";
const INSERT_BLOCK_SQL: &str = "INSERT INTO task_blocks (plan_id, day, starts_at, ends_at, title, description, status, reminder_count, last_reminded_at, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'pending', 0, NULL, ?7)";
const SELECT_OPEN_BLOCK_IDS_SQL: &str =
    "SELECT id FROM task_blocks WHERE status IN ('pending', 'reminded') ORDER BY id";
const UPDATE_BLOCK_STATE_SQL: &str =
    "UPDATE task_blocks SET status = ?1, reminder_count = ?2, last_reminded_at = ?3 WHERE id = ?4";

impl super::Database {
    /// Builds a block from a row selected with [`BLOCK_COLUMNS`].
    pub(super) fn build_block_from_row(row: &rusqlite::Row) -> rusqlite::Result<TaskBlock> {
        Ok(TaskBlock {
            id: id(row, 0)?,
            plan_id: id(row, 1)?,
            day: parse_column(row, 2)?,
            starts_at: parse_column(row, 3)?,
            ends_at: parse_column(row, 4)?,
            title: row.get(5)?,
            description: row.get(6)?,
            status: parse_column(row, 7)?,
            reminder_count: small_int(row, 8)?,
            last_reminded_at: optional_timestamp(row, 9)?,
            created_at: parse_column(row, 10)?,
        })
    }

    pub(super) fn select_block_sql(filter: &str) -> String {
        format!("SELECT {BLOCK_COLUMNS} FROM task_blocks {filter}")
    }

    /// Inserts one block with the given connection or transaction.
    pub(super) fn insert_block_row(
        conn: &rusqlite::Connection,
        plan_id: u64,
        block: &NewBlock,
        created_at: Timestamp,
    ) -> Result<TaskBlock> {
        conn.execute(
            INSERT_BLOCK_SQL,
            params![
                plan_id as i64,
                block.day.to_string(),
                block.starts_at.to_string(),
                block.ends_at.to_string(),
                &block.title,
                &block.description,
                created_at.to_string(),
            ],
        )
        .db_context("Failed to insert task block")?;

        Ok(TaskBlock {
            id: conn.last_insert_rowid() as u64,
            plan_id,
            day: block.day,
            starts_at: block.starts_at,
            ends_at: block.ends_at,
            title: block.title.clone(),
            description: block.description.clone(),
            status: Default::default(),
            reminder_count: 0,
            last_reminded_at: None,
            created_at,
        })
    }

    /// Adds a single block to an existing plan.
    ///
    /// The block must not intersect another block of the plan on the same
    /// day. The check and the insert share one write transaction, so two
    /// concurrent adds cannot both claim the same time range.
    pub fn add_block(
        &mut self,
        plan_id: u64,
        block: &NewBlock,
        created_at: Timestamp,
    ) -> Result<TaskBlock> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let plan_exists: bool = tx
            .query_row(CHECK_PLAN_EXISTS_SQL, params![plan_id as i64], |row| {
                row.get(0)
            })
            .db_context("Failed to check plan existence")?;
        if !plan_exists {
            return Err(ProctorError::PlanNotFound { id: plan_id });
        }

        let same_day = Self::read_day_rows(&tx, plan_id, block.day)?;
        if let Some(existing) = same_day
            .iter()
            .find(|b| b.starts_at < block.ends_at && block.starts_at < b.ends_at)
        {
            return Err(ProctorError::invalid_input(
                "start",
                format!(
                    "Block overlaps block {} ({}) on {}",
                    existing.id, existing.title, block.day
                ),
            ));
        }

        let block = Self::insert_block_row(&tx, plan_id, block, created_at)?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(block)
    }

    fn read_day_rows(
        conn: &rusqlite::Connection,
        plan_id: u64,
        day: Date,
    ) -> Result<Vec<TaskBlock>> {
        let mut stmt = conn
            .prepare(&Self::select_block_sql("WHERE plan_id = ?1 AND day = ?2"))
            .db_context("Failed to prepare query")?;
        let blocks = stmt
            .query_map(
                params![plan_id as i64, day.to_string()],
                Self::build_block_from_row,
            )
            .db_context("Failed to query task blocks")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch task blocks")?;
        Ok(blocks)
    }

    /// Retrieves a single block by its ID.
    pub fn get_block(&self, block_id: u64) -> Result<Option<TaskBlock>> {
        self.connection
            .query_row(
                &Self::select_block_sql("WHERE id = ?1"),
                params![block_id as i64],
                Self::build_block_from_row,
            )
            .optional()
            .db_context("Failed to get task block")
    }

    /// Retrieves all blocks of a plan ordered by start time.
    pub fn get_blocks(&self, plan_id: u64) -> Result<Vec<TaskBlock>> {
        let mut stmt = self
            .connection
            .prepare(&Self::select_block_sql(
                "WHERE plan_id = ?1 ORDER BY id",
            ))
            .db_context("Failed to prepare query")?;

        let mut blocks = stmt
            .query_map(params![plan_id as i64], Self::build_block_from_row)
            .db_context("Failed to query task blocks")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch task blocks")?;

        // Stored timestamps omit zero fractions, so text order is not time order.
        blocks.sort_by(|a, b| a.starts_at.cmp(&b.starts_at).then(a.id.cmp(&b.id)));
        Ok(blocks)
    }

    /// Blocks of every plan scheduled on `day`, ordered by start time.
    pub fn blocks_for_day(&self, day: Date) -> Result<Vec<TaskBlock>> {
        let mut stmt = self
            .connection
            .prepare(&Self::select_block_sql("WHERE day = ?1 ORDER BY id"))
            .db_context("Failed to prepare query")?;

        let mut blocks = stmt
            .query_map(params![day.to_string()], Self::build_block_from_row)
            .db_context("Failed to query task blocks")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch task blocks")?;

        blocks.sort_by(|a, b| a.starts_at.cmp(&b.starts_at).then(a.id.cmp(&b.id)));
        Ok(blocks)
    }

    /// IDs of every block the scheduler may still have to remind, without
    /// decoding the rows. Decoding happens per block so one bad row cannot
    /// hide the others.
    pub fn open_block_ids(&self) -> Result<Vec<u64>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_OPEN_BLOCK_IDS_SQL)
            .db_context("Failed to prepare query")?;

        let ids = stmt
            .query_map([], |row| id(row, 0))
            .db_context("Failed to query open blocks")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch open blocks")?;

        Ok(ids)
    }

    /// Reads a block and lets `decide` compute its next state while holding
    /// the write lock.
    ///
    /// `decide` returns the block to store (or `None` to leave it untouched)
    /// plus a value handed back to the caller. The status, reminder count and
    /// last reminder time are written together and committed before
    /// returning, so no reader ever sees one without the others.
    pub fn update_block_with<T, F>(&mut self, block_id: u64, decide: F) -> Result<T>
    where
        F: FnOnce(&TaskBlock) -> Result<(Option<TaskBlock>, T)>,
    {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let current = Self::read_block_row(&tx, block_id)?;
        let (next, outcome) = decide(&current)?;
        if let Some(next) = next {
            Self::write_block_state(&tx, &next)?;
            tx.commit().db_context("Failed to commit transaction")?;
        }
        Ok(outcome)
    }

    /// Reads one block, reporting undecodable rows as [`ProctorError::Corrupt`].
    pub(super) fn read_block_row(conn: &rusqlite::Connection, block_id: u64) -> Result<TaskBlock> {
        conn.query_row(
            &Self::select_block_sql("WHERE id = ?1"),
            params![block_id as i64],
            Self::build_block_from_row,
        )
        .optional()
        .map_err(|e| match e {
            rusqlite::Error::FromSqlConversionFailure(_, _, reason) => ProctorError::Corrupt {
                table: "task_blocks",
                id: block_id,
                reason: reason.to_string(),
            },
            other => ProctorError::database("Failed to read task block", other),
        })?
        .ok_or(ProctorError::BlockNotFound { id: block_id })
    }

    /// Persists the mutable fields of a block.
    pub(super) fn write_block_state(conn: &rusqlite::Connection, block: &TaskBlock) -> Result<()> {
        let updated = conn
            .execute(
                UPDATE_BLOCK_STATE_SQL,
                params![
                    block.status.as_str(),
                    i64::from(block.reminder_count),
                    block.last_reminded_at.map(|t| t.to_string()),
                    block.id as i64,
                ],
            )
            .db_context("Failed to update task block")?;
        if updated == 0 {
            return Err(ProctorError::BlockNotFound { id: block.id });
        }
        Ok(())
    }
}
