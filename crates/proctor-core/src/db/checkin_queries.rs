//! Check-in persistence.

use rusqlite::{params, types::Type, TransactionBehavior};

use super::utils::{id, parse_column, small_int};
use crate::{
    error::{DatabaseResultExt, ProctorError, Result},
    models::{
        BlockEvent, BlockStatus, CheckIn, CheckInEntry, GradedCheckIn, Verdict, MAX_REMINDERS,
    },
};

const INSERT_CHECK_IN_SQL: &str = "INSERT INTO check_ins (block_id, submitted_at, report, evidence, verdict, feedback, feedback_source, suspicion, self_score, late) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";
pub(super) const SELECT_CHECK_IN_SQL: &str = "SELECT id, block_id, submitted_at, report, evidence, verdict, feedback, feedback_source, suspicion, self_score, late FROM check_ins";
const SELECT_RECENT_CHECK_INS_SQL: &str = "SELECT c.id, c.block_id, c.submitted_at, c.report, c.evidence, c.verdict, c.feedback, c.feedback_source, c.suspicion, c.self_score, c.late, b.title, b.day FROM check_ins c JOIN task_blocks b ON b.id = c.block_id ORDER BY c.id DESC LIMIT ?1";

impl super::Database {
    pub(super) fn build_check_in_from_row(row: &rusqlite::Row) -> rusqlite::Result<CheckIn> {
        let evidence: String = row.get(4)?;
        let evidence = serde_json::from_str(&evidence)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
        let self_score: Option<i64> = row.get(9)?;
        let self_score = self_score
            .map(|raw| {
                u8::try_from(raw).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(9, Type::Integer, Box::new(e))
                })
            })
            .transpose()?;

        Ok(CheckIn {
            id: id(row, 0)?,
            block_id: id(row, 1)?,
            submitted_at: parse_column(row, 2)?,
            report: row.get(3)?,
            evidence,
            verdict: parse_column(row, 5)?,
            feedback: row.get(6)?,
            feedback_source: parse_column(row, 7)?,
            suspicion: small_int(row, 8)?,
            self_score,
            late: row.get(10)?,
        })
    }

    /// Stores a graded check-in and applies its verdict to the block.
    ///
    /// The block is re-read under the write lock: if another submission was
    /// accepted in the meantime this fails with
    /// [`ProctorError::AlreadyCheckedIn`] and nothing is written. An accepted
    /// verdict moves the block to `CheckedIn`; a challenge leaves its status
    /// alone.
    pub fn record_check_in(&mut self, graded: &GradedCheckIn) -> Result<CheckIn> {
        let draft = &graded.draft;
        let evidence = serde_json::to_string(&draft.evidence)?;

        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let block = Self::read_block_row(&tx, draft.block_id)?;
        if block.status == BlockStatus::CheckedIn {
            return Err(ProctorError::AlreadyCheckedIn { id: block.id });
        }
        let late = block.status == BlockStatus::OverdueExhausted;

        tx.execute(
            INSERT_CHECK_IN_SQL,
            params![
                draft.block_id as i64,
                draft.submitted_at.to_string(),
                &draft.report,
                evidence,
                graded.verdict.as_str(),
                &graded.feedback,
                graded.feedback_source.as_str(),
                i64::from(draft.suspicion),
                draft.self_score.map(i64::from),
                late,
            ],
        )
        .db_context("Failed to insert check-in")?;
        let check_in_id = tx.last_insert_rowid() as u64;

        if graded.verdict == Verdict::Accepted {
            let next = block.apply(BlockEvent::Accepted, MAX_REMINDERS)?;
            Self::write_block_state(&tx, &next)?;
        }

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(CheckIn {
            id: check_in_id,
            block_id: draft.block_id,
            submitted_at: draft.submitted_at,
            report: draft.report.clone(),
            evidence: draft.evidence.clone(),
            verdict: graded.verdict,
            feedback: graded.feedback.clone(),
            feedback_source: graded.feedback_source,
            suspicion: draft.suspicion,
            self_score: draft.self_score,
            late,
        })
    }

    /// Check-ins recorded against a block, in submission order.
    pub fn get_check_ins(&self, block_id: u64) -> Result<Vec<CheckIn>> {
        let mut stmt = self
            .connection
            .prepare(&format!("{SELECT_CHECK_IN_SQL} WHERE block_id = ?1 ORDER BY id"))
            .db_context("Failed to prepare query")?;

        let check_ins = stmt
            .query_map(params![block_id as i64], Self::build_check_in_from_row)
            .db_context("Failed to query check-ins")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch check-ins")?;

        Ok(check_ins)
    }

    /// The latest `limit` check-ins across all blocks, newest first, each
    /// with the title and day of its block.
    pub fn recent_check_ins(&self, limit: u32) -> Result<Vec<CheckInEntry>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_RECENT_CHECK_INS_SQL)
            .db_context("Failed to prepare query")?;

        let entries = stmt
            .query_map(params![i64::from(limit)], |row| {
                Ok(CheckInEntry {
                    check_in: Self::build_check_in_from_row(row)?,
                    block_title: row.get(11)?,
                    block_day: parse_column(row, 12)?,
                })
            })
            .db_context("Failed to query check-ins")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch check-ins")?;

        Ok(entries)
    }
}
