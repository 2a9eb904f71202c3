//! Whole-store snapshot for export.

use jiff::Timestamp;
use rusqlite::Row;

use super::{
    checkin_queries::SELECT_CHECK_IN_SQL, migrations::SCHEMA_VERSION, plan_queries::SELECT_PLAN_SQL,
};
use crate::{
    error::{DatabaseResultExt, Result},
    models::ExportDocument,
};

/// Runs `sql` and decodes every row with `build`.
fn fetch_all<T>(
    conn: &rusqlite::Connection,
    sql: &str,
    build: fn(&Row) -> rusqlite::Result<T>,
) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql).db_context("Failed to prepare query")?;
    let rows = stmt
        .query_map([], build)
        .db_context("Failed to query export rows")?
        .collect::<std::result::Result<Vec<_>, _>>()
        .db_context("Failed to fetch export rows")?;
    Ok(rows)
}

impl super::Database {
    /// Reads every plan, block and check-in inside one read transaction, so
    /// the document reflects a single point in time.
    pub fn read_all(&mut self, exported_at: Timestamp) -> Result<ExportDocument> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let plans = fetch_all(
            &tx,
            &format!("{SELECT_PLAN_SQL} ORDER BY id"),
            Self::build_plan_from_row,
        )?;
        let blocks = fetch_all(
            &tx,
            &Self::select_block_sql("ORDER BY id"),
            Self::build_block_from_row,
        )?;
        let check_ins = fetch_all(
            &tx,
            &format!("{SELECT_CHECK_IN_SQL} ORDER BY id"),
            Self::build_check_in_from_row,
        )?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(ExportDocument {
            exported_at,
            schema_version: SCHEMA_VERSION,
            plans,
            blocks,
            check_ins,
        })
    }
}
