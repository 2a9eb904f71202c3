//! Database schema initialization.

use crate::error::{DatabaseResultExt, ProctorError, Result};

/// Version written by `assets/schema.sql`.
pub const SCHEMA_VERSION: u32 = 1;

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        // journal_mode answers with the resulting mode, so it has to be read
        // as a row.
        let _mode: String = self
            .connection
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
            .db_context("Failed to enable write-ahead logging")?;

        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        let version = self.schema_version()?;
        if version > SCHEMA_VERSION {
            return Err(ProctorError::configuration(format!(
                "Database schema version {version} is newer than supported version {SCHEMA_VERSION}"
            )));
        }

        Ok(())
    }

    /// Reads the schema version recorded in the `meta` table.
    pub fn schema_version(&self) -> Result<u32> {
        let raw: String = self
            .connection
            .query_row(
                "SELECT value FROM meta WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .db_context("Failed to read schema version")?;
        raw.parse().map_err(|_| {
            ProctorError::configuration(format!("Invalid schema version in database: {raw}"))
        })
    }
}
