//! SQLite store for plans, task blocks and check-ins.
//!
//! Every multi-row write runs in a single transaction, so a failure or crash
//! mid-operation leaves previously committed rows intact and nothing of the
//! failed operation behind. Read-modify-write on a block takes an IMMEDIATE
//! transaction: the write lock is held from the read onwards, which
//! serializes a scheduler tick and a check-in touching the same block.

use std::{path::Path, time::Duration};

use rusqlite::Connection;
use tokio::task;

use crate::error::{DatabaseResultExt, ProctorError, Result};

pub mod block_queries;
pub mod checkin_queries;
pub mod export_queries;
pub mod migrations;
pub mod plan_queries;
pub mod utils;

/// How long a connection waits for another writer before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens (or creates) the database file and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .db_context("Failed to set busy timeout")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}

/// Opens a fresh connection on the blocking pool and runs `op` with it.
pub(crate) async fn run_blocking<T, F>(path: &Path, op: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
{
    let path = path.to_path_buf();
    task::spawn_blocking(move || {
        let mut db = Database::new(&path)?;
        op(&mut db)
    })
    .await
    .map_err(ProctorError::join)?
}
