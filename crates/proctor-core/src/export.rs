//! Portable JSON snapshot of the store.

use std::path::{Path, PathBuf};

use jiff::Timestamp;

use crate::{
    db::run_blocking,
    error::{ProctorError, Result},
    models::ExportDocument,
};

/// Reads the whole store into an [`ExportDocument`].
pub struct Exporter {
    pub(crate) db_path: PathBuf,
}

impl Exporter {
    /// Snapshot of every plan, block and check-in, stamped with `now`.
    pub async fn read_all(&self, now: Timestamp) -> Result<ExportDocument> {
        run_blocking(&self.db_path, move |db| db.read_all(now)).await
    }
}

impl ExportDocument {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the pretty-printed JSON to `path`, replacing any existing file.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| ProctorError::FileSystem {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
