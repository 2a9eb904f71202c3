//! Portable snapshot of everything the store holds.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{CheckIn, Plan, TaskBlock};

/// Full dump produced by the exporter. Plans carry no nested blocks here;
/// blocks and check-ins are listed flat and reference their owners by ID.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportDocument {
    pub exported_at: Timestamp,
    pub schema_version: u32,
    pub plans: Vec<Plan>,
    pub blocks: Vec<TaskBlock>,
    pub check_ins: Vec<CheckIn>,
}
