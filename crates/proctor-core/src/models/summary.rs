//! Plan summary model for efficient listing.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Plan summary with block counts, read from the `plan_summaries` view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanSummary {
    /// Unique identifier for the plan
    pub id: u64,

    /// The goal the plan was built from
    pub goal: String,

    /// Timestamp when the plan was created (UTC)
    pub created_at: Timestamp,

    /// Total number of blocks
    pub total_blocks: u32,

    /// Blocks with an accepted check-in
    pub checked_in_blocks: u32,

    /// Blocks that ran out of reminders without a check-in
    pub exhausted_blocks: u32,

    /// Blocks still pending or reminded
    pub open_blocks: u32,
}
