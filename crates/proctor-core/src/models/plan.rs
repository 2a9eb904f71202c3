//! Plan model definition.

use jiff::{civil::Date, Span, Timestamp};
use serde::{Deserialize, Serialize};

use super::{NewBlock, Source, TaskBlock};

/// A goal decomposed into task blocks over a fixed horizon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    /// Unique identifier for the plan
    pub id: u64,

    /// The long-term goal as stated by the user
    pub goal: String,

    /// Advice returned by the advisory collaborator, if it answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advice: Option<String>,

    /// Whether the breakdown came from the collaborator or the template
    pub origin: Source,

    /// Ordered day buckets covered by the plan
    pub horizon: Vec<Date>,

    /// Timestamp when the plan was created (UTC)
    pub created_at: Timestamp,

    /// Blocks owned by the plan, ordered by start time
    #[serde(default)]
    pub blocks: Vec<TaskBlock>,
}

impl Plan {
    /// First day of the horizon.
    pub fn start_date(&self) -> Option<Date> {
        self.horizon.first().copied()
    }
}

/// A fully built plan waiting to be written in one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlan {
    pub goal: String,
    pub advice: Option<String>,
    pub origin: Source,
    pub horizon: Vec<Date>,
    pub created_at: Timestamp,
    pub blocks: Vec<NewBlock>,
}

/// The `days` consecutive civil dates starting at `start`.
pub fn horizon_from(start: Date, days: u16) -> Result<Vec<Date>, jiff::Error> {
    (0..i64::from(days))
        .map(|offset| start.checked_add(Span::new().days(offset)))
        .collect()
}
