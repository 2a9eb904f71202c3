//! Check-in records.

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::{Source, Verdict};

/// A user report of work done against a task block. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckIn {
    pub id: u64,

    /// Block the report is about
    pub block_id: u64,

    pub submitted_at: Timestamp,

    /// What the user says they did
    pub report: String,

    /// Supporting material: commit hashes, note excerpts, links
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<String>,

    pub verdict: Verdict,

    pub feedback: String,

    /// Whether the feedback came from the grader or the fallback template
    pub feedback_source: Source,

    /// Local 0..=100 heuristic for vague or unverifiable reports
    pub suspicion: u8,

    /// Optional 0..=10 self assessment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_score: Option<u8>,

    /// Submitted after the block ran out of reminders
    #[serde(default)]
    pub late: bool,
}

/// A stored check-in with the block it belongs to, as listed in the history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckInEntry {
    #[serde(flatten)]
    pub check_in: CheckIn,
    pub block_title: String,
    pub block_day: Date,
}

/// A check-in that has been validated but not graded or stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckInDraft {
    pub block_id: u64,
    pub submitted_at: Timestamp,
    pub report: String,
    pub evidence: Vec<String>,
    pub suspicion: u8,
    pub self_score: Option<u8>,
}

impl CheckInDraft {
    /// Attaches a verdict, producing the row to persist.
    pub fn graded(self, verdict: Verdict, feedback: String, source: Source) -> GradedCheckIn {
        GradedCheckIn {
            draft: self,
            verdict,
            feedback,
            feedback_source: source,
        }
    }
}

/// A draft with its verdict, ready for the store.
#[derive(Debug, Clone, PartialEq)]
pub struct GradedCheckIn {
    pub draft: CheckInDraft,
    pub verdict: Verdict,
    pub feedback: String,
    pub feedback_source: Source,
}
