//! Closed enumerations stored as text columns.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a task block.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum BlockStatus {
    /// Scheduled, no reminder sent yet
    #[default]
    Pending,

    /// At least one reminder has been sent
    Reminded,

    /// An accepted check-in exists; terminal
    CheckedIn,

    /// The maximum number of reminders went out without a check-in
    OverdueExhausted,
}

impl FromStr for BlockStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(BlockStatus::Pending),
            "reminded" => Ok(BlockStatus::Reminded),
            "checked_in" | "checkedin" => Ok(BlockStatus::CheckedIn),
            "overdue_exhausted" | "exhausted" => Ok(BlockStatus::OverdueExhausted),
            _ => Err(format!("Invalid block status: {s}")),
        }
    }
}

impl BlockStatus {
    /// Database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockStatus::Pending => "pending",
            BlockStatus::Reminded => "reminded",
            BlockStatus::CheckedIn => "checked_in",
            BlockStatus::OverdueExhausted => "overdue_exhausted",
        }
    }

    /// Whether the scheduler may still send reminders for a block in this
    /// status.
    pub fn is_remindable(&self) -> bool {
        matches!(self, BlockStatus::Pending | BlockStatus::Reminded)
    }

    /// Status with a leading icon for markdown output.
    ///
    /// ```rust
    /// use proctor_core::models::BlockStatus;
    ///
    /// assert_eq!(BlockStatus::CheckedIn.with_icon(), "✓ Checked in");
    /// assert_eq!(BlockStatus::OverdueExhausted.with_icon(), "✗ Overdue");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            BlockStatus::Pending => "○ Pending",
            BlockStatus::Reminded => "➤ Reminded",
            BlockStatus::CheckedIn => "✓ Checked in",
            BlockStatus::OverdueExhausted => "✗ Overdue",
        }
    }
}

/// Outcome of grading a check-in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The report is convincing; the block is done
    Accepted,

    /// More evidence is required; the block stays open
    ChallengedNeedsEvidence,
}

impl FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accepted" | "accept" | "pass" => Ok(Verdict::Accepted),
            "challenged_needs_evidence" | "challenged" | "needs_evidence" | "challenge" => {
                Ok(Verdict::ChallengedNeedsEvidence)
            }
            _ => Err(format!("Invalid verdict: {s}")),
        }
    }
}

impl Verdict {
    /// Database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Accepted => "accepted",
            Verdict::ChallengedNeedsEvidence => "challenged_needs_evidence",
        }
    }
}

/// Who produced a piece of feedback or a plan breakdown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// The external collaborator answered
    Collaborator,

    /// The deterministic template was used
    #[default]
    Fallback,
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "collaborator" => Ok(Source::Collaborator),
            "fallback" => Ok(Source::Fallback),
            _ => Err(format!("Invalid source: {s}")),
        }
    }
}

impl Source {
    /// Database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Collaborator => "collaborator",
            Source::Fallback => "fallback",
        }
    }
}
