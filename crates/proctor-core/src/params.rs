//! Parameter structures for engine operations.
//!
//! These structures carry requests from the interface layer (the CLI today)
//! into the core without framework-specific derives. Interface crates define
//! their own argument types and convert into these with `From`.
//!
//! Validation that needs no store access lives here as `validate` methods, so
//! every interface rejects the same inputs with the same messages.

use jiff::civil::{Date, Time};

use crate::error::{ProctorError, Result};

/// Generic parameters for operations that need just an ID.
#[derive(Debug, Clone, Copy)]
pub struct Id {
    pub id: u64,
}

/// Parameters for creating a plan from a goal statement.
#[derive(Debug, Clone)]
pub struct CreatePlan {
    pub goal: String,
}

impl CreatePlan {
    /// Rejects blank goals.
    pub fn validate(&self) -> Result<()> {
        if self.goal.trim().is_empty() {
            return Err(ProctorError::invalid_input("goal", "Goal cannot be empty"));
        }
        Ok(())
    }
}

/// Parameters for adding a block to an existing plan by hand.
#[derive(Debug, Clone)]
pub struct AddBlock {
    pub plan_id: u64,
    pub day: Date,
    pub start: Time,
    pub end: Time,
    pub title: String,
    pub description: Option<String>,
}

impl AddBlock {
    /// Rejects blank titles and inverted time ranges.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(ProctorError::invalid_input("title", "Title cannot be empty"));
        }
        if self.end <= self.start {
            return Err(ProctorError::invalid_input(
                "end",
                format!("End time {} must be after start time {}", self.end, self.start),
            ));
        }
        Ok(())
    }
}

/// How many entries of the check-in history to return.
#[derive(Debug, Clone, Copy)]
pub struct RecentCheckIns {
    pub limit: u32,
}

impl RecentCheckIns {
    pub const MAX_LIMIT: u32 = 500;

    /// Rejects a zero limit and limits above [`RecentCheckIns::MAX_LIMIT`].
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 || self.limit > Self::MAX_LIMIT {
            return Err(ProctorError::invalid_input(
                "limit",
                format!(
                    "Limit must be between 1 and {}, got {}",
                    Self::MAX_LIMIT,
                    self.limit
                ),
            ));
        }
        Ok(())
    }
}

impl Default for RecentCheckIns {
    fn default() -> Self {
        Self { limit: 50 }
    }
}

/// Parameters for submitting a check-in.
#[derive(Debug, Clone)]
pub struct SubmitCheckIn {
    pub block_id: u64,
    pub report: String,
    pub evidence: Vec<String>,
    pub self_score: Option<u8>,
}

impl SubmitCheckIn {
    /// Rejects blank reports and out-of-range self scores. Blank evidence
    /// entries are dropped by [`SubmitCheckIn::cleaned_evidence`], not
    /// rejected.
    pub fn validate(&self) -> Result<()> {
        if self.report.trim().is_empty() {
            return Err(ProctorError::invalid_input(
                "report",
                "Describe what you did and what proves it",
            ));
        }
        if let Some(score) = self.self_score {
            if score > 10 {
                return Err(ProctorError::invalid_input(
                    "self_score",
                    format!("Self score must be between 0 and 10, got {score}"),
                ));
            }
        }
        Ok(())
    }

    /// Evidence entries trimmed, with empty ones removed.
    pub fn cleaned_evidence(&self) -> Vec<String> {
        self.evidence
            .iter()
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
            .map(String::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, time};

    use super::*;

    #[test]
    fn test_blank_goal_rejected() {
        let err = CreatePlan {
            goal: "   ".to_string(),
        }
        .validate()
        .unwrap_err();
        assert!(err.to_string().contains("goal"));
    }

    #[test]
    fn test_add_block_inverted_range_rejected() {
        let params = AddBlock {
            plan_id: 1,
            day: date(2024, 3, 1),
            start: time(21, 0, 0, 0),
            end: time(20, 0, 0, 0),
            title: "Read chapter 3".to_string(),
            description: None,
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_submit_validation() {
        let mut params = SubmitCheckIn {
            block_id: 1,
            report: "".to_string(),
            evidence: vec![],
            self_score: None,
        };
        assert!(params.validate().unwrap_err().is_validation());

        params.report = "Wrote the parser and its tests".to_string();
        params.self_score = Some(11);
        assert!(params.validate().is_err());

        params.self_score = Some(8);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_history_limit_bounds() {
        assert_eq!(RecentCheckIns::default().limit, 50);
        assert!(RecentCheckIns { limit: 0 }.validate().is_err());
        assert!(RecentCheckIns { limit: 501 }.validate().is_err());
        assert!(RecentCheckIns { limit: 1 }.validate().is_ok());
    }

    #[test]
    fn test_cleaned_evidence() {
        let params = SubmitCheckIn {
            block_id: 1,
            report: "done".to_string(),
            evidence: vec![" commit abc123 ".to_string(), "  ".to_string()],
            self_score: None,
        };
        assert_eq!(params.cleaned_evidence(), vec!["commit abc123".to_string()]);
    }
}
