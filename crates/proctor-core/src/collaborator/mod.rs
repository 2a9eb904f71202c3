//! Capability traits for the external collaborators.
//!
//! The planner asks an [`Advisor`] to break a goal into blocks and the
//! check-in processor asks a [`Grader`] for feedback on a report. Both may be
//! slow or unavailable; callers bound every call with a timeout and fall back
//! to deterministic behavior on any [`CollaboratorError`].

use async_trait::async_trait;
use jiff::civil::{Date, Time};
use serde_json::Value;

use crate::{error::CollaboratorError, models::Verdict};

pub mod offline;
pub mod openai;

pub use offline::OfflineCollaborator;
pub use openai::OpenAiCollaborator;

/// Input for goal decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct DecomposeRequest {
    pub goal: String,
    /// Days the proposal has to stay within
    pub horizon: Vec<Date>,
}

/// Advisor output, not yet validated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Proposal {
    pub advice: Option<String>,
    pub blocks: Vec<ProposedBlock>,
}

/// One proposed block in local wall-clock terms.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposedBlock {
    pub day: Date,
    pub start: Time,
    pub end: Time,
    pub title: String,
    pub description: String,
}

/// Input for check-in grading.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeRequest {
    pub goal: String,
    pub block_title: String,
    pub block_description: String,
    pub report: String,
    pub evidence: Vec<String>,
}

/// Grader output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grade {
    pub verdict: Verdict,
    pub feedback: String,
}

/// Decomposes a goal into proposed task blocks.
#[async_trait]
pub trait Advisor: Send + Sync {
    async fn decompose(&self, request: &DecomposeRequest) -> Result<Proposal, CollaboratorError>;
}

/// Produces a verdict and feedback for a check-in.
#[async_trait]
pub trait Grader: Send + Sync {
    async fn grade(&self, request: &GradeRequest) -> Result<Grade, CollaboratorError>;
}

/// Pulls a JSON object out of a chat reply that may wrap it in prose or a
/// code fence. Tries the whole text first, then the span from the first `{`
/// to the last `}`.
pub fn extract_json_object(text: &str) -> Option<Value> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(text) {
        return Some(value);
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}
