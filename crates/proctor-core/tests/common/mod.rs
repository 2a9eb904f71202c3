#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use jiff::{
    civil::{date, time},
    Timestamp,
};
use proctor_core::{
    collaborator::{Advisor, DecomposeRequest, Grade, GradeRequest, Grader, Proposal, ProposedBlock},
    params::CreatePlan,
    Config, CollaboratorError, Plan, Supervisor, SupervisorBuilder, Verdict,
};
use tempfile::TempDir;

/// Parses an RFC 3339 timestamp.
pub fn ts(s: &str) -> Timestamp {
    s.parse().expect("valid timestamp")
}

/// End of the single scripted block used by the scenario tests.
pub const BLOCK_END: &str = "2026-03-02T21:00:00Z";

/// Defaults with a UTC zone and a one hour renotify interval.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.timezone = Some("UTC".to_string());
    config.reminders.renotify_interval_minutes = 60;
    config.collaborator.grade_timeout_seconds = 1;
    config.collaborator.plan_timeout_seconds = 1;
    config
}

/// Helper function to create a test supervisor with the given collaborators.
/// Missing collaborators fall back to the offline implementation.
pub async fn create_test_supervisor(
    advisor: Option<Arc<dyn Advisor>>,
    grader: Option<Arc<dyn Grader>>,
) -> (TempDir, Supervisor) {
    create_test_supervisor_with_config(test_config(), advisor, grader).await
}

pub async fn create_test_supervisor_with_config(
    config: Config,
    advisor: Option<Arc<dyn Advisor>>,
    grader: Option<Arc<dyn Grader>>,
) -> (TempDir, Supervisor) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");

    let mut builder = SupervisorBuilder::new()
        .with_database_path(Some(&db_path))
        .with_config(config);
    if let Some(advisor) = advisor {
        builder = builder.with_advisor(advisor);
    }
    if let Some(grader) = grader {
        builder = builder.with_grader(grader);
    }
    let supervisor = builder.build().await.expect("Failed to create supervisor");
    (temp_dir, supervisor)
}

/// Advisor that always returns the same proposal.
pub struct FixedAdvisor(pub Proposal);

#[async_trait]
impl Advisor for FixedAdvisor {
    async fn decompose(&self, _request: &DecomposeRequest) -> Result<Proposal, CollaboratorError> {
        Ok(self.0.clone())
    }
}

/// One 20:00-21:00 UTC block on 2026-03-02.
pub fn single_block_proposal() -> Proposal {
    Proposal {
        advice: Some("Keep it small".to_string()),
        blocks: vec![ProposedBlock {
            day: date(2026, 3, 2),
            start: time(20, 0, 0, 0),
            end: time(21, 0, 0, 0),
            title: "Ownership drill".to_string(),
            description: "Explain borrowing and push the exercise commit".to_string(),
        }],
    }
}

/// Creates a plan holding exactly one block that ends at [`BLOCK_END`].
pub async fn create_single_block_plan(supervisor: &Supervisor) -> Plan {
    supervisor
        .create_plan(
            &CreatePlan {
                goal: "Learn Rust".to_string(),
            },
            ts("2026-03-02T08:00:00Z"),
        )
        .await
        .expect("Failed to create plan")
}

/// Grader that replays scripted verdicts and records what it was asked.
#[derive(Default)]
pub struct ScriptedGrader {
    replies: Mutex<VecDeque<Grade>>,
    pub requests: Mutex<Vec<GradeRequest>>,
}

impl ScriptedGrader {
    pub fn new(verdicts: &[Verdict]) -> Self {
        let replies = verdicts
            .iter()
            .map(|verdict| Grade {
                verdict: *verdict,
                feedback: format!("scripted {}", verdict.as_str()),
            })
            .collect();
        Self {
            replies: Mutex::new(replies),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Grader for ScriptedGrader {
    async fn grade(&self, request: &GradeRequest) -> Result<Grade, CollaboratorError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| CollaboratorError::Malformed("script exhausted".to_string()))
    }
}

/// Collaborator that never answers in time.
pub struct StalledCollaborator;

#[async_trait]
impl Advisor for StalledCollaborator {
    async fn decompose(&self, _request: &DecomposeRequest) -> Result<Proposal, CollaboratorError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(single_block_proposal())
    }
}

#[async_trait]
impl Grader for StalledCollaborator {
    async fn grade(&self, _request: &GradeRequest) -> Result<Grade, CollaboratorError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Grade {
            verdict: Verdict::ChallengedNeedsEvidence,
            feedback: "too late".to_string(),
        })
    }
}
