//! Check-in validation, grading and recording.

use std::{path::PathBuf, sync::Arc, time::Duration};

use jiff::Timestamp;
use log::{info, warn};

use crate::{
    collaborator::{Grade, GradeRequest, Grader},
    db::run_blocking,
    error::{CollaboratorError, ProctorError, Result},
    models::{BlockStatus, CheckIn, CheckInDraft, CheckInEntry, Source, Verdict},
    params::{Id, RecentCheckIns, SubmitCheckIn},
};

pub mod suspicion;

pub use suspicion::suspicion_score;

/// Suspicion at or above which the fallback feedback presses for evidence.
const PRESSING_SUSPICION: u8 = 40;

/// Grades check-ins and records them against their blocks.
pub struct CheckInProcessor {
    pub(crate) db_path: PathBuf,
    pub(crate) grader: Arc<dyn Grader>,
    pub(crate) timeout: Duration,
}

/// Feedback used when the grader does not answer. Always accepts.
pub fn fallback_grade(draft: &CheckInDraft) -> Grade {
    let feedback = if draft.suspicion >= PRESSING_SUSPICION {
        "I can see you are moving, but do not let vague wording fool you. Add: 1) the code or \
         note excerpts you produced; 2) where you got stuck; 3) the next smallest action. \
         Catch-up for tonight: 20 more minutes to get a minimal runnable example working."
    } else {
        "Good, this is concrete. Keep the evidence habit: note the commit or the key points, \
         then pick the next 20-minute step before you stop."
    };
    Grade {
        verdict: Verdict::Accepted,
        feedback: feedback.to_string(),
    }
}

impl CheckInProcessor {
    async fn ask_grader(
        &self,
        request: &GradeRequest,
    ) -> std::result::Result<Grade, CollaboratorError> {
        match tokio::time::timeout(self.timeout, self.grader.grade(request)).await {
            Ok(result) => result,
            Err(_) => Err(CollaboratorError::Timeout {
                seconds: self.timeout.as_secs(),
            }),
        }
    }

    /// Validates, grades and stores a check-in submitted at `now`.
    ///
    /// Blank reports, out-of-range self scores, unknown blocks and blocks
    /// that are already checked in are rejected before anything is written.
    /// Grader failures fall back to an accepting verdict with templated
    /// feedback.
    pub async fn submit(&self, params: &SubmitCheckIn, now: Timestamp) -> Result<CheckIn> {
        params.validate()?;

        let block_id = params.block_id;
        let (block, goal) = run_blocking(&self.db_path, move |db| {
            let block = db
                .get_block(block_id)?
                .ok_or(ProctorError::BlockNotFound { id: block_id })?;
            let goal = db.get_plan(block.plan_id)?.map(|plan| plan.goal);
            Ok((block, goal))
        })
        .await?;
        if block.status == BlockStatus::CheckedIn {
            return Err(ProctorError::AlreadyCheckedIn { id: block_id });
        }

        let evidence = params.cleaned_evidence();
        let report = params.report.trim().to_string();
        let draft = CheckInDraft {
            block_id,
            submitted_at: now,
            suspicion: suspicion_score(&report, &evidence),
            report,
            evidence,
            self_score: params.self_score,
        };

        let request = GradeRequest {
            goal: goal.unwrap_or_default(),
            block_title: block.title.clone(),
            block_description: block.description.clone(),
            report: draft.report.clone(),
            evidence: draft.evidence.clone(),
        };
        let (grade, source) = match self.ask_grader(&request).await {
            Ok(grade) => (grade, Source::Collaborator),
            Err(e) => {
                warn!("Grader unavailable for block {block_id}: {e}; using fallback feedback");
                (fallback_grade(&draft), Source::Fallback)
            }
        };

        let graded = draft.graded(grade.verdict, grade.feedback, source);
        let check_in = run_blocking(&self.db_path, move |db| db.record_check_in(&graded)).await?;

        if check_in.late {
            info!("Late check-in {} accepted for overdue block {block_id}", check_in.id);
        }
        match check_in.verdict {
            Verdict::Accepted => info!("Block {block_id} checked in (check-in {})", check_in.id),
            Verdict::ChallengedNeedsEvidence => {
                info!("Check-in {} for block {block_id} needs more evidence", check_in.id)
            }
        }
        Ok(check_in)
    }

    /// Check-ins recorded for a block, oldest first.
    pub async fn list_check_ins(&self, params: &Id) -> Result<Vec<CheckIn>> {
        let block_id = params.id;
        run_blocking(&self.db_path, move |db| {
            if db.get_block(block_id)?.is_none() {
                return Err(ProctorError::BlockNotFound { id: block_id });
            }
            db.get_check_ins(block_id)
        })
        .await
    }

    /// The latest check-ins across all blocks, newest first.
    pub async fn recent_check_ins(&self, params: &RecentCheckIns) -> Result<Vec<CheckInEntry>> {
        params.validate()?;
        let limit = params.limit;
        run_blocking(&self.db_path, move |db| db.recent_check_ins(limit)).await
    }
}
