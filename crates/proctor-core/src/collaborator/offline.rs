//! Collaborator used when no endpoint is configured.

use async_trait::async_trait;

use super::{Advisor, DecomposeRequest, Grade, GradeRequest, Grader, Proposal};
use crate::error::CollaboratorError;

/// Refuses every call with [`CollaboratorError::NotConfigured`], which sends
/// the planner and the check-in processor straight to their fallbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineCollaborator;

#[async_trait]
impl Advisor for OfflineCollaborator {
    async fn decompose(&self, _request: &DecomposeRequest) -> Result<Proposal, CollaboratorError> {
        Err(CollaboratorError::NotConfigured)
    }
}

#[async_trait]
impl Grader for OfflineCollaborator {
    async fn grade(&self, _request: &GradeRequest) -> Result<Grade, CollaboratorError> {
        Err(CollaboratorError::NotConfigured)
    }
}
