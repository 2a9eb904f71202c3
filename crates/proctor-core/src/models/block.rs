//! Task block model and its transition table.

use std::fmt;

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::BlockStatus;
use crate::error::{ProctorError, Result};

/// Hard ceiling on reminders per block, whatever the configuration says.
pub const MAX_REMINDERS: u8 = 3;

/// A scheduled, time-boxed unit of work belonging to one plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskBlock {
    /// Store-assigned identifier
    pub id: u64,

    /// ID of the owning plan
    pub plan_id: u64,

    /// Day bucket of the plan horizon this block belongs to
    pub day: Date,

    /// Scheduled start (UTC)
    pub starts_at: Timestamp,

    /// Scheduled end (UTC); the block is due once this has passed
    pub ends_at: Timestamp,

    /// Short label for the block
    pub title: String,

    /// What must be done and how it is verified
    pub description: String,

    /// Current lifecycle state
    pub status: BlockStatus,

    /// Reminders sent so far, never above [`MAX_REMINDERS`]
    pub reminder_count: u8,

    /// When the last reminder went out
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reminded_at: Option<Timestamp>,

    /// Timestamp when the block was created (UTC)
    pub created_at: Timestamp,
}

/// A block that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBlock {
    pub day: Date,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub title: String,
    pub description: String,
}

/// Events that move a block through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockEvent {
    /// A reminder was emitted at the given instant
    Reminded { at: Timestamp },

    /// The reminder budget ran out without a check-in
    Exhausted,

    /// A check-in was accepted
    Accepted,
}

impl fmt::Display for BlockEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockEvent::Reminded { .. } => write!(f, "remind"),
            BlockEvent::Exhausted => write!(f, "exhaust"),
            BlockEvent::Accepted => write!(f, "accept"),
        }
    }
}

impl TaskBlock {
    /// Single mutation entry point for `status`, `reminder_count` and
    /// `last_reminded_at`.
    ///
    /// Returns the block as it must be stored after `event`. Illegal
    /// transitions are rejected and leave `self` untouched. A reminder that
    /// uses up the budget moves the block straight to
    /// [`BlockStatus::OverdueExhausted`].
    ///
    /// ```rust
    /// # use proctor_core::models::{BlockEvent, BlockStatus, TaskBlock};
    /// # use jiff::Timestamp;
    /// # let now = Timestamp::from_second(1_700_000_000).unwrap();
    /// # let block = TaskBlock {
    /// #     id: 1, plan_id: 1, day: jiff::civil::date(2023, 11, 14),
    /// #     starts_at: now, ends_at: now, title: "t".into(), description: "d".into(),
    /// #     status: BlockStatus::Pending, reminder_count: 2, last_reminded_at: None,
    /// #     created_at: now,
    /// # };
    /// let next = block.apply(BlockEvent::Reminded { at: now }, 3).unwrap();
    /// assert_eq!(next.reminder_count, 3);
    /// assert_eq!(next.status, BlockStatus::OverdueExhausted);
    /// ```
    pub fn apply(&self, event: BlockEvent, max_reminders: u8) -> Result<TaskBlock> {
        let max_reminders = max_reminders.min(MAX_REMINDERS);
        let illegal = || ProctorError::IllegalTransition {
            from: self.status,
            event,
        };

        let mut next = self.clone();
        match (self.status, event) {
            (BlockStatus::CheckedIn, BlockEvent::Accepted) => {
                return Err(ProctorError::AlreadyCheckedIn { id: self.id });
            }
            (BlockStatus::CheckedIn, _) => return Err(illegal()),
            (_, BlockEvent::Accepted) => {
                next.status = BlockStatus::CheckedIn;
            }
            (BlockStatus::OverdueExhausted, _) => return Err(illegal()),
            (_, BlockEvent::Exhausted) => {
                next.status = BlockStatus::OverdueExhausted;
            }
            (_, BlockEvent::Reminded { at }) => {
                if self.reminder_count >= max_reminders {
                    return Err(illegal());
                }
                if self.last_reminded_at.is_some_and(|last| at < last) {
                    return Err(illegal());
                }
                next.reminder_count += 1;
                next.last_reminded_at = Some(at);
                next.status = if next.reminder_count >= max_reminders {
                    BlockStatus::OverdueExhausted
                } else {
                    BlockStatus::Reminded
                };
            }
        }
        Ok(next)
    }
}
