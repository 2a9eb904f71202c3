//! Pure reminder decision for a single block.

use jiff::{SignedDuration, Timestamp};

use crate::{
    config::ReminderConfig,
    error::Result,
    models::{BlockEvent, Notification, TaskBlock, MAX_REMINDERS},
};

/// Retry and suppression settings applied on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderPolicy {
    /// Reminders per block before it is exhausted, at most [`MAX_REMINDERS`]
    pub max_reminders: u8,
    /// Minimum gap between two reminders for the same block
    pub renotify_interval: SignedDuration,
    /// Extra time after a block ends before the first reminder
    pub grace: SignedDuration,
}

/// What a tick should do with one block.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Checked in or exhausted; never touched again by the scheduler.
    Closed,
    /// Not due yet or still inside the renotify interval.
    Wait,
    /// Send `Notification` and store the block.
    Remind(TaskBlock, Notification),
    /// Reached the limit without a reminder left to send.
    Exhaust(TaskBlock),
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self::from(&ReminderConfig::default())
    }
}

impl From<&ReminderConfig> for ReminderPolicy {
    fn from(config: &ReminderConfig) -> Self {
        Self {
            max_reminders: config.max_reminders.min(MAX_REMINDERS),
            renotify_interval: config.renotify_interval(),
            grace: config.grace(),
        }
    }
}

impl ReminderPolicy {
    /// Decides the next step for `block` at `now`.
    ///
    /// A `now` earlier than the last reminder yields a negative gap and
    /// therefore [`Decision::Wait`]; counts never go down.
    pub fn decide(&self, block: &TaskBlock, now: Timestamp) -> Result<Decision> {
        if !block.status.is_remindable() {
            return Ok(Decision::Closed);
        }

        let max = self.max_reminders.min(MAX_REMINDERS);
        if block.reminder_count >= max {
            let next = block.apply(BlockEvent::Exhausted, max)?;
            return Ok(Decision::Exhaust(next));
        }

        if now.duration_since(block.ends_at) < self.grace {
            return Ok(Decision::Wait);
        }

        let renotify_due = block.reminder_count == 0
            || block
                .last_reminded_at
                .map_or(true, |last| now.duration_since(last) >= self.renotify_interval);
        if !renotify_due {
            return Ok(Decision::Wait);
        }

        let next = block.apply(BlockEvent::Reminded { at: now }, max)?;
        let notification = Notification {
            block_id: next.id,
            title: next.title.clone(),
            message: reminder_message(&next, max),
            at: now,
            attempt: next.reminder_count,
        };
        Ok(Decision::Remind(next, notification))
    }
}

fn reminder_message(block: &TaskBlock, max: u8) -> String {
    if block.reminder_count >= max {
        format!(
            "Last reminder ({}/{max}): '{}' is overdue. Check in with what you did and the evidence.",
            block.reminder_count, block.title
        )
    } else {
        format!(
            "Reminder {}/{max}: '{}' has ended. Time to check in: {}",
            block.reminder_count, block.title, block.description
        )
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;
    use crate::models::BlockStatus;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn block() -> TaskBlock {
        TaskBlock {
            id: 7,
            plan_id: 1,
            day: date(2026, 3, 2),
            starts_at: ts("2026-03-02T12:00:00Z"),
            ends_at: ts("2026-03-02T13:00:00Z"),
            title: "Ownership".to_string(),
            description: "Explain borrowing in three sentences".to_string(),
            status: BlockStatus::Pending,
            reminder_count: 0,
            last_reminded_at: None,
            created_at: ts("2026-03-01T00:00:00Z"),
        }
    }

    fn policy() -> ReminderPolicy {
        ReminderPolicy {
            max_reminders: 3,
            renotify_interval: SignedDuration::from_mins(15),
            grace: SignedDuration::ZERO,
        }
    }

    #[test]
    fn test_not_due_before_end() {
        let decision = policy().decide(&block(), ts("2026-03-02T12:59:59Z")).unwrap();
        assert_eq!(decision, Decision::Wait);
    }

    #[test]
    fn test_first_reminder_at_end() {
        let now = ts("2026-03-02T13:00:00Z");
        let Decision::Remind(next, notification) = policy().decide(&block(), now).unwrap() else {
            panic!("expected a reminder");
        };
        assert_eq!(next.status, BlockStatus::Reminded);
        assert_eq!(next.reminder_count, 1);
        assert_eq!(next.last_reminded_at, Some(now));
        assert_eq!(notification.attempt, 1);
        assert_eq!(notification.block_id, 7);
        assert!(notification.message.contains("Ownership"));
    }

    #[test]
    fn test_grace_delays_first_reminder() {
        let policy = ReminderPolicy {
            grace: SignedDuration::from_mins(10),
            ..policy()
        };
        assert_eq!(
            policy.decide(&block(), ts("2026-03-02T13:05:00Z")).unwrap(),
            Decision::Wait
        );
        assert!(matches!(
            policy.decide(&block(), ts("2026-03-02T13:10:00Z")).unwrap(),
            Decision::Remind(..)
        ));
    }

    #[test]
    fn test_renotify_interval_respected() {
        let mut reminded = block();
        reminded.status = BlockStatus::Reminded;
        reminded.reminder_count = 1;
        reminded.last_reminded_at = Some(ts("2026-03-02T13:00:00Z"));

        assert_eq!(
            policy().decide(&reminded, ts("2026-03-02T13:14:59Z")).unwrap(),
            Decision::Wait
        );
        assert!(matches!(
            policy().decide(&reminded, ts("2026-03-02T13:15:00Z")).unwrap(),
            Decision::Remind(..)
        ));
    }

    #[test]
    fn test_backward_clock_waits() {
        let mut reminded = block();
        reminded.status = BlockStatus::Reminded;
        reminded.reminder_count = 2;
        reminded.last_reminded_at = Some(ts("2026-03-02T14:00:00Z"));

        assert_eq!(
            policy().decide(&reminded, ts("2026-03-02T13:30:00Z")).unwrap(),
            Decision::Wait
        );
    }

    #[test]
    fn test_third_reminder_exhausts() {
        let mut reminded = block();
        reminded.status = BlockStatus::Reminded;
        reminded.reminder_count = 2;
        reminded.last_reminded_at = Some(ts("2026-03-02T13:15:00Z"));

        let Decision::Remind(next, notification) =
            policy().decide(&reminded, ts("2026-03-02T13:30:00Z")).unwrap()
        else {
            panic!("expected a reminder");
        };
        assert_eq!(next.status, BlockStatus::OverdueExhausted);
        assert_eq!(next.reminder_count, 3);
        assert!(notification.message.starts_with("Last reminder"));
    }

    #[test]
    fn test_lowered_limit_exhausts_silently() {
        let mut reminded = block();
        reminded.status = BlockStatus::Reminded;
        reminded.reminder_count = 2;
        reminded.last_reminded_at = Some(ts("2026-03-02T13:15:00Z"));

        let policy = ReminderPolicy {
            max_reminders: 1,
            ..policy()
        };
        let Decision::Exhaust(next) = policy.decide(&reminded, ts("2026-03-02T16:00:00Z")).unwrap()
        else {
            panic!("expected exhaustion");
        };
        assert_eq!(next.status, BlockStatus::OverdueExhausted);
        assert_eq!(next.reminder_count, 2);
    }

    #[test]
    fn test_closed_blocks_untouched() {
        for status in [BlockStatus::CheckedIn, BlockStatus::OverdueExhausted] {
            let mut closed = block();
            closed.status = status;
            assert_eq!(
                policy().decide(&closed, ts("2026-03-05T00:00:00Z")).unwrap(),
                Decision::Closed
            );
        }
    }
}
