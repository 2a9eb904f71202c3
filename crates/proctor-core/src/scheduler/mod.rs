//! Reminder scheduler.
//!
//! Each [`ReminderScheduler::tick`] lists the open blocks and evaluates every
//! one in its own IMMEDIATE transaction that re-reads the row, so repeated
//! ticks with the same `now` cannot double-count, and a block that fails to
//! decode or update is logged and skipped without affecting the rest.

use std::{future::Future, path::PathBuf, sync::Arc, time::Duration};

use jiff::Timestamp;
use log::{debug, error, info, warn};
use tokio::time::MissedTickBehavior;

use crate::{
    db::run_blocking,
    error::Result,
    models::{BlockStatus, Notification},
};

pub mod policy;
pub mod sink;

pub use policy::{Decision, ReminderPolicy};
pub use sink::{ChannelSink, LogSink, NotificationSink};

/// Polls the store and emits reminders for due blocks.
pub struct ReminderScheduler {
    pub(crate) db_path: PathBuf,
    pub(crate) policy: ReminderPolicy,
    pub(crate) sink: Arc<dyn NotificationSink>,
}

impl ReminderScheduler {
    /// One scheduling pass at `now`.
    ///
    /// Returns the notifications emitted, which have also been handed to the
    /// sink. Fails only if the candidate blocks cannot be listed.
    pub async fn tick(&self, now: Timestamp) -> Result<Vec<Notification>> {
        let ids = run_blocking(&self.db_path, |db| db.open_block_ids()).await?;
        debug!("Tick at {now}: {} open blocks", ids.len());

        let mut notifications = Vec::new();
        for block_id in ids {
            let policy = self.policy;
            let decided = run_blocking(&self.db_path, move |db| {
                db.update_block_with(block_id, |block| {
                    let decision = policy.decide(block, now)?;
                    let next = match &decision {
                        Decision::Remind(next, _) | Decision::Exhaust(next) => Some(next.clone()),
                        Decision::Wait | Decision::Closed => None,
                    };
                    Ok((next, decision))
                })
            })
            .await;

            match decided {
                Ok(Decision::Remind(next, notification)) => {
                    if next.status == BlockStatus::OverdueExhausted {
                        info!(
                            "Block {block_id} is overdue after {} reminders",
                            next.reminder_count
                        );
                    }
                    self.sink.deliver(&notification);
                    notifications.push(notification);
                }
                Ok(Decision::Exhaust(next)) => {
                    info!(
                        "Block {block_id} exhausted at {} reminders without a new notification",
                        next.reminder_count
                    );
                }
                Ok(Decision::Wait) => debug!("Block {block_id} not due"),
                Ok(Decision::Closed) => debug!("Block {block_id} already closed"),
                Err(e) => warn!("Skipping block {block_id}: {e}"),
            }
        }

        Ok(notifications)
    }

    /// Ticks with the current time every `poll_interval` until `shutdown`
    /// resolves. A failed tick is logged and the loop keeps going.
    pub async fn run<F>(&self, poll_interval: Duration, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let mut interval = tokio::time::interval(poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!("Watching for due blocks every {}s", poll_interval.as_secs());
        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("Reminder loop stopped");
                    return Ok(());
                }
                _ = interval.tick() => {
                    if let Err(e) = self.tick(Timestamp::now()).await {
                        error!("Reminder tick failed: {e}");
                    }
                }
            }
        }
    }
}
