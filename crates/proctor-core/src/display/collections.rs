//! Collection wrappers with empty-collection handling.

use std::fmt;

use jiff::{civil::Date, tz::TimeZone};

use super::datetime::{display_in_system_zone, ZonedDisplay};
use crate::models::{CheckIn, CheckInEntry, Notification, PlanSummary, TaskBlock};

display_in_system_zone!(PlanSummaries, CheckIns, CheckInHistory, DayBlocks);

/// Plan summaries, one section each.
///
/// ```rust
/// use proctor_core::{display::PlanSummaries, models::PlanSummary};
/// use jiff::Timestamp;
///
/// let summary = PlanSummary {
///     id: 1,
///     goal: "Learn Rust".to_string(),
///     created_at: Timestamp::now(),
///     total_blocks: 7,
///     checked_in_blocks: 2,
///     exhausted_blocks: 1,
///     open_blocks: 4,
/// };
/// let output = PlanSummaries(vec![summary]).to_string();
/// assert!(output.contains("Learn Rust (ID: 1) (2/7)"));
/// assert!(PlanSummaries(vec![]).to_string().contains("No plans found."));
/// ```
pub struct PlanSummaries(pub Vec<PlanSummary>);

impl ZonedDisplay for PlanSummaries {
    fn fmt_zoned(&self, f: &mut fmt::Formatter<'_>, tz: &TimeZone) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No plans found.");
        }
        for plan in &self.0 {
            plan.fmt_zoned(f, tz)?;
        }
        Ok(())
    }
}

/// Check-ins of one block in submission order.
pub struct CheckIns(pub Vec<CheckIn>);

impl ZonedDisplay for CheckIns {
    fn fmt_zoned(&self, f: &mut fmt::Formatter<'_>, tz: &TimeZone) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No check-ins recorded.");
        }
        for check_in in &self.0 {
            check_in.fmt_zoned(f, tz)?;
        }
        Ok(())
    }
}

/// Recent check-ins across all blocks, newest first.
pub struct CheckInHistory(pub Vec<CheckInEntry>);

impl ZonedDisplay for CheckInHistory {
    fn fmt_zoned(&self, f: &mut fmt::Formatter<'_>, tz: &TimeZone) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No check-ins recorded.");
        }
        for entry in &self.0 {
            entry.fmt_zoned(f, tz)?;
        }
        Ok(())
    }
}

/// The blocks scheduled on one local day.
pub struct DayBlocks {
    pub day: Date,
    pub blocks: Vec<TaskBlock>,
}

impl ZonedDisplay for DayBlocks {
    fn fmt_zoned(&self, f: &mut fmt::Formatter<'_>, tz: &TimeZone) -> fmt::Result {
        writeln!(f, "## {}", self.day)?;
        writeln!(f)?;
        if self.blocks.is_empty() {
            return writeln!(f, "No blocks scheduled.");
        }
        for block in &self.blocks {
            block.fmt_zoned(f, tz)?;
        }
        Ok(())
    }
}

/// Notifications emitted by one tick.
pub struct Notifications(pub Vec<Notification>);

impl fmt::Display for Notifications {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No blocks are due for a reminder.");
        }
        writeln!(f, "## Reminders")?;
        writeln!(f)?;
        for notification in &self.0 {
            write!(f, "{notification}")?;
        }
        Ok(())
    }
}
