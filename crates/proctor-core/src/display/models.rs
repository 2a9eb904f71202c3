//! Display implementations for domain models.
//!
//! Everything renders as markdown for the terminal renderer.

use std::fmt;

use jiff::tz::TimeZone;

use super::datetime::{display_in_system_zone, LocalDateTime, LocalTimeRange, ZonedDisplay};
use crate::models::{
    BlockStatus, CheckIn, CheckInEntry, Notification, Plan, PlanSummary, Source, TaskBlock,
    Verdict,
};

display_in_system_zone!(Plan, TaskBlock, CheckIn, CheckInEntry, PlanSummary);

impl fmt::Display for BlockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ZonedDisplay for Plan {
    fn fmt_zoned(&self, f: &mut fmt::Formatter<'_>, tz: &TimeZone) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.goal)?;
        writeln!(f)?;

        if let (Some(first), Some(last)) = (self.horizon.first(), self.horizon.last()) {
            writeln!(f, "- Horizon: {first} to {last} ({} days)", self.horizon.len())?;
        }
        let origin = match self.origin {
            Source::Collaborator => "advisor",
            Source::Fallback => "fallback template",
        };
        writeln!(f, "- Breakdown: {origin}")?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at, tz))?;

        if let Some(advice) = &self.advice {
            writeln!(f)?;
            writeln!(f, "> {advice}")?;
        }

        if self.blocks.is_empty() {
            writeln!(f, "\nNo blocks in this plan.")?;
            return Ok(());
        }

        let mut current_day = None;
        for block in &self.blocks {
            if current_day != Some(block.day) {
                writeln!(f, "\n## {}", block.day)?;
                writeln!(f)?;
                current_day = Some(block.day);
            }
            write!(f, "{}", block.in_zone(tz))?;
        }
        Ok(())
    }
}

impl ZonedDisplay for TaskBlock {
    fn fmt_zoned(&self, f: &mut fmt::Formatter<'_>, tz: &TimeZone) -> fmt::Result {
        writeln!(
            f,
            "### {}. {} {} ({})",
            self.id,
            LocalTimeRange(&self.starts_at, &self.ends_at, tz),
            self.title,
            self.status.with_icon()
        )?;
        writeln!(f)?;
        writeln!(f, "{}", self.description)?;
        writeln!(f)?;

        if self.reminder_count > 0 {
            write!(f, "- Reminders sent: {}", self.reminder_count)?;
            if let Some(last) = &self.last_reminded_at {
                write!(f, " (last {})", LocalDateTime(last, tz))?;
            }
            writeln!(f)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

impl ZonedDisplay for CheckIn {
    fn fmt_zoned(&self, f: &mut fmt::Formatter<'_>, tz: &TimeZone) -> fmt::Result {
        let verdict = match self.verdict {
            Verdict::Accepted => "✓ Accepted",
            Verdict::ChallengedNeedsEvidence => "? Needs evidence",
        };
        writeln!(f, "### Check-in {} for block {} ({verdict})", self.id, self.block_id)?;
        writeln!(f)?;
        writeln!(f, "- Submitted: {}", LocalDateTime(&self.submitted_at, tz))?;
        if self.late {
            writeln!(f, "- Late: submitted after the block ran out of reminders")?;
        }
        writeln!(f, "- Suspicion: {}/100", self.suspicion)?;
        if let Some(score) = self.self_score {
            writeln!(f, "- Self score: {score}/10")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.report)?;

        if !self.evidence.is_empty() {
            writeln!(f, "\n#### Evidence")?;
            writeln!(f)?;
            for item in &self.evidence {
                writeln!(f, "- {item}")?;
            }
        }

        let source = match self.feedback_source {
            Source::Collaborator => "Feedback",
            Source::Fallback => "Feedback (offline)",
        };
        writeln!(f, "\n#### {source}")?;
        writeln!(f)?;
        writeln!(f, "{}", self.feedback)?;
        writeln!(f)?;
        Ok(())
    }
}

impl ZonedDisplay for CheckInEntry {
    fn fmt_zoned(&self, f: &mut fmt::Formatter<'_>, tz: &TimeZone) -> fmt::Result {
        writeln!(f, "## {} {}", self.block_day, self.block_title)?;
        writeln!(f)?;
        self.check_in.fmt_zoned(f, tz)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- **{}** (block {}, reminder {}): {}",
            self.title, self.block_id, self.attempt, self.message
        )
    }
}

impl ZonedDisplay for PlanSummary {
    fn fmt_zoned(&self, f: &mut fmt::Formatter<'_>, tz: &TimeZone) -> fmt::Result {
        writeln!(
            f,
            "## {} (ID: {}) ({}/{})",
            self.goal, self.id, self.checked_in_blocks, self.total_blocks
        )?;
        writeln!(f)?;
        writeln!(f, "- **Open**: {}", self.open_blocks)?;
        if self.exhausted_blocks > 0 {
            writeln!(f, "- **Overdue**: {}", self.exhausted_blocks)?;
        }
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at, tz))?;
        writeln!(f)?;
        Ok(())
    }
}
