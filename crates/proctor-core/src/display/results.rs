//! Wrappers for displaying the outcome of create operations.

use std::fmt;

use jiff::tz::TimeZone;

use super::datetime::{display_in_system_zone, ZonedDisplay};
use crate::models::{CheckIn, Plan, TaskBlock, Verdict};

display_in_system_zone!(CreateResult<Plan>, CreateResult<TaskBlock>, CreateResult<CheckIn>);

/// A freshly created resource with a confirmation line.
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl ZonedDisplay for CreateResult<Plan> {
    fn fmt_zoned(&self, f: &mut fmt::Formatter<'_>, tz: &TimeZone) -> fmt::Result {
        writeln!(
            f,
            "Created plan with ID: {} ({} blocks)",
            self.resource.id,
            self.resource.blocks.len()
        )?;
        writeln!(f)?;
        self.resource.fmt_zoned(f, tz)
    }
}

impl ZonedDisplay for CreateResult<TaskBlock> {
    fn fmt_zoned(&self, f: &mut fmt::Formatter<'_>, tz: &TimeZone) -> fmt::Result {
        writeln!(
            f,
            "Added block with ID: {} to plan {}",
            self.resource.id, self.resource.plan_id
        )?;
        writeln!(f)?;
        self.resource.fmt_zoned(f, tz)
    }
}

impl ZonedDisplay for CreateResult<CheckIn> {
    fn fmt_zoned(&self, f: &mut fmt::Formatter<'_>, tz: &TimeZone) -> fmt::Result {
        let outcome = match self.resource.verdict {
            Verdict::Accepted => "Block checked in.",
            Verdict::ChallengedNeedsEvidence => {
                "Not accepted yet: add evidence and submit again."
            }
        };
        writeln!(
            f,
            "Recorded check-in with ID: {}. {outcome}",
            self.resource.id
        )?;
        writeln!(f)?;
        self.resource.fmt_zoned(f, tz)
    }
}
