//! Deterministic plan template used when the advisor is unavailable or its
//! proposal is rejected.

use jiff::{
    civil::{Date, Time},
    tz::TimeZone,
};

use super::proposal::local_block;
use crate::{error::Result, models::NewBlock};

const TITLE_GOAL_CHARS: usize = 48;
const FALLBACK_DESCRIPTION: &str =
    "Acceptance: write down three key points and produce a piece of runnable code or a commit";

/// One block per configured slot on every horizon day.
pub fn fallback_blocks(
    goal: &str,
    horizon: &[Date],
    slots: &[(Time, Time)],
    tz: &TimeZone,
) -> Result<Vec<NewBlock>> {
    let title = fallback_title(goal);
    horizon
        .iter()
        .flat_map(|day| slots.iter().map(move |(start, end)| (*day, *start, *end)))
        .map(|(day, start, end)| local_block(day, start, end, &title, FALLBACK_DESCRIPTION, tz))
        .collect()
}

fn fallback_title(goal: &str) -> String {
    let goal = goal.trim();
    let mut short: String = goal.chars().take(TITLE_GOAL_CHARS).collect();
    if short.len() < goal.len() {
        short.push('…');
    }
    format!("{short}: minimal study unit")
}
