//! All-or-nothing validation of advisor proposals.

use jiff::{
    civil::{Date, Time},
    tz::TimeZone,
};

use crate::{
    collaborator::{Proposal, ProposedBlock},
    error::{ProctorError, Result},
    models::NewBlock,
};

/// Resolves a local day and clock range to a block in absolute time.
pub(crate) fn local_block(
    day: Date,
    start: Time,
    end: Time,
    title: &str,
    description: &str,
    tz: &TimeZone,
) -> Result<NewBlock> {
    let resolve = |time: Time| {
        day.to_datetime(time)
            .to_zoned(tz.clone())
            .map(|zoned| zoned.timestamp())
            .map_err(|e| ProctorError::invalid_input("day", format!("Cannot place {day} {time}: {e}")))
    };
    Ok(NewBlock {
        day,
        starts_at: resolve(start)?,
        ends_at: resolve(end)?,
        title: title.trim().to_string(),
        description: description.trim().to_string(),
    })
}

/// Returns the first pair of blocks on the same day whose time ranges
/// intersect. Touching ranges (one ends when the next starts) are fine.
pub(crate) fn find_overlap<'a, I>(blocks: I) -> Option<(&'a ProposedBlock, &'a ProposedBlock)>
where
    I: IntoIterator<Item = &'a ProposedBlock>,
{
    let mut sorted: Vec<&ProposedBlock> = blocks.into_iter().collect();
    sorted.sort_by_key(|b| (b.day, b.start, b.end));
    sorted
        .windows(2)
        .find(|pair| pair[0].day == pair[1].day && pair[1].start < pair[0].end)
        .map(|pair| (pair[0], pair[1]))
}

/// Checks every proposed block and converts the whole proposal, or rejects
/// it with the first violation found.
///
/// A proposal is accepted only if it is non-empty, every block lies on a
/// horizon day, ends after it starts, carries a non-blank description and
/// does not overlap another block on the same day.
pub fn validate_proposal(
    proposal: &Proposal,
    horizon: &[Date],
    tz: &TimeZone,
) -> std::result::Result<Vec<NewBlock>, String> {
    if proposal.blocks.is_empty() {
        return Err("proposal contains no blocks".to_string());
    }

    for block in &proposal.blocks {
        if !horizon.contains(&block.day) {
            return Err(format!("block on {} is outside the plan horizon", block.day));
        }
        if block.end <= block.start {
            return Err(format!(
                "block on {} ends at {} before it starts at {}",
                block.day, block.end, block.start
            ));
        }
        if block.description.trim().is_empty() {
            return Err(format!("block on {} at {} has no description", block.day, block.start));
        }
    }

    if let Some((first, second)) = find_overlap(&proposal.blocks) {
        return Err(format!(
            "blocks on {} overlap ({}-{} and {}-{})",
            first.day, first.start, first.end, second.start, second.end
        ));
    }

    proposal
        .blocks
        .iter()
        .map(|b| {
            let title = if b.title.trim().is_empty() {
                "Task block"
            } else {
                b.title.as_str()
            };
            local_block(b.day, b.start, b.end, title, &b.description, tz)
                .map_err(|e| e.to_string())
        })
        .collect()
}
