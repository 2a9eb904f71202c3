//! Reminder payloads handed to notification sinks.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// One reminder for one block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub block_id: u64,
    pub title: String,
    pub message: String,
    pub at: Timestamp,
    /// Which reminder this is, starting at 1
    pub attempt: u8,
}
