//! Terminal rendering of the markdown produced by the core display types.
//!
//! Uses termimad for inline styling, with a plain text mode for pipes and
//! tests.

use anyhow::Result;
use log::warn;
use proctor_core::{models::Notification, NotificationSink};
use termimad::{crossterm::style::Color, MadSkin};

/// Terminal renderer that can switch between rich and plain text output
#[derive(Clone)]
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Render markdown text to the terminal
    pub fn render(&self, markdown: &str) -> Result<()> {
        if self.rich_enabled {
            // Headers keep their hash marks so plan and day levels stay visible
            for line in markdown.lines() {
                if line.starts_with('#') {
                    println!("\x1b[34m{line}\x1b[0m");
                } else {
                    self.skin.print_inline(line);
                    println!();
                }
            }
        } else {
            print!("{markdown}");
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Prints reminders as they are emitted by `proctor watch`.
impl NotificationSink for TerminalRenderer {
    fn deliver(&self, notification: &Notification) {
        if let Err(e) = self.render(&notification.to_string()) {
            warn!("Failed to print reminder for block {}: {e}", notification.block_id);
        }
    }
}
