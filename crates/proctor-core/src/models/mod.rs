//! Data models for plans, task blocks and check-ins.
//!
//! Display implementations live in [`crate::display::models`]. Status changes
//! on a [`TaskBlock`] only happen through [`TaskBlock::apply`], which enforces
//! the transition table:
//!
//! | from \ event       | remind                    | exhaust           | accept     |
//! |--------------------|---------------------------|-------------------|------------|
//! | `Pending`          | `Reminded` / `Overdue…`   | `OverdueExhausted`| `CheckedIn`|
//! | `Reminded`         | `Reminded` / `Overdue…`   | `OverdueExhausted`| `CheckedIn`|
//! | `OverdueExhausted` | rejected                  | rejected          | `CheckedIn`|
//! | `CheckedIn`        | rejected                  | rejected          | rejected   |

pub mod block;
pub mod checkin;
pub mod export;
pub mod notification;
pub mod plan;
pub mod status;
pub mod summary;


pub use block::{BlockEvent, NewBlock, TaskBlock, MAX_REMINDERS};
pub use checkin::{CheckIn, CheckInDraft, CheckInEntry, GradedCheckIn};
pub use export::ExportDocument;
pub use notification::Notification;
pub use plan::{NewPlan, Plan};
pub use status::{BlockStatus, Source, Verdict};
pub use summary::PlanSummary;
