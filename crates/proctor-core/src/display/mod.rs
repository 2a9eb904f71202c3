//! Markdown formatting for domain models and operation results.
//!
//! Domain models implement [`std::fmt::Display`] directly in [`models`];
//! [`collections`] and [`results`] add newtype wrappers for lists and create
//! confirmations. Anything that prints clock times also implements
//! [`ZonedDisplay`]. The CLI renders the markdown with termimad.
//!
//! ```rust
//! use proctor_core::{display::CreateResult, models::{Plan, Source}};
//! use jiff::{civil::date, Timestamp};
//!
//! let plan = Plan {
//!     id: 1,
//!     goal: "Learn Rust".to_string(),
//!     advice: Some("Start with the book".to_string()),
//!     origin: Source::Collaborator,
//!     horizon: vec![date(2026, 3, 2)],
//!     created_at: Timestamp::now(),
//!     blocks: vec![],
//! };
//!
//! let output = CreateResult::new(plan).to_string();
//! assert!(output.contains("Created plan with ID: 1 (0 blocks)"));
//! assert!(output.contains("> Start with the book"));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;

pub use collections::{CheckInHistory, CheckIns, DayBlocks, Notifications, PlanSummaries};
pub use datetime::{InZone, LocalDateTime, LocalTimeRange, ZonedDisplay};
pub use results::CreateResult;
