//! Core library for the Proctor study supervisor.
//!
//! A goal is decomposed into time-boxed task blocks over a rolling horizon.
//! Once a block has ended the reminder scheduler nudges the user (at most
//! three times, spaced by a renotify interval) until a check-in arrives. Each
//! check-in is graded, and the grader may challenge a report that lacks
//! evidence.
//!
//! # Components
//!
//! - [`db`]: SQLite store, the only component with persistent side effects
//! - [`planner`]: goal decomposition with a deterministic fallback template
//! - [`scheduler`]: polling reminder state machine and notification sinks
//! - [`checkin`]: check-in validation, grading and recording
//! - [`export`]: JSON snapshot of the whole store
//! - [`collaborator`]: advisor and grader traits with an OpenAI-compatible
//!   client and an offline implementation
//! - [`supervisor`]: the async facade tying everything to one database
//!
//! Every operation takes the current time as an argument, so behavior is
//! reproducible in tests.
//!
//! # Quick Start
//!
//! ```rust
//! use proctor_core::{
//!     params::{CreatePlan, SubmitCheckIn},
//!     OfflineCollaborator, SupervisorBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let supervisor = SupervisorBuilder::new()
//!     .with_database_path(Some("proctor.db"))
//!     .with_collaborator(OfflineCollaborator)
//!     .build()
//!     .await?;
//!
//! let now = jiff::Timestamp::now();
//! let plan = supervisor
//!     .create_plan(&CreatePlan { goal: "Learn Rust".to_string() }, now)
//!     .await?;
//!
//! let check_in = supervisor
//!     .submit_check_in(
//!         &SubmitCheckIn {
//!             block_id: plan.blocks[0].id,
//!             report: "Finished chapter 4, notes in my repo".to_string(),
//!             evidence: vec!["commit 1a2b3c".to_string()],
//!             self_score: Some(7),
//!         },
//!         now,
//!     )
//!     .await?;
//! println!("{}", check_in.feedback);
//! # Ok(())
//! # }
//! ```

pub mod checkin;
pub mod collaborator;
pub mod config;
pub mod db;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod params;
pub mod planner;
pub mod scheduler;
pub mod supervisor;

// Re-export commonly used types
pub use checkin::CheckInProcessor;
pub use collaborator::{Advisor, Grader, OfflineCollaborator, OpenAiCollaborator};
pub use config::Config;
pub use db::Database;
pub use display::{CheckIns, CreateResult, Notifications, PlanSummaries, ZonedDisplay};
pub use error::{CollaboratorError, ProctorError, Result};
pub use export::Exporter;
pub use models::{
    BlockStatus, CheckIn, CheckInEntry, ExportDocument, Notification, Plan, PlanSummary, Source,
    TaskBlock, Verdict,
};
pub use params::{AddBlock, CreatePlan, Id, RecentCheckIns, SubmitCheckIn};
pub use planner::Planner;
pub use scheduler::{ChannelSink, LogSink, NotificationSink, ReminderPolicy, ReminderScheduler};
pub use supervisor::{Supervisor, SupervisorBuilder};
