//! Builder for creating and configuring Supervisor instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use log::debug;

use super::Supervisor;
use crate::{
    checkin::CheckInProcessor,
    collaborator::{Advisor, Grader, OfflineCollaborator, OpenAiCollaborator},
    config::Config,
    db::run_blocking,
    error::{ProctorError, Result},
    export::Exporter,
    planner::Planner,
    scheduler::{LogSink, NotificationSink, ReminderPolicy, ReminderScheduler},
};

/// Builder for creating and configuring Supervisor instances.
#[derive(Default)]
pub struct SupervisorBuilder {
    database_path: Option<PathBuf>,
    config: Option<Config>,
    advisor: Option<Arc<dyn Advisor>>,
    grader: Option<Arc<dyn Grader>>,
    sink: Option<Arc<dyn NotificationSink>>,
}

impl SupervisorBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses the XDG data directory:
    /// `$XDG_DATA_HOME/proctor/proctor.db` or
    /// `~/.local/share/proctor/proctor.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Uses `config` instead of the defaults.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Uses `advisor` for plan decomposition.
    pub fn with_advisor(mut self, advisor: Arc<dyn Advisor>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    /// Uses `grader` for check-in feedback.
    pub fn with_grader(mut self, grader: Arc<dyn Grader>) -> Self {
        self.grader = Some(grader);
        self
    }

    /// Uses one value as both advisor and grader.
    pub fn with_collaborator<C>(self, collaborator: C) -> Self
    where
        C: Advisor + Grader + 'static,
    {
        let shared = Arc::new(collaborator);
        self.with_advisor(shared.clone()).with_grader(shared)
    }

    /// Sends reminders to `sink` instead of the log.
    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Builds the configured supervisor.
    ///
    /// Collaborators that were not set explicitly come from the
    /// `[collaborator]` configuration: the OpenAI-compatible client when an
    /// API key is present, the offline fallback otherwise.
    ///
    /// # Errors
    ///
    /// Returns `ProctorError::Configuration` if the configuration is invalid
    /// Returns `ProctorError::FileSystem` if the database directory cannot be
    /// created
    /// Returns `ProctorError::Database` if database initialization fails
    pub async fn build(self) -> Result<Supervisor> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ProctorError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        run_blocking(&db_path, |_db| Ok(())).await?;
        debug!("Using database {}", db_path.display());

        let (advisor, grader) = match (self.advisor, self.grader) {
            (Some(advisor), Some(grader)) => (advisor, grader),
            (advisor, grader) => {
                let fallback = Self::configured_collaborator(&config);
                (
                    advisor.unwrap_or_else(|| fallback.0.clone()),
                    grader.unwrap_or(fallback.1),
                )
            }
        };

        let time_zone = config.time_zone()?;
        let slots = config
            .planning
            .slots
            .iter()
            .map(|slot| slot.times())
            .collect::<Result<Vec<_>>>()?;

        let planner = Planner {
            db_path: db_path.clone(),
            advisor,
            time_zone: time_zone.clone(),
            horizon_days: config.planning.horizon_days,
            slots,
            timeout: config.collaborator.plan_timeout(),
        };
        let scheduler = ReminderScheduler {
            db_path: db_path.clone(),
            policy: ReminderPolicy::from(&config.reminders),
            sink: self.sink.unwrap_or_else(|| Arc::new(LogSink)),
        };
        let checkins = CheckInProcessor {
            db_path: db_path.clone(),
            grader,
            timeout: config.collaborator.grade_timeout(),
        };
        let exporter = Exporter {
            db_path: db_path.clone(),
        };

        Ok(Supervisor {
            db_path,
            config,
            time_zone,
            planner,
            scheduler,
            checkins,
            exporter,
        })
    }

    fn configured_collaborator(config: &Config) -> (Arc<dyn Advisor>, Arc<dyn Grader>) {
        if config.collaborator.is_configured() {
            let client = Arc::new(OpenAiCollaborator::from_config(&config.collaborator));
            (client.clone(), client)
        } else {
            debug!("No collaborator API key configured; using offline fallbacks");
            (Arc::new(OfflineCollaborator), Arc::new(OfflineCollaborator))
        }
    }

    /// Returns the default database path in the XDG data directory.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("proctor")
            .place_data_file("proctor.db")
            .map_err(|e| ProctorError::XdgDirectory(e.to_string()))
    }
}
