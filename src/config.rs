use std::path::PathBuf;

use crate::cli::Cli;

/// Store file used when neither `--store` nor `MACRO_PLANNER_STORE` is given.
pub const DEFAULT_STORE_PATH: &str = "plans.json";

/// Runtime settings resolved from the command line and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    pub store_path: PathBuf,
    pub log_level: String,
}

impl PlannerConfig {
    /// Resolve settings. clap already folds `MACRO_PLANNER_STORE` into `--store`.
    pub fn from_cli(cli: &Cli) -> Self {
        let store_path = cli
            .store
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH));
        let log_level = if cli.verbose { "debug" } else { "info" };

        Self {
            store_path,
            log_level: log_level.to_string(),
        }
    }
}
