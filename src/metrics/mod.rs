pub mod tracker;

pub use tracker::{EpisodeSummary, MetricsTracker, TrainingMetrics};

use serde::{Serialize, Deserialize};

use crate::config::TrainingConfig;

/// Everything a finished (or stopped) run reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub config: TrainingConfig,
    pub metrics: TrainingMetrics,
    /// Action selections made over the whole run
    pub steps_done: u64,
    /// True when a stop request ended the run early
    pub stopped: bool,
}
