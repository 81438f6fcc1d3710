//! Run reports.
//!
//! Every run produces a JSON report: identity, timing, the census
//! trajectory sampled during the run, and the final state of the mesh.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use radiomesh_network::ClusterCensus;

/// Summary of a completed (or interrupted) simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique id for this run.
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub seed: u64,
    pub nodes: usize,
    /// Ticks actually executed (may fall short of the budget on
    /// interruption).
    pub ticks_run: u64,
    /// First sampled tick at which the mesh held one cluster with one
    /// leader, if that ever happened.
    pub converged_at_tick: Option<u64>,
    pub final_census: ClusterCensus,
    /// Census samples taken during the run, in tick order.
    pub samples: Vec<ClusterCensus>,
}

impl RunReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn write_to(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, self.to_json()?)?;
        tracing::info!(path = %path.display(), "run report written");
        Ok(())
    }
}
