//! Configuration loading from TOML and environment variables.
//!
//! The sim host reads its configuration from:
//! 1. A TOML config file (default: config/radiomesh.toml)
//! 2. Environment variables (override TOML values)
//!
//! Environment variable prefix: RADIOMESH_

use std::path::Path;

use serde::{Deserialize, Serialize};

use radiomesh_election::ElectionConfig;
use radiomesh_protocol::ProtocolError;

/// Top-level sim configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Run length, population, and pacing.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Arena geometry the nodes wander in.
    #[serde(default)]
    pub arena: ArenaConfig,
    /// Broadcast medium parameters.
    #[serde(default)]
    pub radio: RadioConfig,
    /// Election state machine parameters.
    #[serde(default)]
    pub election: ElectionSection,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Run length, population, and pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of nodes scattered over the arena.
    #[serde(default = "default_nodes")]
    pub nodes: usize,
    /// Seed for the network's random source. Equal seeds reproduce runs
    /// exactly.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Tick budget for the run.
    #[serde(default = "default_ticks")]
    pub ticks: u64,
    /// Frames per second in paced mode.
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: f64,
    /// Ticks between census samples.
    #[serde(default = "default_census_interval")]
    pub census_interval_ticks: u64,
}

/// Arena geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaConfig {
    #[serde(default = "default_arena_side")]
    pub width: f64,
    #[serde(default = "default_arena_side")]
    pub height: f64,
    /// Maximum per-tick random-walk displacement per axis.
    #[serde(default = "default_walk_step")]
    pub walk_step: f64,
}

/// Broadcast medium parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadioConfig {
    /// Range limit every node stamps on its transmissions.
    #[serde(default = "default_range")]
    pub range: f64,
    /// Distance a wavefront's radius grows per tick.
    #[serde(default = "default_propagation_speed")]
    pub propagation_speed: f64,
}

/// Election parameters, mirroring [`ElectionConfig`] field by field so a
/// TOML file may override any subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectionSection {
    #[serde(default = "default_initial_cluster_id")]
    pub initial_cluster_id: u64,
    #[serde(default = "default_max_cluster_id")]
    pub max_cluster_id: u64,
    #[serde(default = "default_tie_break_jitter")]
    pub tie_break_jitter: u64,
    #[serde(default = "default_max_wait_send_ticks")]
    pub max_wait_send_ticks: u32,
    #[serde(default = "default_max_wait_receive_ticks")]
    pub max_wait_receive_ticks: u32,
    #[serde(default = "default_startup_desync_ticks")]
    pub startup_desync_ticks: u32,
    #[serde(default = "default_payload_memory")]
    pub payload_memory: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "radiomesh_network=debug").
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Whether to output JSON-formatted logs.
    #[serde(default)]
    pub json_format: bool,
}

// -- Defaults --

fn default_nodes() -> usize {
    250
}
fn default_seed() -> u64 {
    42
}
fn default_ticks() -> u64 {
    2000
}
fn default_tick_rate() -> f64 {
    30.0
}
fn default_census_interval() -> u64 {
    50
}
fn default_arena_side() -> f64 {
    400.0
}
fn default_walk_step() -> f64 {
    1.5
}
fn default_range() -> f64 {
    radiomesh_protocol::DEFAULT_RANGE
}
fn default_propagation_speed() -> f64 {
    radiomesh_protocol::PROPAGATION_SPEED
}
fn default_initial_cluster_id() -> u64 {
    radiomesh_protocol::INITIAL_CLUSTER_ID
}
fn default_max_cluster_id() -> u64 {
    radiomesh_protocol::MAX_CLUSTER_ID
}
fn default_tie_break_jitter() -> u64 {
    radiomesh_protocol::TIE_BREAK_JITTER
}
fn default_max_wait_send_ticks() -> u32 {
    radiomesh_protocol::MAX_WAIT_SEND_TICKS
}
fn default_max_wait_receive_ticks() -> u32 {
    radiomesh_protocol::MAX_WAIT_RECEIVE_TICKS
}
fn default_startup_desync_ticks() -> u32 {
    radiomesh_protocol::MAX_WAIT_SEND_TICKS
}
fn default_payload_memory() -> usize {
    radiomesh_protocol::MAX_PAYLOAD_MEMORY
}
fn default_log_level() -> String {
    "info".to_string()
}

// -- Trait impls --

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            arena: ArenaConfig::default(),
            radio: RadioConfig::default(),
            election: ElectionSection::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            nodes: default_nodes(),
            seed: default_seed(),
            ticks: default_ticks(),
            tick_rate_hz: default_tick_rate(),
            census_interval_ticks: default_census_interval(),
        }
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: default_arena_side(),
            height: default_arena_side(),
            walk_step: default_walk_step(),
        }
    }
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            range: default_range(),
            propagation_speed: default_propagation_speed(),
        }
    }
}

impl Default for ElectionSection {
    fn default() -> Self {
        Self {
            initial_cluster_id: default_initial_cluster_id(),
            max_cluster_id: default_max_cluster_id(),
            tie_break_jitter: default_tie_break_jitter(),
            max_wait_send_ticks: default_max_wait_send_ticks(),
            max_wait_receive_ticks: default_max_wait_receive_ticks(),
            startup_desync_ticks: default_startup_desync_ticks(),
            payload_memory: default_payload_memory(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl ElectionSection {
    pub fn to_election_config(&self) -> ElectionConfig {
        ElectionConfig {
            initial_cluster_id: self.initial_cluster_id,
            max_cluster_id: self.max_cluster_id,
            tie_break_jitter: self.tie_break_jitter,
            max_wait_send_ticks: self.max_wait_send_ticks,
            max_wait_receive_ticks: self.max_wait_receive_ticks,
            startup_desync_ticks: self.startup_desync_ticks,
            payload_memory: self.payload_memory,
        }
    }
}

impl SimConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: SimConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, with environment variable
    /// overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, anyhow::Error> {
        let mut config = if let Some(path) = path {
            if path.exists() {
                Self::from_file(path)?
            } else {
                tracing::warn!(
                    path = %path.display(),
                    "Config file not found, using defaults"
                );
                Self::default()
            }
        } else {
            Self::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("RADIOMESH_NODES") {
            if let Ok(n) = val.parse() {
                self.simulation.nodes = n;
            }
        }
        if let Ok(val) = std::env::var("RADIOMESH_SEED") {
            if let Ok(s) = val.parse() {
                self.simulation.seed = s;
            }
        }
        if let Ok(val) = std::env::var("RADIOMESH_TICKS") {
            if let Ok(t) = val.parse() {
                self.simulation.ticks = t;
            }
        }
        if let Ok(val) = std::env::var("RADIOMESH_RANGE") {
            if let Ok(r) = val.parse() {
                self.radio.range = r;
            }
        }
        if let Ok(val) = std::env::var("RADIOMESH_LOG_LEVEL") {
            self.logging.level = val;
        }
    }

    /// Reject configurations the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.simulation.nodes == 0 {
            return Err(ProtocolError::InvalidConfig(
                "simulation.nodes must be at least 1".into(),
            ));
        }
        if self.simulation.tick_rate_hz <= 0.0 {
            return Err(ProtocolError::InvalidConfig(
                "simulation.tick_rate_hz must be positive".into(),
            ));
        }
        if self.radio.propagation_speed <= 0.0 {
            return Err(ProtocolError::InvalidConfig(
                "radio.propagation_speed must be positive".into(),
            ));
        }
        if self.radio.range <= 0.0 {
            return Err(ProtocolError::InvalidConfig(
                "radio.range must be positive".into(),
            ));
        }
        if self.arena.width <= 0.0 || self.arena.height <= 0.0 {
            return Err(ProtocolError::InvalidConfig(
                "arena dimensions must be positive".into(),
            ));
        }
        if self.election.max_cluster_id == 0 {
            return Err(ProtocolError::InvalidConfig(
                "election.max_cluster_id must be positive".into(),
            ));
        }
        if self.election.payload_memory == 0 {
            return Err(ProtocolError::InvalidConfig(
                "election.payload_memory must be positive".into(),
            ));
        }
        Ok(())
    }
}
