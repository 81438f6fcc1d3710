//! Drives a network through a full run.
//!
//! Two pacing modes:
//! - Fast-forward: ticks back to back, for headless batch runs
//! - Paced: a tokio interval at the configured tick rate, stopping on
//!   ctrl-c or tick budget, for watching a run unfold in the logs

use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use radiomesh_election::RandomWalk;
use radiomesh_network::{ClusterCensus, Network};

use crate::config::SimConfig;
use crate::report::RunReport;

/// Build a seeded network with the configured population scattered
/// uniformly over the arena.
pub fn build_network(config: &SimConfig) -> Network {
    let mut network = Network::new(config.simulation.seed, config.radio.propagation_speed);
    let election = config.election.to_election_config();
    for _ in 0..config.simulation.nodes {
        let position = network.scatter(config.arena.width, config.arena.height);
        network.spawn_node(
            position,
            config.radio.range,
            Box::new(RandomWalk::new(
                config.arena.walk_step,
                config.arena.width,
                config.arena.height,
            )),
            election.clone(),
        );
    }
    network
}

/// Collects census samples and watches for convergence.
struct CensusTrail {
    interval: u64,
    samples: Vec<ClusterCensus>,
    converged_at: Option<u64>,
}

impl CensusTrail {
    fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            samples: Vec::new(),
            converged_at: None,
        }
    }

    fn observe(&mut self, network: &Network) {
        if network.tick() % self.interval != 0 {
            return;
        }
        let census = ClusterCensus::take(network);
        tracing::info!(
            tick = census.tick,
            leaders = census.leaders,
            clusters = census.distinct_clusters,
            largest = census.largest_cluster,
            broadcasts = census.live_broadcasts,
            "census"
        );
        if self.converged_at.is_none() && census.is_converged() {
            self.converged_at = Some(census.tick);
            tracing::info!(tick = census.tick, "mesh converged to a single leader");
        }
        self.samples.push(census);
    }
}

/// Run the simulation to completion and produce a report.
pub async fn run(config: SimConfig, fast: bool) -> anyhow::Result<RunReport> {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    let mut network = build_network(&config);
    let mut trail = CensusTrail::new(config.simulation.census_interval_ticks);

    tracing::info!(
        %run_id,
        nodes = config.simulation.nodes,
        seed = config.simulation.seed,
        ticks = config.simulation.ticks,
        fast,
        "starting simulation run"
    );

    if fast {
        for _ in 0..config.simulation.ticks {
            network.timestep();
            trail.observe(&network);
        }
    } else {
        let period = Duration::from_secs_f64(1.0 / config.simulation.tick_rate_hz);
        let mut ticker = tokio::time::interval(period);
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        while network.tick() < config.simulation.ticks {
            tokio::select! {
                _ = ticker.tick() => {
                    network.timestep();
                    trail.observe(&network);
                }
                _ = &mut shutdown => {
                    tracing::info!(tick = network.tick(), "interrupted, finishing run early");
                    break;
                }
            }
        }
    }

    let final_census = ClusterCensus::take(&network);
    tracing::info!(
        ticks_run = network.tick(),
        leaders = final_census.leaders,
        clusters = final_census.distinct_clusters,
        "simulation run finished"
    );

    Ok(RunReport {
        run_id,
        started_at,
        finished_at: Utc::now(),
        seed: config.simulation.seed,
        nodes: config.simulation.nodes,
        ticks_run: network.tick(),
        converged_at_tick: trail.converged_at,
        final_census,
        samples: trail.samples,
    })
}
