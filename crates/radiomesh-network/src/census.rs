//! Cluster formation snapshots.
//!
//! Observability for hosts: how many leaders remain, how many distinct
//! clusters are claimed, and how big the largest one has grown. The
//! census is a pure read over the network; taking one never perturbs
//! the election.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::network::Network;

/// Point-in-time summary of cluster formation across the mesh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterCensus {
    pub tick: u64,
    pub leaders: usize,
    pub followers: usize,
    /// Number of distinct cluster ids currently claimed or followed.
    pub distinct_clusters: usize,
    /// Population of the most popular cluster.
    pub largest_cluster: usize,
    pub live_broadcasts: usize,
}

impl ClusterCensus {
    pub fn take(network: &Network) -> Self {
        let mut populations: HashMap<u64, usize> = HashMap::new();
        let mut leaders = 0;
        for node in network.nodes() {
            *populations.entry(node.cluster()).or_insert(0) += 1;
            if node.is_leader() {
                leaders += 1;
            }
        }

        Self {
            tick: network.tick(),
            leaders,
            followers: network.node_count() - leaders,
            distinct_clusters: populations.len(),
            largest_cluster: populations.values().copied().max().unwrap_or(0),
            live_broadcasts: network.broadcast_count(),
        }
    }

    /// True when a fully connected mesh has settled: one cluster, one
    /// leader. Meaningless for a partitioned arena, where one leader
    /// per component is the expected fixed point.
    pub fn is_converged(&self) -> bool {
        self.leaders == 1 && self.distinct_clusters == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radiomesh_election::{ElectionConfig, Stationary};
    use radiomesh_protocol::{ClusterPayload, ClusterStanding, Position};

    #[test]
    fn test_census_counts_fresh_mesh() {
        let mut network = Network::new(1, 10.0);
        for i in 0..4 {
            network.spawn_node(
                Position::new(i as f64 * 200.0, 0.0),
                60.0,
                Box::new(Stationary),
                ElectionConfig::default(),
            );
        }

        let census = ClusterCensus::take(&network);
        assert_eq!(census.leaders, 4);
        assert_eq!(census.followers, 0);
        // Every node starts on the same fixed initial id.
        assert_eq!(census.distinct_clusters, 1);
        assert_eq!(census.largest_cluster, 4);
        assert!(!census.is_converged());
    }

    #[test]
    fn test_census_after_adoption() {
        let mut network = Network::new(1, 10.0);
        network.spawn_node(
            Position::new(5.0, 0.0),
            60.0,
            Box::new(Stationary),
            ElectionConfig {
                max_wait_send_ticks: 100_000,
                ..Default::default()
            },
        );
        network.create_broadcast(
            Position::origin(),
            60.0,
            ClusterPayload::new(ClusterStanding::new(3, 700), 1),
        );
        network.timestep();

        let census = ClusterCensus::take(&network);
        assert_eq!(census.leaders, 0);
        assert_eq!(census.followers, 1);
        assert_eq!(census.distinct_clusters, 1);
    }
}
