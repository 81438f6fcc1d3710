//! Per-node election state machine.
//!
//! Each node runs the same protocol with no central coordinator:
//!
//! 1. Everyone starts as the leader of its own singleton cluster
//! 2. A leader announces its `(lifetime, cluster)` standing every
//!    `max_wait_send_ticks` ticks, aging the cluster by one per cycle
//! 3. A node that hears a superior standing adopts it and follows
//! 4. Nodes relay own-cluster payloads onward (flooding), suppressed by
//!    a bounded memory of already-seen payloads
//! 5. A follower that hears nothing for `max_wait_receive_ticks` ticks
//!    declares its leader dead and seizes leadership with a fresh id
//! 6. Two leaders of identical standing break the tie by randomly
//!    perturbing their cluster id
//!
//! Every transition is total: any payload in any state has a defined
//! outcome, and the protocol-level failures (coexisting leaders, stale
//! followers) are handled as ordinary transitions rather than errors.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use radiomesh_protocol::{
    ClusterPayload, ClusterStanding, NodeId, Position, INITIAL_CLUSTER_ID, MAX_CLUSTER_ID,
    MAX_PAYLOAD_MEMORY, MAX_WAIT_RECEIVE_TICKS, MAX_WAIT_SEND_TICKS, NONCE_SPACE, TIE_BREAK_JITTER,
};

use crate::memory::PayloadMemory;
use crate::mobility::Mobility;

/// Election role of a node. A node is exactly one of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Leader,
    Follower,
}

/// Tunable parameters of the election state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectionConfig {
    /// Cluster id every node claims at startup and after a reset.
    pub initial_cluster_id: u64,
    /// Exclusive upper bound for cluster ids drawn at re-election.
    pub max_cluster_id: u64,
    /// Exclusive upper bound of the tie-break id offset.
    pub tie_break_jitter: u64,
    /// Ticks between leader announcements.
    pub max_wait_send_ticks: u32,
    /// Ticks a follower tolerates leader silence.
    pub max_wait_receive_ticks: u32,
    /// Span of the random timer offset applied at startup and reset,
    /// de-synchronizing announcement phases across the mesh.
    pub startup_desync_ticks: u32,
    /// Capacity of the duplicate-suppression memory.
    pub payload_memory: usize,
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self {
            initial_cluster_id: INITIAL_CLUSTER_ID,
            max_cluster_id: MAX_CLUSTER_ID,
            tie_break_jitter: TIE_BREAK_JITTER,
            max_wait_send_ticks: MAX_WAIT_SEND_TICKS,
            max_wait_receive_ticks: MAX_WAIT_RECEIVE_TICKS,
            startup_desync_ticks: MAX_WAIT_SEND_TICKS,
            payload_memory: MAX_PAYLOAD_MEMORY,
        }
    }
}

/// An outgoing broadcast request handed back to the orchestrator.
///
/// Nodes hold no reference to the network; everything they want on the
/// air is returned as a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transmission {
    pub origin: Position,
    pub range: f64,
    pub payload: ClusterPayload,
}

/// A mobile agent participating in the election.
pub struct Node {
    id: NodeId,
    position: Position,
    range: f64,
    role: Role,
    standing: ClusterStanding,
    ticks_since_payload: u32,
    memory: PayloadMemory,
    mobility: Box<dyn Mobility>,
    config: ElectionConfig,
}

impl Node {
    /// Create a node leading its own singleton cluster.
    ///
    /// The announcement phase is de-synchronized by drawing the initial
    /// tick counter uniformly from `[0, startup_desync_ticks]`, so a
    /// freshly seeded mesh does not announce in lock-step.
    pub fn new(
        id: NodeId,
        position: Position,
        range: f64,
        mobility: Box<dyn Mobility>,
        config: ElectionConfig,
        rng: &mut dyn RngCore,
    ) -> Self {
        let desync = rng.gen_range(0..=config.startup_desync_ticks);
        Self {
            id,
            position,
            range,
            role: Role::Leader,
            standing: ClusterStanding::new(0, config.initial_cluster_id),
            ticks_since_payload: desync,
            memory: PayloadMemory::new(config.payload_memory),
            mobility,
            config,
        }
    }

    /// Advance one tick: move, then run the role-specific timer logic.
    ///
    /// Returns the announcement to put on the air, if the leader cadence
    /// fired this tick.
    pub fn timestep(&mut self, rng: &mut dyn RngCore) -> Option<Transmission> {
        self.position = self.mobility.step(self.position, rng);
        self.ticks_since_payload += 1;

        match self.role {
            Role::Leader if self.ticks_since_payload > self.config.max_wait_send_ticks => {
                self.standing.lifetime += 1;
                self.ticks_since_payload = 0;
                Some(self.announce(rng))
            }
            Role::Follower if self.ticks_since_payload > self.config.max_wait_receive_ticks => {
                self.seize_leadership(rng);
                None
            }
            _ => None,
        }
    }

    /// Handle one payload delivered by an in-range broadcast.
    ///
    /// Returns the relay transmission when the payload belongs to this
    /// node's cluster and has not been seen before.
    pub fn on_payload(
        &mut self,
        payload: ClusterPayload,
        rng: &mut dyn RngCore,
    ) -> Option<Transmission> {
        if self.memory.contains(&payload) {
            return None;
        }
        // Remembered even when rejected below, so the same payload is
        // never reprocessed.
        self.memory.record(payload);

        if payload.standing.outranks(&self.standing) {
            tracing::debug!(
                node = %self.id,
                from = %self.standing,
                to = %payload.standing,
                "joining superior cluster"
            );
            self.standing = payload.standing;
            self.role = Role::Follower;
        }

        if payload.standing.cluster != self.standing.cluster {
            // Inferior foreign cluster: remembered, never relayed.
            return None;
        }

        if self.role == Role::Leader {
            // Own-cluster payload reaching a leader means another leader
            // of identical standing. Nudging the id makes one side
            // superior on the next comparison round. Offsets accumulate
            // with no normalization, so ids grow without bound over
            // repeated collisions.
            let offset = rng.gen_range(0..self.config.tie_break_jitter);
            self.standing.cluster += offset;
            tracing::debug!(
                node = %self.id,
                offset,
                cluster = self.standing.cluster,
                "tie-break against equal-standing leader"
            );
        }

        self.ticks_since_payload = 0;
        Some(Transmission {
            origin: self.position,
            range: self.range,
            payload,
        })
    }

    /// Reinitialize to a startup-equivalent state.
    ///
    /// The dedup memory is deliberately left intact: fresh nonces keep
    /// post-reset announcements distinct.
    pub fn reset(&mut self, rng: &mut dyn RngCore) {
        self.role = Role::Leader;
        self.standing = ClusterStanding::new(0, self.config.initial_cluster_id);
        self.ticks_since_payload = rng.gen_range(0..=self.config.startup_desync_ticks);
    }

    fn announce(&mut self, rng: &mut dyn RngCore) -> Transmission {
        let payload = ClusterPayload::new(self.standing, rng.gen_range(0..NONCE_SPACE));
        // A sender remembers its own payload so the flood echo is ignored.
        self.memory.record(payload);
        tracing::trace!(node = %self.id, standing = %self.standing, "leader announcement");
        Transmission {
            origin: self.position,
            range: self.range,
            payload,
        }
    }

    fn seize_leadership(&mut self, rng: &mut dyn RngCore) {
        self.role = Role::Leader;
        self.standing = ClusterStanding::new(0, rng.gen_range(0..self.config.max_cluster_id));
        self.ticks_since_payload = 0;
        tracing::debug!(
            node = %self.id,
            cluster = self.standing.cluster,
            "leader silent too long, seizing leadership"
        );
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn range(&self) -> f64 {
        self.range
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_leader(&self) -> bool {
        self.role == Role::Leader
    }

    /// The `(lifetime, cluster)` standing this node currently claims or
    /// follows.
    pub fn standing(&self) -> ClusterStanding {
        self.standing
    }

    pub fn cluster(&self) -> u64 {
        self.standing.cluster
    }

    pub fn lifetime(&self) -> u64 {
        self.standing.lifetime
    }

    /// Ticks since this node last sent or received a cluster payload.
    pub fn ticks_since_payload(&self) -> u32 {
        self.ticks_since_payload
    }

    /// Number of payloads currently held by the dedup memory.
    pub fn seen_payloads(&self) -> usize {
        self.memory.len()
    }
}
