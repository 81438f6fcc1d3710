//! The network aggregate: node collection, live wavefronts, and the
//! per-tick orchestration loop.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use radiomesh_election::{ElectionConfig, Mobility, Node, Transmission};
use radiomesh_protocol::{ClusterPayload, NodeId, Position, ProtocolError};

use crate::broadcast::Broadcast;

/// The shared broadcast medium and everything attached to it.
///
/// Node membership is fixed once ticking starts; the wavefront set
/// changes every tick. An explicit, passable object: hosts construct
/// one, call [`Network::timestep`] once per frame, and read the node
/// and broadcast collections for display.
pub struct Network {
    nodes: Vec<Node>,
    broadcasts: Vec<Broadcast>,
    speed: f64,
    rng: ChaCha8Rng,
    tick: u64,
}

impl Network {
    /// Create an empty network with a seeded random source and the
    /// given per-tick wavefront propagation speed.
    pub fn new(seed: u64, propagation_speed: f64) -> Self {
        Self {
            nodes: Vec::new(),
            broadcasts: Vec::new(),
            speed: propagation_speed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            tick: 0,
        }
    }

    /// Add a node during setup. Ids follow spawn order; all randomness
    /// in the node's initialization draws from the network's source.
    pub fn spawn_node(
        &mut self,
        position: Position,
        range: f64,
        mobility: Box<dyn Mobility>,
        config: ElectionConfig,
    ) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        let node = Node::new(id, position, range, mobility, config, &mut self.rng);
        self.nodes.push(node);
        id
    }

    /// Advance the whole simulation by one tick.
    ///
    /// Wavefronts are processed in creation order and nodes in spawn
    /// order, so every random draw happens at a fixed point in the
    /// traversal and seeded runs reproduce exactly. Sends produced
    /// during the tick are queued and join the medium at tick end.
    pub fn timestep(&mut self) {
        self.tick += 1;
        let mut outgoing: Vec<Transmission> = Vec::new();

        // Expand, retire, deliver. An expired wavefront delivers
        // nothing on its final tick.
        let live = std::mem::take(&mut self.broadcasts);
        let mut kept = Vec::with_capacity(live.len());
        for mut broadcast in live {
            broadcast.advance();
            if broadcast.has_expired() {
                tracing::trace!(
                    tick = self.tick,
                    radius = broadcast.radius(),
                    "wavefront expired"
                );
                continue;
            }
            for node in &mut self.nodes {
                if broadcast.reaches(node.position()) {
                    if let Some(tx) = node.on_payload(broadcast.payload(), &mut self.rng) {
                        outgoing.push(tx);
                    }
                }
            }
            kept.push(broadcast);
        }
        self.broadcasts = kept;

        // Election timers and movement.
        for node in &mut self.nodes {
            if let Some(tx) = node.timestep(&mut self.rng) {
                outgoing.push(tx);
            }
        }

        // Queued sends join the medium; visible from the next tick.
        for tx in outgoing {
            self.create_broadcast(tx.origin, tx.range, tx.payload);
        }
    }

    /// Put a new wavefront on the air. Unconditional; the medium has no
    /// capacity limit.
    pub fn create_broadcast(&mut self, origin: Position, range: f64, payload: ClusterPayload) {
        self.broadcasts
            .push(Broadcast::new(origin, range, self.speed, payload));
    }

    /// Host-facing perturbation: validate a raw wire tuple and, if well
    /// formed, put it on the air from the given origin.
    pub fn inject(
        &mut self,
        origin: Position,
        range: f64,
        raw: &[u64],
    ) -> Result<(), ProtocolError> {
        let payload = ClusterPayload::from_wire(raw)?;
        tracing::debug!(tick = self.tick, standing = %payload.standing, "host payload injected");
        self.create_broadcast(origin, range, payload);
        Ok(())
    }

    /// Host-invoked reset: clear the airwaves and return every node to
    /// leading its own singleton cluster.
    pub fn reset(&mut self) {
        self.broadcasts.clear();
        for node in &mut self.nodes {
            node.reset(&mut self.rng);
        }
        tracing::info!(
            tick = self.tick,
            nodes = self.nodes.len(),
            "network reset"
        );
    }

    /// Read-only node view for display and inspection.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Read-only wavefront view for display and inspection.
    pub fn broadcasts(&self) -> &[Broadcast] {
        &self.broadcasts
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn broadcast_count(&self) -> usize {
        self.broadcasts.len()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Draw from the network's random source. Keeps host-side draws
    /// (e.g. scatter placement) on the same reproducible stream.
    pub fn rng(&mut self) -> &mut dyn RngCore {
        &mut self.rng
    }

    /// Uniform random position inside a `width` by `height` arena,
    /// drawn from the network's source.
    pub fn scatter(&mut self, width: f64, height: f64) -> Position {
        Position::new(
            self.rng.gen_range(0.0..width),
            self.rng.gen_range(0.0..height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radiomesh_election::Stationary;
    use radiomesh_protocol::ClusterStanding;

    fn quiet_config() -> ElectionConfig {
        // Nodes that never announce on their own; keeps delivery tests
        // free of background traffic.
        ElectionConfig {
            max_wait_send_ticks: 100_000,
            max_wait_receive_ticks: 100_000,
            ..Default::default()
        }
    }

    #[test]
    fn test_spawn_assigns_sequential_ids() {
        let mut network = Network::new(1, 10.0);
        let a = network.spawn_node(
            Position::origin(),
            60.0,
            Box::new(Stationary),
            ElectionConfig::default(),
        );
        let b = network.spawn_node(
            Position::new(50.0, 0.0),
            60.0,
            Box::new(Stationary),
            ElectionConfig::default(),
        );
        assert_eq!(a, NodeId::new(0));
        assert_eq!(b, NodeId::new(1));
        assert_eq!(network.node_count(), 2);
    }

    #[test]
    fn test_broadcast_lifecycle_tick_count() {
        let mut network = Network::new(1, 10.0);
        let payload = ClusterPayload::new(ClusterStanding::new(0, 10), 1);
        network.create_broadcast(Position::origin(), 60.0, payload);

        // radius hits the 60.0 limit on tick 6 and is still live;
        // tick 7 pushes it past the limit and retires it.
        for _ in 0..6 {
            network.timestep();
        }
        assert_eq!(network.broadcast_count(), 1);
        network.timestep();
        assert_eq!(network.broadcast_count(), 0);
    }

    #[test]
    fn test_expiring_wavefront_delivers_nothing() {
        let mut network = Network::new(1, 10.0);
        // Node sits past the range limit; the only tick whose radius
        // would cover it is the tick the wavefront expires on.
        network.spawn_node(
            Position::new(65.0, 0.0),
            60.0,
            Box::new(Stationary),
            quiet_config(),
        );
        let payload = ClusterPayload::new(ClusterStanding::new(5, 999), 1);
        network.create_broadcast(Position::origin(), 60.0, payload);

        for _ in 0..10 {
            network.timestep();
        }
        let node = &network.nodes()[0];
        assert!(node.is_leader(), "payload must never have arrived");
        assert_eq!(node.seen_payloads(), 0);
    }

    #[test]
    fn test_delivery_inside_radius() {
        let mut network = Network::new(1, 10.0);
        network.spawn_node(
            Position::new(25.0, 0.0),
            60.0,
            Box::new(Stationary),
            quiet_config(),
        );
        let payload = ClusterPayload::new(ClusterStanding::new(5, 999), 1);
        network.create_broadcast(Position::origin(), 60.0, payload);

        // Tick 3: radius 30 > 25, delivery fires.
        for _ in 0..3 {
            network.timestep();
        }
        let node = &network.nodes()[0];
        assert!(!node.is_leader());
        assert_eq!(node.cluster(), 999);
        assert_eq!(node.seen_payloads(), 1);
    }

    #[test]
    fn test_relay_joins_medium_next_tick() {
        let mut network = Network::new(1, 10.0);
        network.spawn_node(
            Position::new(5.0, 0.0),
            60.0,
            Box::new(Stationary),
            quiet_config(),
        );
        let payload = ClusterPayload::new(ClusterStanding::new(5, 999), 1);
        network.create_broadcast(Position::origin(), 60.0, payload);

        // First tick: radius 10 > 5, the node receives and relays.
        network.timestep();
        assert_eq!(
            network.broadcast_count(),
            2,
            "original wavefront plus the queued relay"
        );
        let relay = &network.broadcasts()[1];
        assert_eq!(relay.radius(), 0.0, "relay starts expanding next tick");
        assert_eq!(relay.payload(), payload);
    }

    #[test]
    fn test_inject_validates_wire_shape() {
        let mut network = Network::new(1, 10.0);
        assert!(network
            .inject(Position::origin(), 60.0, &[1, 2])
            .is_err());
        assert_eq!(network.broadcast_count(), 0);

        network
            .inject(Position::origin(), 60.0, &[0, 42, 7])
            .unwrap();
        assert_eq!(network.broadcast_count(), 1);
    }

    #[test]
    fn test_reset_clears_airwaves_and_roles() {
        let mut network = Network::new(1, 10.0);
        network.spawn_node(
            Position::new(5.0, 0.0),
            60.0,
            Box::new(Stationary),
            ElectionConfig::default(),
        );
        let payload = ClusterPayload::new(ClusterStanding::new(9, 500), 1);
        network.create_broadcast(Position::origin(), 60.0, payload);
        network.timestep();
        assert!(!network.nodes()[0].is_leader());

        network.reset();
        assert_eq!(network.broadcast_count(), 0);
        let node = &network.nodes()[0];
        assert!(node.is_leader());
        assert_eq!(node.cluster(), 10);
        assert_eq!(node.lifetime(), 0);
    }
}
