/// Fixed cluster id every node claims at startup and after a reset.
pub const INITIAL_CLUSTER_ID: u64 = 10;

/// Exclusive upper bound for cluster ids drawn at re-election.
pub const MAX_CLUSTER_ID: u64 = 1000;

/// Ticks a leader stays quiet before its next announcement.
pub const MAX_WAIT_SEND_TICKS: u32 = 10;

/// Ticks a follower waits for a leader announcement before seizing
/// leadership itself.
pub const MAX_WAIT_RECEIVE_TICKS: u32 = 40;

/// Capacity of the per-node duplicate-suppression memory.
pub const MAX_PAYLOAD_MEMORY: usize = 100;

/// Exclusive upper bound for announcement nonces.
pub const NONCE_SPACE: u32 = 99_999;

/// Exclusive upper bound of the additive offset applied to a leader's
/// cluster id on an equal-standing collision.
pub const TIE_BREAK_JITTER: u64 = 20;

/// Distance a broadcast wavefront's radius grows per tick.
pub const PROPAGATION_SPEED: f64 = 10.0;

/// Default broadcast range a node stamps on its transmissions.
pub const DEFAULT_RANGE: f64 = 60.0;

/// Wire tuple arity for a cluster payload: [lifetime, cluster, nonce].
pub const PAYLOAD_WIRE_ARITY: usize = 3;
