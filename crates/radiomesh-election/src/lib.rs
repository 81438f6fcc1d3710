//! RadioMesh Election - per-node leader election over a broadcast medium.
//!
//! Implements the decentralized election each node runs on its own:
//! - Every node starts as the leader of its own singleton cluster
//! - Leaders periodically announce their `(lifetime, cluster)` standing
//! - Hearing a superior standing demotes a node to follower of that cluster
//! - A follower whose leader goes silent seizes leadership with a fresh id
//! - Equal-standing leader collisions are broken by random id perturbation
//!
//! Movement is out of scope for the election core: nodes delegate their
//! per-tick position update to an injected [`Mobility`] strategy and only
//! consume the resulting position.

pub mod memory;
pub mod mobility;
pub mod node;

pub use memory::PayloadMemory;
pub use mobility::{Mobility, RandomWalk, Stationary, Waypoints};
pub use node::{ElectionConfig, Node, Role, Transmission};
