//! RadioMesh - Core types for decentralized cluster election over a
//! radius-limited broadcast medium.
//!
//! Defines the cluster announcement payload, its ordering semantics
//! (lifetime dominates, cluster id breaks ties), the 2D geometry used by
//! the reachability test, and the protocol constants shared by every
//! crate in the workspace.

pub mod constants;
pub mod error;
pub mod payload;
pub mod types;

pub use constants::*;
pub use error::*;
pub use payload::*;
pub use types::*;
