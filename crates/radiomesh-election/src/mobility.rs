//! Movement strategies injected into nodes.
//!
//! The election core never computes motion itself; it calls the strategy
//! once per tick and uses the returned position for everything else.
//! This keeps the protocol testable with stationary or scripted nodes
//! while the sim host plugs in live motion.

use std::collections::VecDeque;

use rand::{Rng, RngCore};

use radiomesh_protocol::Position;

/// Per-tick position updater for a single node.
pub trait Mobility {
    /// Compute the node's next position from its current one.
    fn step(&mut self, current: Position, rng: &mut dyn RngCore) -> Position;
}

/// Keeps the node exactly where it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stationary;

impl Mobility for Stationary {
    fn step(&mut self, current: Position, _rng: &mut dyn RngCore) -> Position {
        current
    }
}

/// Replays a scripted position sequence, then holds the last position.
///
/// Lets tests walk a node in and out of broadcast range on an exact
/// schedule.
#[derive(Debug, Clone)]
pub struct Waypoints {
    remaining: VecDeque<Position>,
}

impl Waypoints {
    pub fn new(points: Vec<Position>) -> Self {
        Self {
            remaining: points.into(),
        }
    }
}

impl Mobility for Waypoints {
    fn step(&mut self, current: Position, _rng: &mut dyn RngCore) -> Position {
        self.remaining.pop_front().unwrap_or(current)
    }
}

/// Uniform bounded-step jitter clamped to a rectangular arena.
///
/// Stands in for the out-of-scope flocking model when the sim host wants
/// live motion.
#[derive(Debug, Clone)]
pub struct RandomWalk {
    max_step: f64,
    width: f64,
    height: f64,
}

impl RandomWalk {
    pub fn new(max_step: f64, width: f64, height: f64) -> Self {
        Self {
            max_step,
            width,
            height,
        }
    }
}

impl Mobility for RandomWalk {
    fn step(&mut self, current: Position, rng: &mut dyn RngCore) -> Position {
        let dx = rng.gen_range(-self.max_step..=self.max_step);
        let dy = rng.gen_range(-self.max_step..=self.max_step);
        Position::new(
            (current.x + dx).clamp(0.0, self.width),
            (current.y + dy).clamp(0.0, self.height),
        )
    }
}
