//! Expanding-ring wavefronts.

use radiomesh_protocol::{ClusterPayload, Position};

/// A circular wavefront expanding from a fixed origin, carrying one
/// immutable payload. Pure value semantics; the network decides when an
/// expired wavefront leaves the medium.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Broadcast {
    origin: Position,
    radius: f64,
    max_radius: f64,
    speed: f64,
    payload: ClusterPayload,
}

impl Broadcast {
    pub fn new(origin: Position, max_radius: f64, speed: f64, payload: ClusterPayload) -> Self {
        Self {
            origin,
            radius: 0.0,
            max_radius,
            speed,
            payload,
        }
    }

    /// Grow the radius by one tick's worth of propagation. No bounds
    /// check; retirement is the network's job.
    pub fn advance(&mut self) {
        self.radius += self.speed;
    }

    /// True once the wavefront has passed its range limit.
    pub fn has_expired(&self) -> bool {
        self.radius > self.max_radius
    }

    /// True iff `point` lies strictly inside the current ring.
    pub fn reaches(&self, point: Position) -> bool {
        self.origin.distance_to(&point) < self.radius
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    pub fn payload(&self) -> ClusterPayload {
        self.payload
    }
}
