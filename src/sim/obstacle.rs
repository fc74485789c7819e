//! Obstacle entities
//!
//! Live, drawable things that scroll toward the player. Terrain-shaping
//! requests (pits, elevation changes) are not obstacles; see
//! [`GenerationDirective`](super::terrain::GenerationDirective).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;

/// Bird flight phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightPhase {
    /// Diagonal dive toward the destination point
    Swooping,
    /// Level flight after reaching the destination
    Cruising,
}

/// Bird trajectory state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BirdFlight {
    pub spawn: Vec2,
    pub dest: Vec2,
    /// Velocity on top of the terrain scroll
    pub vel: Vec2,
    pub phase: FlightPhase,
    /// Cruise speed relative to the terrain (units/s, leftward)
    pub cruise_speed: f32,
}

/// Obstacle variants with their per-kind payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Block sitting on the ground
    Ground,
    /// Block floating just above jump-under height
    Air,
    Bird(BirdFlight),
    /// Collectible; scores instead of ending the run
    Coin,
}

impl ObstacleKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObstacleKind::Ground => "ground",
            ObstacleKind::Air => "air",
            ObstacleKind::Bird(_) => "bird",
            ObstacleKind::Coin => "coin",
        }
    }

    /// Touching this kind ends the run
    pub fn is_hazard(&self) -> bool {
        !matches!(self, ObstacleKind::Coin)
    }
}

/// A live obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Top-left corner (arcade units, y down)
    pub pos: Vec2,
    pub size: Vec2,
    /// Pass bonus already paid
    pub awarded: bool,
    /// Coin picked up; dropped on the next filtering pass
    pub collected: bool,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            size,
            awarded: false,
            collected: false,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// World x of the trailing (right) edge
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    /// Move with the terrain scroll (plus own motion for birds)
    pub fn advance(&mut self, scroll: f32, dt: f32) {
        self.pos.x -= scroll;
        if let ObstacleKind::Bird(flight) = &mut self.kind {
            self.pos += flight.vel * dt;
            if flight.phase == FlightPhase::Swooping && self.pos.x <= flight.dest.x {
                self.pos = flight.dest;
                flight.vel = Vec2::new(-flight.cruise_speed, 0.0);
                flight.phase = FlightPhase::Cruising;
            }
        }
    }
}
