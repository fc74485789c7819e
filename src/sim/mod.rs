//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame deltas, split into bounded sub-steps
//! - Seeded RNG only
//! - Stable iteration order (obstacles in spawn order)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod ground;
pub mod obstacle;
pub mod physics;
pub mod spawner;
pub mod state;
pub mod terrain;
pub mod tick;

pub use collision::{Aabb, ObstacleContact, fully_over_pit, out_of_bounds};
pub use difficulty::DifficultyController;
pub use ground::{GroundColumn, GroundProfile};
pub use obstacle::{BirdFlight, FlightPhase, Obstacle, ObstacleKind};
pub use physics::{Player, PlayerState, allowed_jumps, jump_velocity};
pub use spawner::{ObstacleSpawner, SpawnKind, Spawned, elevation_directive};
pub use state::{
    GameEvent, PlayerPose, RenderSnapshot, RunPhase, RunSummary, SimulationContext, TerminalCause,
};
pub use terrain::{GenerationDirective, GenerationState, TerrainGenerator};
pub use tick::{ScoreSink, TickResult, step};
