//! Arcade Runner - endless runner simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, obstacles, physics, collisions)
//! - `settings`: Data-driven run tuning
//! - `mechanics`: Externally toggled run modifiers (double jump, bridges, coins)
//! - `highscores`: Local leaderboard fed by finished runs

pub mod highscores;
pub mod mechanics;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use mechanics::{MechanicsConfig, MechanicsSource, SharedMechanics};
pub use settings::RunnerSettings;

/// Game configuration constants
pub mod consts {
    /// Longest slice of time a single sub-step may integrate (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Frame deltas above this are clamped (tab switches, debugger pauses)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Hard cap on sub-steps per `step` call
    pub const MAX_SUBSTEPS: u32 = 64;

    /// Grid geometry (arcade units)
    pub const VISIBLE_COLS: usize = 9;
    pub const VISIBLE_ROWS: u32 = 16;

    /// Terrain heights are measured in rows from the bottom of the play field
    pub const INITIAL_GROUND: u8 = 5;
    pub const MIN_GROUND: u8 = 2;
    pub const MAX_GROUND: u8 = 10;
    /// Run length of a pit directive, the resume column included
    pub const PIT_RUN: u32 = 3;
    /// Run length used when an elevation change is out of range
    pub const BLOCKED_ELEVATION_PIT_RUN: u32 = 2;

    /// Gravity (arcade units/s²)
    pub const GRAVITY: f32 = 25.0;
    /// Peak height of an unobstructed jump (arcade units)
    pub const JUMP_HEIGHT: f32 = 3.0;
    pub const PLAYER_SIZE: f32 = 1.0;
    pub const PLAYER_HOME_X: f32 = 1.0;
    /// Drift back toward the home column after being pushed (units/s)
    pub const HOME_RECOVERY_RATE: f32 = 0.2;
    /// Ground samples sit this fraction of the player width in from each corner
    pub const SUPPORT_INSET: f32 = 0.1;

    /// Scroll speed at multiplier 1.0 (arcade units/s)
    pub const BASE_SPEED: f32 = 3.0;
    pub const SPEEDUP_INTERVAL: f32 = 4.0;
    pub const SPEEDUP_FACTOR: f32 = 1.1;

    /// Distance between spawns is drawn from this range
    pub const SPACING_MIN: f32 = 4.0;
    pub const SPACING_MAX: f32 = 6.0;
    pub const BIRD_DEST_X: f32 = 5.0;
    pub const BIRD_SPEED: f32 = 2.0;
    /// Obstacles whose right edge is left of this are dropped
    pub const DESPAWN_X: f32 = -2.0;

    pub const COLUMN_SCORE: u64 = 10;
    pub const PASS_BONUS: u64 = 50;
    pub const COIN_VALUE: u64 = 500;
}
