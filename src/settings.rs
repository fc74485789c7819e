//! Run tuning
//!
//! Geometry, physics and pacing for a run. Loaded from JSON by the loop
//! driver; every field falls back to the compiled-in default when missing.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tuning for a single run. Treated as immutable once the run starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSettings {
    // === Geometry ===
    /// On-screen columns (the ground window holds one extra lookahead column)
    pub visible_cols: usize,
    /// On-screen rows; ground heights are measured up from the bottom row
    pub visible_rows: u32,

    // === Terrain ===
    pub initial_ground: u8,
    pub min_ground: u8,
    pub max_ground: u8,
    /// Pit run length, the resume column included
    pub pit_run: u32,
    /// Pit run length used when an elevation change is out of range
    pub blocked_elevation_pit_run: u32,

    // === Physics ===
    pub gravity: f32,
    pub jump_height: f32,
    pub player_size: f32,
    pub player_home_x: f32,
    pub home_recovery_rate: f32,
    /// Fraction of the player width the ground samples sit in from each corner
    pub support_inset: f32,

    // === Pacing ===
    pub base_speed: f32,
    pub speedup_interval: f32,
    pub speedup_factor: f32,

    // === Spawning ===
    pub spacing_min: f32,
    pub spacing_max: f32,
    pub bird_dest_x: f32,
    pub bird_speed: f32,
    pub despawn_x: f32,

    // === Scoring ===
    pub column_score: u64,
    pub pass_bonus: u64,
    pub coin_value: u64,

    // === Stepping ===
    pub max_frame_dt: f32,
    pub sim_dt: f32,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            visible_cols: VISIBLE_COLS,
            visible_rows: VISIBLE_ROWS,

            initial_ground: INITIAL_GROUND,
            min_ground: MIN_GROUND,
            max_ground: MAX_GROUND,
            pit_run: PIT_RUN,
            blocked_elevation_pit_run: BLOCKED_ELEVATION_PIT_RUN,

            gravity: GRAVITY,
            jump_height: JUMP_HEIGHT,
            player_size: PLAYER_SIZE,
            player_home_x: PLAYER_HOME_X,
            home_recovery_rate: HOME_RECOVERY_RATE,
            support_inset: SUPPORT_INSET,

            base_speed: BASE_SPEED,
            speedup_interval: SPEEDUP_INTERVAL,
            speedup_factor: SPEEDUP_FACTOR,

            spacing_min: SPACING_MIN,
            spacing_max: SPACING_MAX,
            bird_dest_x: BIRD_DEST_X,
            bird_speed: BIRD_SPEED,
            despawn_x: DESPAWN_X,

            column_score: COLUMN_SCORE,
            pass_bonus: PASS_BONUS,
            coin_value: COIN_VALUE,

            max_frame_dt: MAX_FRAME_DT,
            sim_dt: SIM_DT,
        }
    }
}

impl RunnerSettings {
    /// Number of columns in the ground window (visible + one lookahead)
    pub fn window_len(&self) -> usize {
        self.visible_cols + 1
    }

    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("Invalid settings in {}: {err}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Could not read {}: {err}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Repair values the simulation cannot run with.
    ///
    /// Nothing here is surfaced as an error: each bad value is replaced by
    /// something playable and a warning is logged.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if self.visible_cols < 3 {
            log::warn!("visible_cols {} too small, using {}", self.visible_cols, defaults.visible_cols);
            self.visible_cols = defaults.visible_cols;
        }
        if self.min_ground == 0 {
            log::warn!("min_ground must be at least 1");
            self.min_ground = 1;
        }
        if self.min_ground > self.max_ground {
            log::warn!("min_ground {} > max_ground {}, swapping", self.min_ground, self.max_ground);
            std::mem::swap(&mut self.min_ground, &mut self.max_ground);
        }
        if u32::from(self.max_ground) + 2 > self.visible_rows {
            log::warn!("visible_rows {} cannot fit max_ground {}", self.visible_rows, self.max_ground);
            self.visible_rows = u32::from(self.max_ground) + 6;
        }
        self.initial_ground = self.initial_ground.clamp(self.min_ground, self.max_ground);

        if self.spacing_min > self.spacing_max {
            log::warn!("spacing_min > spacing_max, swapping");
            std::mem::swap(&mut self.spacing_min, &mut self.spacing_max);
        }
        if !(self.spacing_min > 0.0) {
            log::warn!("spacing must be positive, using defaults");
            self.spacing_min = defaults.spacing_min;
            self.spacing_max = self.spacing_max.max(defaults.spacing_min);
        }

        let positive = [
            (&mut self.gravity, defaults.gravity, "gravity"),
            (&mut self.jump_height, defaults.jump_height, "jump_height"),
            (&mut self.player_size, defaults.player_size, "player_size"),
            (&mut self.base_speed, defaults.base_speed, "base_speed"),
            (&mut self.speedup_interval, defaults.speedup_interval, "speedup_interval"),
            (&mut self.max_frame_dt, defaults.max_frame_dt, "max_frame_dt"),
            (&mut self.sim_dt, defaults.sim_dt, "sim_dt"),
        ];
        for (value, default, name) in positive {
            if !(*value > 0.0) || !value.is_finite() {
                log::warn!("{name} must be positive, using {default}");
                *value = default;
            }
        }
        if !(self.speedup_factor >= 1.0) {
            log::warn!("speedup_factor below 1.0 would slow the run down, using 1.0");
            self.speedup_factor = 1.0;
        }
        self.support_inset = self.support_inset.clamp(0.0, 0.45);
        self.home_recovery_rate = self.home_recovery_rate.max(0.0);

        self
    }
}
