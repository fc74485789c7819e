//! Run state and core simulation types
//!
//! Everything a run mutates lives in one [`SimulationContext`] owned by the
//! caller. Several contexts can run side by side (tests, replays) since
//! nothing is global.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{fully_over_pit, support_top};
use super::difficulty::DifficultyController;
use super::ground::{GroundColumn, GroundProfile};
use super::obstacle::Obstacle;
use super::physics::{Player, PlayerState, allowed_jumps, jump_velocity};
use super::spawner::ObstacleSpawner;
use super::terrain::TerrainGenerator;
use crate::mechanics::MechanicsConfig;
use crate::settings::RunnerSettings;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Running,
    /// Run ended; `step` is a no-op until `restart`
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalCause {
    /// Touched a hazard
    Collision { obstacle_id: u32 },
    /// Pushed off the left edge, or fell out of the bottom
    OutOfBounds,
}

/// Final numbers of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    /// Terrain scrolled (arcade units)
    pub distance: f32,
    /// Seconds of play
    pub elapsed: f32,
    pub cause: TerminalCause,
}

/// Things that happened during a step, for audio/render collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped { jump_count: u32 },
    CoinCollected { id: u32, value: u64 },
    ObstaclePassed { id: u32, bonus: u64 },
    SpeedIncreased { multiplier: f32 },
    GameOver(RunSummary),
}

/// Player pose for rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerPose {
    pub pos: Vec2,
    pub size: f32,
    pub state: PlayerState,
}

/// Read-only view of a run, serializable for an external renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    /// Signed column heights, leftmost first
    pub ground: Vec<i32>,
    /// Fractional scroll of the leftmost column
    pub ground_offset: f32,
    pub obstacles: Vec<Obstacle>,
    pub player: PlayerPose,
    pub score: u64,
    pub speed_multiplier: f32,
    pub phase: RunPhase,
}

/// All mutable state of one run
#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub(crate) settings: RunnerSettings,
    /// Seed this run was started with
    pub(crate) seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) profile: GroundProfile,
    pub(crate) terrain: TerrainGenerator,
    pub(crate) spawner: ObstacleSpawner,
    /// Live obstacles, in spawn (id) order
    pub(crate) obstacles: Vec<Obstacle>,
    pub(crate) player: Player,
    pub(crate) difficulty: DifficultyController,
    /// Mechanics snapshot taken at the top of the latest step
    pub(crate) mechanics: MechanicsConfig,
    pub(crate) phase: RunPhase,
    pub(crate) score: u64,
    pub(crate) distance: f32,
    pub(crate) elapsed: f32,
    /// Events raised between steps (jumps), delivered with the next step
    pub(crate) pending_events: Vec<GameEvent>,
    pub(crate) summary: Option<RunSummary>,
}

impl SimulationContext {
    /// Start a run with the given tuning and seed
    pub fn new(settings: RunnerSettings, seed: u64) -> Self {
        let settings = settings.sanitized();
        let mut rng = Pcg32::seed_from_u64(seed);

        let profile = GroundProfile::flat(settings.window_len(), settings.initial_ground);
        let home_top = profile
            .column_at(settings.player_home_x)
            .surface_top(settings.visible_rows)
            .unwrap_or(settings.visible_rows as f32 - f32::from(settings.initial_ground));
        let player = Player::standing(settings.player_home_x, home_top, settings.player_size);

        let spawner = ObstacleSpawner::new(&settings, &mut rng);
        let terrain = TerrainGenerator::new(settings.min_ground, settings.max_ground);
        let difficulty = DifficultyController::new(settings.speedup_interval, settings.speedup_factor);

        log::info!("Run started (seed {seed})");

        Self {
            settings,
            seed,
            rng,
            profile,
            terrain,
            spawner,
            obstacles: Vec::new(),
            player,
            difficulty,
            mechanics: MechanicsConfig::DISABLED,
            phase: RunPhase::Running,
            score: 0,
            distance: 0.0,
            elapsed: 0.0,
            pending_events: Vec::new(),
            summary: None,
        }
    }

    /// Throw the run away and start a fresh one with the same tuning.
    ///
    /// The next seed is drawn from this run's RNG, so a sequence of runs is
    /// reproducible from the first seed.
    pub fn restart(&mut self) {
        let seed = self.rng.random::<u64>();
        let mechanics = self.mechanics;
        *self = Self::new(self.settings.clone(), seed);
        self.mechanics = mechanics;
    }

    /// Ask for a jump. No-op (returns false) when no jump is allowed.
    pub fn request_jump(&mut self) -> bool {
        if self.phase != RunPhase::Running {
            return false;
        }
        let allowed = allowed_jumps(self.mechanics, fully_over_pit(&self.player, &self.profile));
        let velocity = jump_velocity(self.settings.gravity, self.settings.jump_height);
        if !self.player.try_jump(allowed, velocity) {
            return false;
        }
        log::debug!("Jump triggered. Jump count: {}", self.player.jump_count);
        self.player.update_state();
        self.pending_events.push(GameEvent::Jumped {
            jump_count: self.player.jump_count,
        });
        true
    }

    /// End the run. Only the first call has any effect; returns whether
    /// this call was the one that ended it.
    pub fn end_run(&mut self, cause: TerminalCause) -> bool {
        if self.phase == RunPhase::GameOver {
            return false;
        }
        self.phase = RunPhase::GameOver;
        self.player.state = PlayerState::Hit;
        let summary = RunSummary {
            score: self.score,
            distance: self.distance,
            elapsed: self.elapsed,
            cause,
        };
        log::info!(
            "Game over: score {} after {:.1} units ({:?})",
            summary.score,
            summary.distance,
            cause
        );
        self.summary = Some(summary);
        self.pending_events.push(GameEvent::GameOver(summary));
        true
    }

    pub(crate) fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Surface height the spawner measures new obstacles from
    pub(crate) fn trailing_height(&self) -> u8 {
        self.profile
            .trailing()
            .and_then(GroundColumn::surface_height)
            .or(self.terrain.state.resume_ground)
            .unwrap_or(self.settings.initial_ground)
    }

    // === Render query surface ===

    pub fn settings(&self) -> &RunnerSettings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn ground(&self) -> &GroundProfile {
        &self.profile
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn pose(&self) -> PlayerPose {
        PlayerPose {
            pos: self.player.pos,
            size: self.player.size,
            state: self.player.state,
        }
    }

    pub fn mechanics(&self) -> MechanicsConfig {
        self.mechanics
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == RunPhase::GameOver
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.difficulty.multiplier()
    }

    /// Current terrain scroll speed (units/s)
    pub fn scroll_speed(&self) -> f32 {
        self.difficulty.speed(self.settings.base_speed)
    }

    pub fn summary(&self) -> Option<RunSummary> {
        self.summary
    }

    /// Whether the player is resting on ground right now
    pub fn is_grounded(&self) -> bool {
        self.player.vy <= 0.0
            && support_top(
                &self.player,
                &self.profile,
                self.settings.visible_rows,
                self.settings.support_inset,
            )
            .is_some()
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            ground: self.profile.heights(),
            ground_offset: self.profile.offset(),
            obstacles: self.obstacles.clone(),
            player: self.pose(),
            score: self.score,
            speed_multiplier: self.speed_multiplier(),
            phase: self.phase,
        }
    }
}
