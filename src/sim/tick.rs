//! Per-frame simulation step
//!
//! `step(dt)` is called once per rendered frame with the wall-clock delta.
//! The delta is clamped and split into sub-steps short enough that neither
//! the fixed timestep nor the scroll per sub-step is exceeded, then each
//! sub-step runs: difficulty → terrain → obstacles → physics → collisions.

use super::collision::{
    out_of_bounds, resolve_ground_support, resolve_obstacles, resolve_wall_block,
};
use super::spawner::{SpawnContext, Spawned, advance_obstacles, award_passed};
use super::state::{GameEvent, RunPhase, RunSummary, SimulationContext, TerminalCause};
use crate::consts::MAX_SUBSTEPS;
use crate::mechanics::MechanicsSource;

/// What a step produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickResult {
    /// Points scored during this step
    pub score_delta: u64,
    pub events: Vec<GameEvent>,
    /// Set on the step that ended the run; call `restart` to play again
    pub game_over: Option<RunSummary>,
    /// Sub-steps the delta was split into
    pub substeps: u32,
}

impl TickResult {
    /// Forward the score and the terminal summary to a scoring collaborator
    pub fn deliver<S: ScoreSink + ?Sized>(&self, sink: &mut S) {
        if self.score_delta > 0 {
            sink.score_increment(self.score_delta);
        }
        if let Some(summary) = &self.game_over {
            sink.run_finished(summary);
        }
    }
}

/// Receives score increments and the end of a run
pub trait ScoreSink {
    fn score_increment(&mut self, delta: u64);
    fn run_finished(&mut self, summary: &RunSummary);
}

impl SimulationContext {
    /// Advance the run by `dt` seconds of wall-clock time
    pub fn step<M: MechanicsSource + ?Sized>(&mut self, mechanics: &M, dt: f32) -> TickResult {
        step(self, mechanics, dt)
    }
}

/// Advance the run by `dt` seconds of wall-clock time.
///
/// Mechanics are read once here and held for the whole step.
pub fn step<M: MechanicsSource + ?Sized>(
    ctx: &mut SimulationContext,
    mechanics: &M,
    dt: f32,
) -> TickResult {
    let mut result = TickResult::default();
    // Jumps requested since the last step come first
    let mut events = std::mem::take(&mut ctx.pending_events);

    if ctx.phase == RunPhase::Running {
        ctx.mechanics = mechanics.read();

        let dt = if dt.is_finite() {
            dt.clamp(0.0, ctx.settings.max_frame_dt)
        } else {
            0.0
        };
        let substeps = substep_count(ctx, dt);
        let h = dt / substeps as f32;

        for _ in 0..substeps {
            result.substeps += 1;
            substep(ctx, h, &mut result);
            if ctx.phase == RunPhase::GameOver {
                break;
            }
        }
    }

    events.append(&mut result.events);
    events.append(&mut ctx.pending_events);
    result.game_over = events.iter().find_map(|e| match e {
        GameEvent::GameOver(summary) => Some(*summary),
        _ => None,
    });
    result.events = events;
    result
}

/// Enough sub-steps that each is at most `sim_dt` long and scrolls less
/// than half the foot inset, so walls are met by the leading edge before a
/// foot sample can cross into them.
///
/// The count is capped at `MAX_SUBSTEPS`. With the default inset the cap
/// binds past 32 units/s on a full `max_frame_dt` frame, and a sub-step
/// then scrolls `speed * dt / MAX_SUBSTEPS`. Wall blocking still clamps
/// the leading edge but loses the half-inset margin.
fn substep_count(ctx: &SimulationContext, dt: f32) -> u32 {
    let settings = &ctx.settings;
    let max_scroll = (settings.support_inset * settings.player_size * 0.5).max(0.01);
    let by_time = (dt / settings.sim_dt).ceil();
    let by_scroll = (ctx.scroll_speed() * dt / max_scroll).ceil();
    (by_time.max(by_scroll) as u32).clamp(1, MAX_SUBSTEPS)
}

fn substep(ctx: &mut SimulationContext, dt: f32, result: &mut TickResult) {
    let mut score = 0u64;

    // Difficulty
    let speedups = ctx.difficulty.update(dt);
    if speedups > 0 {
        result.events.push(GameEvent::SpeedIncreased {
            multiplier: ctx.difficulty.multiplier(),
        });
    }
    let scroll_speed = ctx.scroll_speed();
    let distance = ctx.difficulty.scroll_distance(ctx.settings.base_speed, dt);
    ctx.distance += distance;
    ctx.elapsed += dt;

    // Terrain
    let columns = ctx
        .terrain
        .advance(&mut ctx.profile, distance, ctx.mechanics.bridges);
    score += u64::from(columns) * ctx.settings.column_score;

    // Obstacles
    advance_obstacles(&mut ctx.obstacles, distance, dt, ctx.settings.despawn_x);
    for id in award_passed(&mut ctx.obstacles, ctx.settings.player_home_x) {
        let bonus = ctx.settings.pass_bonus;
        score += bonus;
        result.events.push(GameEvent::ObstaclePassed { id, bonus });
    }

    let trailing = ctx.trailing_height();
    let spawn_ctx = SpawnContext {
        settings: &ctx.settings,
        mechanics: ctx.mechanics,
        trailing,
        scroll_speed,
    };
    for spawned in ctx.spawner.maybe_spawn(distance, &spawn_ctx, &mut ctx.rng) {
        match spawned {
            Spawned::Obstacle(obstacle) => ctx.obstacles.push(obstacle),
            Spawned::Directive(directive) => ctx.terrain.apply(directive, trailing),
        }
    }

    // Physics
    let settings = &ctx.settings;
    ctx.player.integrate(settings.gravity, dt);
    ctx.player
        .recover_home(settings.player_home_x, settings.home_recovery_rate, dt);

    // Collisions
    let rows = settings.visible_rows;
    let inset = settings.support_inset;
    resolve_ground_support(&mut ctx.player, &ctx.profile, rows, inset);
    if resolve_wall_block(&mut ctx.player, &ctx.profile, rows) {
        resolve_ground_support(&mut ctx.player, &ctx.profile, rows, inset);
    }

    let contact = resolve_obstacles(&ctx.player, &mut ctx.obstacles, settings.coin_value);
    for (id, value) in contact.coins {
        score += value;
        result.events.push(GameEvent::CoinCollected { id, value });
    }

    ctx.add_score(score);
    result.score_delta += score;

    if let Some(obstacle_id) = contact.hazard {
        ctx.end_run(TerminalCause::Collision { obstacle_id });
    }
    if out_of_bounds(&ctx.player, ctx.settings.visible_cols, rows) {
        ctx.end_run(TerminalCause::OutOfBounds);
    }

    ctx.player.update_state();
}
