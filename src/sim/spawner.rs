//! Obstacle spawning
//!
//! Every `spacing` units of scroll one thing is spawned, drawn uniformly
//! from the enabled kinds. Pits and elevation changes come out as
//! [`GenerationDirective`]s for the terrain generator; everything else
//! becomes a live [`Obstacle`] just off the right edge of the screen.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::obstacle::{BirdFlight, FlightPhase, Obstacle, ObstacleKind};
use super::terrain::GenerationDirective;
use crate::mechanics::MechanicsConfig;
use crate::settings::RunnerSettings;

/// Everything the spawner can pick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnKind {
    Pit,
    GroundObstacle,
    AirObstacle,
    Bird,
    Elevation,
    Coin,
}

impl SpawnKind {
    /// Always in the pool
    pub const BASE: [SpawnKind; 5] = [
        SpawnKind::Pit,
        SpawnKind::GroundObstacle,
        SpawnKind::AirObstacle,
        SpawnKind::Bird,
        SpawnKind::Elevation,
    ];

    /// Pick uniformly among the kinds the current mechanics allow
    pub fn choose<R: Rng + ?Sized>(mechanics: MechanicsConfig, rng: &mut R) -> SpawnKind {
        let pool = Self::BASE.len() + usize::from(mechanics.coins);
        let roll = rng.random_range(0..pool);
        Self::BASE.get(roll).copied().unwrap_or(SpawnKind::Coin)
    }
}

/// Result of one spawn
#[derive(Debug, Clone, PartialEq)]
pub enum Spawned {
    Obstacle(Obstacle),
    Directive(GenerationDirective),
}

/// Terrain and speed facts a spawn depends on
#[derive(Debug, Clone, Copy)]
pub struct SpawnContext<'a> {
    pub settings: &'a RunnerSettings,
    pub mechanics: MechanicsConfig,
    /// Surface height of the trailing (rightmost) terrain
    pub trailing: u8,
    /// Current terrain scroll speed (units/s)
    pub scroll_speed: f32,
}

/// Elevation step for the trailing height, or a short pit when the step
/// would leave `[min, max]`.
///
/// The pit fallback keeps an out-of-range roll from being wasted; it is
/// long-standing behavior and kept as-is.
pub fn elevation_directive(trailing: u8, change: i8, settings: &RunnerSettings) -> GenerationDirective {
    let allowed = match change.signum() {
        1 => trailing < settings.max_ground,
        -1 => trailing > settings.min_ground,
        _ => false,
    };
    if allowed {
        GenerationDirective::Elevation { change: change.signum() }
    } else {
        log::debug!("Elevation {change:+} not allowed at height {trailing}; treating as pit");
        GenerationDirective::Pit {
            run: settings.blocked_elevation_pit_run,
        }
    }
}

/// Distance-driven spawner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleSpawner {
    /// Scroll distance since the last spawn
    distance: f32,
    /// Spacing until the next spawn
    next_distance: f32,
    next_id: u32,
}

impl ObstacleSpawner {
    pub fn new<R: Rng + ?Sized>(settings: &RunnerSettings, rng: &mut R) -> Self {
        Self {
            distance: 0.0,
            next_distance: Self::draw_spacing(settings, rng),
            next_id: 1,
        }
    }

    fn draw_spacing<R: Rng + ?Sized>(settings: &RunnerSettings, rng: &mut R) -> f32 {
        if settings.spacing_max > settings.spacing_min {
            rng.random_range(settings.spacing_min..settings.spacing_max)
        } else {
            settings.spacing_min
        }
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Accumulate scroll distance and spawn once per spacing crossed
    pub fn maybe_spawn<R: Rng + ?Sized>(
        &mut self,
        distance: f32,
        ctx: &SpawnContext<'_>,
        rng: &mut R,
    ) -> Vec<Spawned> {
        self.distance += distance.max(0.0);
        let mut spawned = Vec::new();
        while self.distance >= self.next_distance {
            self.distance -= self.next_distance;
            self.next_distance = Self::draw_spacing(ctx.settings, rng);
            let kind = SpawnKind::choose(ctx.mechanics, rng);
            spawned.push(self.spawn(kind, ctx, rng));
        }
        spawned
    }

    /// Build one spawn of the given kind
    pub fn spawn<R: Rng + ?Sized>(&mut self, kind: SpawnKind, ctx: &SpawnContext<'_>, rng: &mut R) -> Spawned {
        let settings = ctx.settings;
        let surface = settings.visible_rows as f32 - f32::from(ctx.trailing);
        let spawn_x = settings.visible_cols as f32 + rng.random_range(0.0..1.0);
        let small = Vec2::splat(0.5);

        let (kind, pos, size) = match kind {
            SpawnKind::Pit => {
                return Spawned::Directive(GenerationDirective::Pit { run: settings.pit_run });
            }
            SpawnKind::Elevation => {
                let change = if rng.random_bool(0.5) { 1 } else { -1 };
                return Spawned::Directive(elevation_directive(ctx.trailing, change, settings));
            }
            SpawnKind::GroundObstacle => (ObstacleKind::Ground, Vec2::new(spawn_x, surface - 0.5), small),
            SpawnKind::AirObstacle => (ObstacleKind::Air, Vec2::new(spawn_x, surface - 1.1 - 0.5), small),
            SpawnKind::Bird => {
                let dest_y = if rng.random_bool(0.5) { surface - 0.6 } else { surface - 1.6 };
                let dest = Vec2::new(settings.bird_dest_x, dest_y);
                // Start on the 45° line through the destination
                let spawn = Vec2::new(spawn_x, dest.y - (spawn_x - dest.x));
                let flight = BirdFlight {
                    spawn,
                    dest,
                    vel: Vec2::new(-settings.bird_speed + ctx.scroll_speed, settings.bird_speed),
                    phase: FlightPhase::Swooping,
                    cruise_speed: settings.bird_speed,
                };
                (ObstacleKind::Bird(flight), spawn, small)
            }
            SpawnKind::Coin => {
                let lift = if rng.random_bool(0.5) { 1.0 } else { 2.0 };
                (ObstacleKind::Coin, Vec2::new(spawn_x, surface - lift), Vec2::ONE)
            }
        };

        let obstacle = Obstacle::new(self.allocate_id(), kind, pos, size);
        log::debug!("Spawned {} #{} at {:?}", kind.name(), obstacle.id, obstacle.pos);
        Spawned::Obstacle(obstacle)
    }
}

/// Scroll every obstacle and drop the ones that are gone: collected coins
/// and anything whose right edge is left of `despawn_x`.
pub fn advance_obstacles(obstacles: &mut Vec<Obstacle>, scroll: f32, dt: f32, despawn_x: f32) {
    obstacles.retain(|o| !o.collected);
    for obstacle in obstacles.iter_mut() {
        obstacle.advance(scroll, dt);
    }
    obstacles.retain(|o| o.right() > despawn_x);
}

/// Mark hazards that have fully passed `home_x`; returns their ids
pub fn award_passed(obstacles: &mut [Obstacle], home_x: f32) -> Vec<u32> {
    obstacles
        .iter_mut()
        .filter(|o| o.kind.is_hazard() && !o.awarded && o.right() < home_x)
        .map(|o| {
            o.awarded = true;
            o.id
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ctx(settings: &RunnerSettings, trailing: u8) -> SpawnContext<'_> {
        SpawnContext {
            settings,
            mechanics: MechanicsConfig::DISABLED,
            trailing,
            scroll_speed: 3.0,
        }
    }

    #[test]
    fn test_blocked_elevation_becomes_short_pit() {
        let settings = RunnerSettings::default();
        assert_eq!(elevation_directive(10, 1, &settings), GenerationDirective::Pit { run: 2 });
        assert_eq!(elevation_directive(2, -1, &settings), GenerationDirective::Pit { run: 2 });
        assert_eq!(
            elevation_directive(10, -1, &settings),
            GenerationDirective::Elevation { change: -1 }
        );
        assert_eq!(
            elevation_directive(5, 1, &settings),
            GenerationDirective::Elevation { change: 1 }
        );
    }

    #[test]
    fn test_spawn_positions_follow_trailing_height() {
        let settings = RunnerSettings::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut spawner = ObstacleSpawner::new(&settings, &mut rng);
        let ctx = ctx(&settings, 5);

        let Spawned::Obstacle(ground) = spawner.spawn(SpawnKind::GroundObstacle, &ctx, &mut rng) else {
            panic!("expected an obstacle");
        };
        assert_eq!(ground.pos.y, 10.5);
        assert!(ground.pos.x >= 9.0 && ground.pos.x < 10.0);

        let Spawned::Obstacle(air) = spawner.spawn(SpawnKind::AirObstacle, &ctx, &mut rng) else {
            panic!("expected an obstacle");
        };
        assert!((air.pos.y - 9.4).abs() < 1e-6);
        assert_ne!(air.id, ground.id);

        let Spawned::Obstacle(coin) = spawner.spawn(SpawnKind::Coin, &ctx, &mut rng) else {
            panic!("expected an obstacle");
        };
        assert!(coin.pos.y == 10.0 || coin.pos.y == 9.0);
        assert_eq!(coin.size, Vec2::ONE);

        assert_eq!(
            spawner.spawn(SpawnKind::Pit, &ctx, &mut rng),
            Spawned::Directive(GenerationDirective::Pit { run: 3 })
        );
    }

    #[test]
    fn test_bird_starts_on_diagonal_through_destination() {
        let settings = RunnerSettings::default();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut spawner = ObstacleSpawner::new(&settings, &mut rng);
        let Spawned::Obstacle(bird) = spawner.spawn(SpawnKind::Bird, &ctx(&settings, 5), &mut rng) else {
            panic!("expected an obstacle");
        };
        let ObstacleKind::Bird(flight) = bird.kind else {
            panic!("expected a bird");
        };
        assert_eq!(flight.phase, FlightPhase::Swooping);
        assert_eq!(flight.dest.x, 5.0);
        assert!((flight.dest.y - flight.spawn.y - (flight.spawn.x - flight.dest.x)).abs() < 1e-5);
        assert_eq!(flight.vel, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_spawns_once_per_spacing() {
        let settings = RunnerSettings {
            spacing_min: 5.0,
            spacing_max: 5.0,
            ..RunnerSettings::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let mut spawner = ObstacleSpawner::new(&settings, &mut rng);
        let ctx = ctx(&settings, 5);

        assert!(spawner.maybe_spawn(4.9, &ctx, &mut rng).is_empty());
        assert_eq!(spawner.maybe_spawn(0.2, &ctx, &mut rng).len(), 1);
        assert_eq!(spawner.maybe_spawn(10.0, &ctx, &mut rng).len(), 2);
    }

    #[test]
    fn test_coins_only_with_mechanic() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..500 {
            assert_ne!(SpawnKind::choose(MechanicsConfig::DISABLED, &mut rng), SpawnKind::Coin);
        }
        let coins = MechanicsConfig {
            coins: true,
            ..MechanicsConfig::DISABLED
        };
        assert!((0..500).any(|_| SpawnKind::choose(coins, &mut rng) == SpawnKind::Coin));
    }

    #[test]
    fn test_collected_coin_removed_on_next_pass() {
        let mut obstacles = vec![
            Obstacle::new(1, ObstacleKind::Coin, Vec2::new(1.0, 10.0), Vec2::ONE),
            Obstacle::new(2, ObstacleKind::Ground, Vec2::new(-2.4, 10.5), Vec2::splat(0.5)),
            Obstacle::new(3, ObstacleKind::Ground, Vec2::new(4.0, 10.5), Vec2::splat(0.5)),
        ];
        obstacles[0].collected = true;

        advance_obstacles(&mut obstacles, 0.2, 1.0 / 60.0, -2.0);
        let ids: Vec<u32> = obstacles.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_pass_bonus_paid_once() {
        let mut obstacles = vec![
            Obstacle::new(1, ObstacleKind::Ground, Vec2::new(0.2, 10.5), Vec2::splat(0.5)),
            Obstacle::new(2, ObstacleKind::Coin, Vec2::new(-0.5, 10.0), Vec2::ONE),
            Obstacle::new(3, ObstacleKind::Air, Vec2::new(3.0, 9.4), Vec2::splat(0.5)),
        ];
        assert_eq!(award_passed(&mut obstacles, 1.0), vec![1]);
        assert!(award_passed(&mut obstacles, 1.0).is_empty());
    }
}
