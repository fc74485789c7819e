//! Player vertical motion
//!
//! Screen coordinates: y grows downward, vertical velocity is positive
//! upward. Each step does `vy -= g * dt; y -= vy * dt`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::mechanics::MechanicsConfig;

/// Coarse pose tag for animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerState {
    #[default]
    Run,
    Jump,
    Fall,
    /// Latched when the run ends
    Hit,
}

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner of the hit box
    pub pos: Vec2,
    /// Vertical velocity, positive upward
    pub vy: f32,
    /// Jumps used since last landing
    pub jump_count: u32,
    /// Side length of the square hit box
    pub size: f32,
    pub state: PlayerState,
}

impl Player {
    /// Standing at `x` on a surface whose top is at screen row `ground_top`
    pub fn standing(x: f32, ground_top: f32, size: f32) -> Self {
        Self {
            pos: Vec2::new(x, ground_top - size),
            vy: 0.0,
            jump_count: 0,
            size,
            state: PlayerState::Run,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(self.size))
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size
    }

    /// Apply gravity and move
    pub fn integrate(&mut self, gravity: f32, dt: f32) {
        self.vy -= gravity * dt;
        self.pos.y -= self.vy * dt;
    }

    /// Put the feet on a surface and reset jumps
    pub fn land(&mut self, surface_top: f32) {
        self.pos.y = surface_top - self.size;
        self.vy = 0.0;
        self.jump_count = 0;
    }

    /// Grant a jump if one is left. Returns whether it was granted.
    pub fn try_jump(&mut self, allowed_jumps: u32, velocity: f32) -> bool {
        if self.state == PlayerState::Hit || self.jump_count >= allowed_jumps {
            return false;
        }
        self.vy = velocity;
        self.jump_count += 1;
        true
    }

    /// Drift back toward the home column after being pushed by a wall
    pub fn recover_home(&mut self, home_x: f32, rate: f32, dt: f32) {
        if self.pos.x < home_x {
            self.pos.x = (self.pos.x + rate * dt).min(home_x);
        }
    }

    /// Derive the pose tag from vertical velocity (a hit stays latched)
    pub fn update_state(&mut self) {
        if self.state == PlayerState::Hit {
            return;
        }
        self.state = if self.vy > 0.0 {
            PlayerState::Jump
        } else if self.vy < 0.0 {
            PlayerState::Fall
        } else {
            PlayerState::Run
        };
    }
}

/// Launch speed whose unobstructed peak is exactly `height` above take-off
#[inline]
pub fn jump_velocity(gravity: f32, height: f32) -> f32 {
    (2.0 * gravity * height).sqrt()
}

/// Jumps available before the next landing.
///
/// One (two with double jump), minus one while the whole footprint hangs
/// over a pit so a double jump cannot be chained across it.
pub fn allowed_jumps(mechanics: MechanicsConfig, fully_over_pit: bool) -> u32 {
    let base = if mechanics.double_jump { 2 } else { 1 };
    base - u32::from(fully_over_pit)
}

#[cfg(test)]
mod tests {
    use super::*;

    const G: f32 = 25.0;

    #[test]
    fn test_jump_peak_matches_target_height() {
        let mut player = Player::standing(1.0, 11.0, 1.0);
        let start_y = player.pos.y;
        assert!(player.try_jump(1, jump_velocity(G, 3.0)));

        let dt = 1.0 / 1000.0;
        let mut peak = start_y;
        for _ in 0..2000 {
            player.integrate(G, dt);
            peak = peak.min(player.pos.y);
        }
        assert!((start_y - peak - 3.0).abs() < 0.05, "peak height {}", start_y - peak);
    }

    #[test]
    fn test_jump_count_limits() {
        let v = jump_velocity(G, 3.0);
        let mut player = Player::standing(1.0, 11.0, 1.0);
        assert!(player.try_jump(1, v));
        assert_eq!(player.jump_count, 1);
        assert_eq!(player.vy, v);

        player.integrate(G, 0.1);
        let vy = player.vy;
        assert!(!player.try_jump(1, v));
        assert_eq!(player.vy, vy);

        assert!(player.try_jump(2, v));
        assert_eq!(player.jump_count, 2);
    }

    #[test]
    fn test_allowed_jumps_table() {
        let single = MechanicsConfig::DISABLED;
        let double = MechanicsConfig {
            double_jump: true,
            ..MechanicsConfig::DISABLED
        };
        assert_eq!(allowed_jumps(single, false), 1);
        assert_eq!(allowed_jumps(single, true), 0);
        assert_eq!(allowed_jumps(double, false), 2);
        assert_eq!(allowed_jumps(double, true), 1);
    }

    #[test]
    fn test_state_follows_velocity_until_hit() {
        let mut player = Player::standing(1.0, 11.0, 1.0);
        player.vy = 3.0;
        player.update_state();
        assert_eq!(player.state, PlayerState::Jump);
        player.vy = -1.0;
        player.update_state();
        assert_eq!(player.state, PlayerState::Fall);

        player.state = PlayerState::Hit;
        player.vy = 0.0;
        player.update_state();
        assert_eq!(player.state, PlayerState::Hit);
        assert!(!player.try_jump(2, 10.0));
    }

    #[test]
    fn test_recover_home_never_overshoots() {
        let mut player = Player::standing(0.95, 11.0, 1.0);
        player.recover_home(1.0, 0.2, 1.0);
        assert_eq!(player.pos.x, 1.0);
        player.recover_home(1.0, 0.2, 1.0);
        assert_eq!(player.pos.x, 1.0);
    }
}
