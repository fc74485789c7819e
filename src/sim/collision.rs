//! Collision detection and response against the scrolling terrain
//!
//! The tricky part of the runner: the ground is a list of columns that
//! slides under a player who is wider than the gap between samples, so
//! support is read at two inset points under the feet and walls are read
//! at the leading edge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ground::{BRIDGE_DECK_THICKNESS, GroundColumn, GroundProfile};
use super::obstacle::{Obstacle, ObstacleKind};
use super::physics::Player;

/// Axis-aligned box (top-left corner + size, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap; boxes that only touch do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

/// Terrain read at one point under the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundSample {
    pub x: f32,
    pub column: GroundColumn,
    /// Screen row of the column's surface
    pub top: Option<f32>,
}

impl GroundSample {
    fn read(profile: &GroundProfile, x: f32, rows: u32) -> Self {
        let column = profile.column_at(x);
        Self {
            x,
            column,
            top: column.surface_top(rows),
        }
    }

    /// Surface this sample holds a body up at, given the body's bottom.
    ///
    /// Solid ground catches anything at or below its surface. A bridge deck
    /// only catches feet that are within the deck itself.
    pub fn supporting_top(&self, bottom: f32) -> Option<f32> {
        let top = self.top?;
        if bottom < top {
            return None;
        }
        match self.column {
            GroundColumn::Solid(_) => Some(top),
            GroundColumn::Bridge { .. } if bottom <= top + BRIDGE_DECK_THICKNESS => Some(top),
            _ => None,
        }
    }
}

/// Read the ground at the two inset points under the player's feet
pub fn support_samples(player: &Player, profile: &GroundProfile, rows: u32, inset: f32) -> [GroundSample; 2] {
    let inset = player.size * inset;
    // Nudge the right sample inside the box so an exact boundary reads the
    // column the player actually covers.
    let left = player.pos.x + inset;
    let right = player.right() - inset - 0.001;
    [
        GroundSample::read(profile, left, rows),
        GroundSample::read(profile, right, rows),
    ]
}

/// The higher (smaller screen y) of the surfaces holding the player up
pub fn support_top(player: &Player, profile: &GroundProfile, rows: u32, inset: f32) -> Option<f32> {
    let bottom = player.bottom();
    support_samples(player, profile, rows, inset)
        .iter()
        .filter_map(|s| s.supporting_top(bottom))
        .reduce(f32::min)
}

/// Snap the player onto the ground if either foot sample is at or below a
/// surface. Returns true if the player is supported.
pub fn resolve_ground_support(player: &mut Player, profile: &GroundProfile, rows: u32, inset: f32) -> bool {
    match support_top(player, profile, rows, inset) {
        Some(top) => {
            player.land(top);
            true
        }
        None => false,
    }
}

/// Push the player back out of a column it is running into from the side.
///
/// Probes the leading edge at mid-height; if that column has ground (or a
/// bridge) and the probe is at or below its surface, the player's right edge
/// is clamped to the column's left boundary. Returns true if blocked.
pub fn resolve_wall_block(player: &mut Player, profile: &GroundProfile, rows: u32) -> bool {
    let probe = Vec2::new(player.right(), player.pos.y + player.size * 0.5);
    let Some(index) = profile.index_at(probe.x) else {
        return false;
    };
    let Some(top) = profile.get(index).and_then(|c| c.surface_top(rows)) else {
        return false;
    };
    if probe.y < top {
        return false;
    }
    let boundary = profile.column_left(index);
    if player.right() > boundary {
        player.pos.x = boundary - player.size;
        return true;
    }
    false
}

/// True when every column under the player's full width is an open pit
pub fn fully_over_pit(player: &Player, profile: &GroundProfile) -> bool {
    let first = (profile.offset() + player.pos.x).floor() as i64;
    let last = (profile.offset() + player.right() - 0.001).floor() as i64;
    (first..=last).all(|i| {
        usize::try_from(i)
            .ok()
            .and_then(|i| profile.get(i))
            .is_none_or(GroundColumn::is_pit)
    })
}

/// What the player touched this step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObstacleContact {
    /// Coins picked up (id, value)
    pub coins: Vec<(u32, u64)>,
    /// First hazard touched, if any
    pub hazard: Option<u32>,
}

/// Test the player against every live obstacle.
///
/// Coins are flagged collected (and never counted twice); the first hazard
/// found stops the scan.
pub fn resolve_obstacles(player: &Player, obstacles: &mut [Obstacle], coin_value: u64) -> ObstacleContact {
    let player_box = player.aabb();
    let mut contact = ObstacleContact::default();

    for obstacle in obstacles.iter_mut() {
        if obstacle.collected || !player_box.overlaps(&obstacle.aabb()) {
            continue;
        }
        match obstacle.kind {
            ObstacleKind::Coin => {
                obstacle.collected = true;
                contact.coins.push((obstacle.id, coin_value));
            }
            _ => {
                contact.hazard = Some(obstacle.id);
                break;
            }
        }
    }

    contact
}

/// True once the player touches the side walls or falls to the bottom edge.
///
/// The top of the play field is open: a high double jump may leave the
/// screen briefly and come back down.
pub fn out_of_bounds(player: &Player, cols: usize, rows: u32) -> bool {
    player.pos.x <= 0.0 || player.right() >= cols as f32 || player.bottom() >= rows as f32
}
