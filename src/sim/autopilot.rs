//! Idle/demo mode: a simple heuristic that plays the runner
//!
//! Looks a short time ahead of the leading edge and jumps for pits, rising
//! steps and hazards that would hit a player running along the ground.

use super::ground::GroundColumn;
use super::state::SimulationContext;

/// How far ahead to look, in seconds of scroll
const LOOKAHEAD_SECS: f32 = 0.2;
/// Terrain probe spacing (arcade units)
const PROBE_STEP: f32 = 0.25;

/// Whether the demo player should jump now
pub fn should_jump(ctx: &SimulationContext) -> bool {
    if ctx.is_game_over() || !ctx.is_grounded() {
        return false;
    }

    let player = ctx.player();
    let rows = ctx.settings().visible_rows;
    let front = player.right();
    let reach = front + ctx.scroll_speed() * LOOKAHEAD_SECS + PROBE_STEP;
    let standing_top = player.bottom();

    // Terrain: an open pit or a step up
    let mut x = front;
    while x <= reach {
        match ctx.ground().column_at(x) {
            GroundColumn::Pit => return true,
            column => {
                if column.surface_top(rows).is_some_and(|top| top < standing_top) {
                    return true;
                }
            }
        }
        x += PROBE_STEP;
    }

    // Hazards that overlap the player's current rows
    ctx.obstacles().iter().any(|o| {
        o.kind.is_hazard()
            && o.pos.x < reach
            && o.right() > player.pos.x
            && o.pos.y < player.bottom()
            && o.pos.y + o.size.y > player.pos.y
    })
}
