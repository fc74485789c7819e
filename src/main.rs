//! Arcade Runner entry point
//!
//! Plays a few autopiloted runs headlessly at 60 Hz and prints the leaderboard.
//!
//! Usage: `arcade-runner [settings.json] [seed]`

use arcade_runner::sim::autopilot;
use arcade_runner::sim::{GameEvent, SimulationContext};
use arcade_runner::{HighScores, RunnerSettings, SharedMechanics};

const FRAME_DT: f32 = 1.0 / 60.0;
const RUNS: u32 = 3;
/// Stop a run that the autopilot keeps alive (10 minutes of play)
const MAX_FRAMES: u32 = 60 * 60 * 10;

fn main() {
    env_logger::init();
    log::info!("Arcade Runner (native) starting...");

    let mut args = std::env::args().skip(1);
    let settings = args
        .next()
        .map(RunnerSettings::load)
        .unwrap_or_default();
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5EED);

    // The host would toggle these while a run is live
    let mechanics = SharedMechanics::default();
    mechanics.apply_json(r#"{"doubleJump": true, "bridges": true, "coins": true}"#);

    let mut ctx = SimulationContext::new(settings, seed);
    let mut scores = HighScores::new();

    for run in 1..=RUNS {
        let mut coins = 0u32;
        for _ in 0..MAX_FRAMES {
            if autopilot::should_jump(&ctx) {
                ctx.request_jump();
            }
            let result = ctx.step(&mechanics, FRAME_DT);
            coins += result
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::CoinCollected { .. }))
                .count() as u32;
            result.deliver(&mut scores);
            if result.game_over.is_some() {
                break;
            }
        }

        match ctx.summary() {
            Some(summary) => log::info!(
                "Run {run} (seed {}): score {} distance {:.1} time {:.1}s coins {coins} ({:?})",
                ctx.seed(),
                summary.score,
                summary.distance,
                summary.elapsed,
                summary.cause
            ),
            None => log::info!(
                "Run {run} (seed {}): still running after {:.0}s, score {}",
                ctx.seed(),
                ctx.elapsed(),
                ctx.score()
            ),
        }
        ctx.restart();
    }

    if let (Some(top), Some(longest)) = (scores.top_score(), scores.best_distance()) {
        log::info!("Best score {top}, longest run {longest:.1} units");
    }

    match scores.to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize high scores: {e}"),
    }
}
