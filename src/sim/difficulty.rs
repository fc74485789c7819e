//! Scroll speed ramp

use serde::{Deserialize, Serialize};

/// Multiplies the scroll speed by a fixed factor every interval of play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyController {
    multiplier: f32,
    timer: f32,
    interval: f32,
    factor: f32,
}

impl DifficultyController {
    pub fn new(interval: f32, factor: f32) -> Self {
        Self {
            multiplier: 1.0,
            timer: 0.0,
            interval,
            factor: factor.max(1.0),
        }
    }

    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    /// Advance play time. Returns the number of speed-ups that fired.
    pub fn update(&mut self, dt: f32) -> u32 {
        self.timer += dt.max(0.0);
        let mut fired = 0;
        while self.interval > 0.0 && self.timer >= self.interval {
            self.timer -= self.interval;
            self.multiplier *= self.factor;
            fired += 1;
            log::debug!("Speed increased; multiplier = {:.2}", self.multiplier);
        }
        fired
    }

    /// Scroll speed at the current multiplier
    pub fn speed(&self, base_speed: f32) -> f32 {
        base_speed * self.multiplier
    }

    /// Distance scrolled over `dt` at the current multiplier
    pub fn scroll_distance(&self, base_speed: f32, dt: f32) -> f32 {
        self.speed(base_speed) * dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_multiplier_steps_each_interval() {
        let mut difficulty = DifficultyController::new(4.0, 1.1);
        assert_eq!(difficulty.update(3.9), 0);
        assert_eq!(difficulty.multiplier(), 1.0);
        assert_eq!(difficulty.update(0.2), 1);
        assert!((difficulty.multiplier() - 1.1).abs() < 1e-6);
        assert_eq!(difficulty.update(8.0), 2);
        assert!((difficulty.multiplier() - 1.331).abs() < 1e-4);
        assert!((difficulty.scroll_distance(3.0, 0.5) - 3.0 * 1.331 * 0.5).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_multiplier_never_decreases(dts in proptest::collection::vec(-1.0f32..2.0, 1..100)) {
            let mut difficulty = DifficultyController::new(4.0, 1.1);
            let mut last = difficulty.multiplier();
            for dt in dts {
                difficulty.update(dt);
                prop_assert!(difficulty.multiplier() >= last);
                last = difficulty.multiplier();
            }
        }
    }
}
