//! Terrain generation
//!
//! Decides what each newly revealed column looks like as the ground window
//! scrolls. Pits, bridges and elevation changes are queued as directives and
//! then played out one column at a time.

use serde::{Deserialize, Serialize};

use super::ground::{GroundColumn, GroundProfile};

/// Requests that shape upcoming terrain instead of spawning an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationDirective {
    /// Open a run of `run` columns: `run - 1` pit (or bridge) columns, then
    /// the current level again
    Pit { run: u32 },
    /// Step the next column up (+1) or down (-1)
    Elevation { change: i8 },
}

/// Generator bookkeeping carried between columns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationState {
    /// -1, 0 or +1, applied to the next regular column
    pub pending_elevation_change: i8,
    /// Columns left in the run, the resume column included
    pub pending_pit_columns: u32,
    /// Level to restore once the pit run is exhausted.
    /// Some while a pit or bridge sequence is in progress.
    pub resume_ground: Option<u8>,
}

impl GenerationState {
    /// True while a pit/bridge run is being played out
    pub fn pit_sequence_active(&self) -> bool {
        self.pending_pit_columns > 0 || self.resume_ground.is_some()
    }
}

/// Column-by-column terrain generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainGenerator {
    pub state: GenerationState,
    min_ground: u8,
    max_ground: u8,
}

impl TerrainGenerator {
    pub fn new(min_ground: u8, max_ground: u8) -> Self {
        Self {
            state: GenerationState::default(),
            min_ground,
            max_ground,
        }
    }

    /// Queue a directive. `trailing` is the current trailing surface height,
    /// remembered as the resume level when a pit sequence starts.
    ///
    /// Elevation changes are not range-checked here; the next column is
    /// clamped instead.
    pub fn apply(&mut self, directive: GenerationDirective, trailing: u8) {
        match directive {
            GenerationDirective::Pit { run } => {
                if run == 0 {
                    return;
                }
                if self.state.resume_ground.is_none() {
                    self.state.resume_ground = Some(trailing);
                    log::debug!("Pit requested, resume ground = {trailing}");
                }
                self.state.pending_pit_columns = run;
            }
            GenerationDirective::Elevation { change } => {
                self.state.pending_elevation_change = change.signum();
                log::debug!("Elevation change {change:+} queued");
            }
        }
    }

    /// Scroll the window by `distance`, generating one column per whole
    /// column crossed. Returns the number of columns generated.
    pub fn advance(&mut self, profile: &mut GroundProfile, distance: f32, bridges: bool) -> u32 {
        let crossed = profile.scroll(distance);
        for _ in 0..crossed {
            let column = self.next_column(profile.trailing(), bridges);
            profile.shift_in(column);
        }
        crossed
    }

    /// Decide the column that follows `last`
    pub fn next_column(&mut self, last: Option<GroundColumn>, bridges: bool) -> GroundColumn {
        let state = &mut self.state;

        // The last column of a run is the resume column itself
        if state.pending_pit_columns > 0 {
            state.pending_pit_columns -= 1;
            return match (state.pending_pit_columns, state.resume_ground, bridges) {
                (0, Some(resume), _) => {
                    state.resume_ground = None;
                    log::debug!("Resuming ground at {resume}");
                    GroundColumn::Solid(resume)
                }
                (_, Some(resume), true) => GroundColumn::Bridge { resume },
                _ => GroundColumn::Pit,
            };
        }

        let base = last
            .and_then(GroundColumn::surface_height)
            .unwrap_or(self.min_ground);

        if state.pending_elevation_change != 0 {
            let raised = i16::from(base) + i16::from(state.pending_elevation_change);
            let height = raised.clamp(i16::from(self.min_ground), i16::from(self.max_ground)) as u8;
            state.pending_elevation_change = 0;
            return GroundColumn::Solid(height);
        }

        GroundColumn::Solid(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn advance_columns(
        generator: &mut TerrainGenerator,
        profile: &mut GroundProfile,
        n: u32,
        bridges: bool,
    ) {
        for _ in 0..n {
            assert_eq!(generator.advance(profile, 1.0, bridges), 1);
        }
    }

    fn tail(profile: &GroundProfile, n: usize) -> Vec<i32> {
        let heights = profile.heights();
        heights[heights.len() - n..].to_vec()
    }

    #[test]
    fn test_pit_run_then_resume() {
        let mut profile = GroundProfile::flat(10, 5);
        let mut generator = TerrainGenerator::new(2, 10);
        generator.apply(GenerationDirective::Pit { run: 3 }, 5);

        advance_columns(&mut generator, &mut profile, 2, false);
        assert_eq!(tail(&profile, 3), vec![5, 0, 0]);
        assert!(generator.state.pit_sequence_active());

        advance_columns(&mut generator, &mut profile, 1, false);
        assert_eq!(tail(&profile, 4), vec![5, 0, 0, 5]);
        assert_eq!(generator.state, GenerationState::default());
        assert_eq!(profile.len(), 10);
    }

    #[test]
    fn test_bridges_encode_resume_level() {
        let mut profile = GroundProfile::flat(10, 7);
        let mut generator = TerrainGenerator::new(2, 10);
        generator.apply(GenerationDirective::Pit { run: 3 }, 7);

        advance_columns(&mut generator, &mut profile, 3, true);
        assert_eq!(tail(&profile, 4), vec![7, -7, -7, 7]);
    }

    #[test]
    fn test_second_pit_request_keeps_first_resume_level() {
        let mut generator = TerrainGenerator::new(2, 10);
        generator.apply(GenerationDirective::Pit { run: 3 }, 6);
        generator.apply(GenerationDirective::Pit { run: 2 }, 0);
        assert_eq!(generator.state.resume_ground, Some(6));
        assert_eq!(generator.state.pending_pit_columns, 2);
    }

    #[test]
    fn test_elevation_change_is_clamped() {
        let mut profile = GroundProfile::flat(10, 10);
        let mut generator = TerrainGenerator::new(2, 10);
        generator.apply(GenerationDirective::Elevation { change: 1 }, 10);
        advance_columns(&mut generator, &mut profile, 1, false);
        assert_eq!(profile.trailing(), Some(GroundColumn::Solid(10)));
        assert_eq!(generator.state.pending_elevation_change, 0);

        generator.apply(GenerationDirective::Elevation { change: -1 }, 10);
        advance_columns(&mut generator, &mut profile, 2, false);
        assert_eq!(tail(&profile, 3), vec![10, 9, 9]);
    }

    #[test]
    fn test_elevation_waits_for_pit_to_finish() {
        let mut profile = GroundProfile::flat(10, 5);
        let mut generator = TerrainGenerator::new(2, 10);
        generator.apply(GenerationDirective::Pit { run: 2 }, 5);
        generator.apply(GenerationDirective::Elevation { change: 1 }, 5);

        advance_columns(&mut generator, &mut profile, 3, false);
        assert_eq!(tail(&profile, 3), vec![0, 5, 6]);
    }

    #[test]
    fn test_fractional_scroll_generates_nothing() {
        let mut profile = GroundProfile::flat(10, 5);
        let mut generator = TerrainGenerator::new(2, 10);
        assert_eq!(generator.advance(&mut profile, 0.4, false), 0);
        assert_eq!(generator.advance(&mut profile, 0.4, false), 0);
        assert_eq!(generator.advance(&mut profile, 0.4, false), 1);
    }

    #[test]
    fn test_single_column_run_only_resumes() {
        let mut profile = GroundProfile::flat(10, 4);
        let mut generator = TerrainGenerator::new(2, 10);
        generator.apply(GenerationDirective::Pit { run: 1 }, 4);
        advance_columns(&mut generator, &mut profile, 1, false);
        assert_eq!(profile.heights(), vec![4; 10]);
        assert!(!generator.state.pit_sequence_active());
    }

    #[test]
    fn test_blocked_elevation_opens_one_column_gap() {
        let settings = crate::settings::RunnerSettings::default();
        let mut profile = GroundProfile::flat(10, 10);
        let mut generator = TerrainGenerator::new(2, 10);
        let directive = crate::sim::spawner::elevation_directive(10, 1, &settings);
        generator.apply(directive, 10);

        advance_columns(&mut generator, &mut profile, 2, false);
        assert_eq!(tail(&profile, 3), vec![10, 0, 10]);
    }

    proptest! {
        #[test]
        fn prop_window_length_is_constant(
            steps in proptest::collection::vec((0.0f32..3.5, 0u8..4), 1..200),
            bridges in any::<bool>(),
        ) {
            let mut profile = GroundProfile::flat(10, 5);
            let mut generator = TerrainGenerator::new(2, 10);
            for (distance, roll) in steps {
                let trailing = profile.trailing().and_then(GroundColumn::surface_height).unwrap_or(5);
                match roll {
                    0 => generator.apply(GenerationDirective::Pit { run: 3 }, trailing),
                    1 => generator.apply(GenerationDirective::Elevation { change: 1 }, trailing),
                    2 => generator.apply(GenerationDirective::Elevation { change: -1 }, trailing),
                    _ => {}
                }
                generator.advance(&mut profile, distance, bridges);
                prop_assert_eq!(profile.len(), 10);
                prop_assert!(profile.offset() >= 0.0 && profile.offset() < 1.0);
                prop_assert_eq!(
                    generator.state.resume_ground.is_some(),
                    generator.state.pit_sequence_active()
                );
                for column in profile.columns() {
                    if let GroundColumn::Solid(h) = column {
                        prop_assert!((2..=10).contains(&h));
                    }
                }
            }
        }

        #[test]
        fn prop_pit_resumes_at_recorded_height(
            height in 2u8..=10,
            run in 1u32..6,
            bridges in any::<bool>(),
        ) {
            let mut profile = GroundProfile::flat(10, height);
            let mut generator = TerrainGenerator::new(2, 10);
            generator.apply(GenerationDirective::Pit { run }, height);
            for _ in 1..run {
                generator.advance(&mut profile, 1.0, bridges);
                prop_assert!(profile.trailing().map(|c| c.to_signed() <= 0).unwrap_or(false));
            }
            generator.advance(&mut profile, 1.0, bridges);
            prop_assert_eq!(profile.trailing(), Some(GroundColumn::Solid(height)));
            prop_assert!(!generator.state.pit_sequence_active());
        }
    }
}
