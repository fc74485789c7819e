//! Ground profile: the sliding window of terrain columns
//!
//! Column `i` covers world x in `[i - offset, i + 1 - offset)`, where
//! `offset` is the fractional scroll of the leftmost column. Heights count
//! rows up from the bottom of the play field, so a column of height `h` has
//! its surface at screen row `rows - h`.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// One column of terrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroundColumn {
    /// Solid ground `height` rows tall
    Solid(u8),
    /// No ground at all
    Pit,
    /// One-row deck spanning a pit, level with the ground it resumes to
    Bridge { resume: u8 },
}

/// Thickness of a bridge deck (arcade units)
pub const BRIDGE_DECK_THICKNESS: f32 = 1.0;

impl GroundColumn {
    /// Signed encoding: `h > 0` solid, `0` pit, `-h` bridge at level `h`
    pub fn to_signed(self) -> i32 {
        match self {
            GroundColumn::Solid(h) => i32::from(h),
            GroundColumn::Pit => 0,
            GroundColumn::Bridge { resume } => -i32::from(resume),
        }
    }

    pub fn from_signed(value: i32) -> Self {
        let level = value.unsigned_abs().min(u32::from(u8::MAX)) as u8;
        match value {
            0 => GroundColumn::Pit,
            v if v > 0 => GroundColumn::Solid(level),
            _ => GroundColumn::Bridge { resume: level },
        }
    }

    /// Height of the walkable surface, if any
    pub fn surface_height(self) -> Option<u8> {
        match self {
            GroundColumn::Solid(h) => Some(h),
            GroundColumn::Bridge { resume } => Some(resume),
            GroundColumn::Pit => None,
        }
    }

    /// Screen row of the walkable surface, if any
    pub fn surface_top(self, rows: u32) -> Option<f32> {
        self.surface_height().map(|h| rows as f32 - f32::from(h))
    }

    pub fn is_pit(self) -> bool {
        self == GroundColumn::Pit
    }
}

/// Fixed-length window of terrain columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundProfile {
    columns: VecDeque<GroundColumn>,
    /// Fractional scroll of the leftmost column, in `[0, 1)`
    offset: f32,
}

impl GroundProfile {
    /// A flat window of `len` columns of the given height
    pub fn flat(len: usize, height: u8) -> Self {
        Self {
            columns: std::iter::repeat_n(GroundColumn::Solid(height), len).collect(),
            offset: 0.0,
        }
    }

    pub fn from_columns(columns: impl IntoIterator<Item = GroundColumn>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            offset: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn columns(&self) -> impl ExactSizeIterator<Item = GroundColumn> + '_ {
        self.columns.iter().copied()
    }

    /// Signed heights, leftmost first (render surface)
    pub fn heights(&self) -> Vec<i32> {
        self.columns.iter().map(|c| c.to_signed()).collect()
    }

    pub fn get(&self, index: usize) -> Option<GroundColumn> {
        self.columns.get(index).copied()
    }

    /// Rightmost (most recently generated) column
    pub fn trailing(&self) -> Option<GroundColumn> {
        self.columns.back().copied()
    }

    /// Window index of the column under world x
    pub fn index_at(&self, x: f32) -> Option<usize> {
        let i = (self.offset + x).floor();
        if i < 0.0 {
            return None;
        }
        let i = i as usize;
        (i < self.columns.len()).then_some(i)
    }

    /// Column under world x; outside the window reads as a pit
    pub fn column_at(&self, x: f32) -> GroundColumn {
        self.index_at(x)
            .and_then(|i| self.get(i))
            .unwrap_or(GroundColumn::Pit)
    }

    /// World x of the left edge of window column `index`
    pub fn column_left(&self, index: usize) -> f32 {
        index as f32 - self.offset
    }

    /// Add scroll distance; returns how many whole columns were crossed
    pub(crate) fn scroll(&mut self, distance: f32) -> u32 {
        self.offset += distance.max(0.0);
        let mut crossed = 0;
        while self.offset >= 1.0 {
            self.offset -= 1.0;
            crossed += 1;
        }
        crossed
    }

    /// Drop the leftmost column and append `column`; length is unchanged
    pub(crate) fn shift_in(&mut self, column: GroundColumn) {
        self.columns.pop_front();
        self.columns.push_back(column);
    }
}
