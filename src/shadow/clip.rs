//! The 8x4 clip grid shadow.
//!
//! Grounded on `original_source/ClipGridModel.cpp`: fixed 32-cell array
//! addressed as `scene*8 + track`, idempotent setters that only notify
//! on an actual change, and a `resetAll` that clears every cell in one
//! bulk notification.

use crate::codec::Rgb;
use crate::ring::{RING_HEIGHT, RING_WIDTH};

pub const DEFAULT_CLIP_COLOR: Rgb = Rgb::new(0x28, 0x28, 0x28);
const CELL_COUNT: usize = RING_WIDTH as usize * RING_HEIGHT as usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipCell {
    pub name: String,
    pub state: u8,
    pub color: Rgb,
}

impl Default for ClipCell {
    fn default() -> Self {
        Self {
            name: String::new(),
            state: 0,
            color: DEFAULT_CLIP_COLOR,
        }
    }
}

pub struct ClipGrid {
    cells: Vec<ClipCell>,
}

impl Default for ClipGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipGrid {
    pub fn new() -> Self {
        Self {
            cells: (0..CELL_COUNT).map(|_| ClipCell::default()).collect(),
        }
    }

    fn index_for(track: usize, scene: usize) -> Option<usize> {
        if track < RING_WIDTH as usize && scene < RING_HEIGHT as usize {
            Some(scene * RING_WIDTH as usize + track)
        } else {
            None
        }
    }

    pub fn cell(&self, track: usize, scene: usize) -> Option<&ClipCell> {
        Self::index_for(track, scene).map(|i| &self.cells[i])
    }

    /// Returns `true` if the name actually changed.
    pub fn set_name(&mut self, track: usize, scene: usize, name: String) -> bool {
        let Some(i) = Self::index_for(track, scene) else { return false };
        if self.cells[i].name == name {
            false
        } else {
            self.cells[i].name = name;
            true
        }
    }

    pub fn set_color(&mut self, track: usize, scene: usize, color: Rgb) -> bool {
        let Some(i) = Self::index_for(track, scene) else { return false };
        if self.cells[i].color == color {
            false
        } else {
            self.cells[i].color = color;
            true
        }
    }

    pub fn set_state(&mut self, track: usize, scene: usize, state: u8) -> bool {
        let Some(i) = Self::index_for(track, scene) else { return false };
        if self.cells[i].state == state {
            false
        } else {
            self.cells[i].state = state;
            true
        }
    }

    /// Clear every cell back to its default, applying `color` to all 32
    /// cells. Used both for an explicit reset command and for the ring
    /// projection's shadow invalidation on offset change.
    pub fn reset_all(&mut self, color: Rgb) {
        for cell in &mut self.cells {
            cell.name.clear();
            cell.state = 0;
            cell.color = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_for_rejects_out_of_bounds() {
        assert!(ClipGrid::index_for(8, 0).is_none());
        assert!(ClipGrid::index_for(0, 4).is_none());
        assert_eq!(ClipGrid::index_for(3, 2), Some(2 * 8 + 3));
    }

    #[test]
    fn set_name_is_idempotent() {
        let mut grid = ClipGrid::new();
        assert!(grid.set_name(0, 0, "Drums".into()));
        assert!(!grid.set_name(0, 0, "Drums".into()));
        assert!(grid.set_name(0, 0, "Bass".into()));
    }

    #[test]
    fn reset_all_clears_every_cell() {
        let mut grid = ClipGrid::new();
        grid.set_name(1, 1, "X".into());
        grid.set_state(1, 1, 2);
        grid.reset_all(DEFAULT_CLIP_COLOR);
        let cell = grid.cell(1, 1).unwrap();
        assert_eq!(cell.name, "");
        assert_eq!(cell.state, 0);
        assert_eq!(cell.color, DEFAULT_CLIP_COLOR);
    }
}
