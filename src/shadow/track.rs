//! The windowed (8-entry) track list shadow. Indexed relatively,
//! through the ring projection — not the same indexing as the mixer.

use crate::codec::Rgb;
use crate::ring::RING_WIDTH;

pub const DEFAULT_TRACK_COLOR: Rgb = Rgb::new(0x2a, 0x2a, 0x2a);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    pub name: String,
    pub color: Rgb,
}

impl TrackInfo {
    /// Derived: a track is active iff it has a non-empty name.
    pub fn active(&self) -> bool {
        !self.name.is_empty()
    }
}

impl Default for TrackInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: DEFAULT_TRACK_COLOR,
        }
    }
}

pub struct TrackList {
    tracks: Vec<TrackInfo>,
}

impl Default for TrackList {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackList {
    pub fn new() -> Self {
        Self {
            tracks: (0..RING_WIDTH as usize).map(|_| TrackInfo::default()).collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&TrackInfo> {
        self.tracks.get(index)
    }

    pub fn set_name(&mut self, index: usize, name: String) -> bool {
        match self.tracks.get_mut(index) {
            Some(t) if t.name != name => {
                t.name = name;
                true
            }
            _ => false,
        }
    }

    pub fn set_color(&mut self, index: usize, color: Rgb) -> bool {
        match self.tracks.get_mut(index) {
            Some(t) if t.color != color => {
                t.color = color;
                true
            }
            _ => false,
        }
    }

    /// Clear every entry back to its empty default, as happens when the
    /// ring offset moves.
    pub fn reset_all(&mut self) {
        for t in &mut self.tracks {
            *t = TrackInfo::default();
        }
    }

    /// Clear every entry with index strictly greater than
    /// `keep_through`, used by the track batch reaper.
    pub fn clear_above(&mut self, keep_through: usize) {
        for (i, t) in self.tracks.iter_mut().enumerate() {
            if i > keep_through {
                *t = TrackInfo::default();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
