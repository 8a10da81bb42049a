//! The mixer shadow: globally (not ring-) indexed, one entry per
//! project track, with derived display fields.
//!
//! Grounded on `original_source/MixerModel.cpp`: `tag` is the first 4
//! characters of `name` upper-cased; `volumeLabel`/`panLabel` follow
//! `formatVolumeLabel`/`formatPanLabel` exactly; `setTotalTracks` grows
//! with `name="Track {i+1}"`, `tag="T{i+1}"`, `active=true` and shrinks
//! by truncation.

use crate::codec::Rgb;

pub const DEFAULT_MIXER_COLOR: Rgb = Rgb::new(0x3a, 0x3a, 0x3a);
const NEG_INF_LABEL: &str = "-\u{221e}";

#[derive(Debug, Clone, PartialEq)]
pub struct MixerTrack {
    pub name: String,
    pub tag: String,
    pub color: Rgb,
    pub volume: f32,
    pub pan: f32,
    pub sends: [f32; 4],
    pub muted: bool,
    pub solo: bool,
    pub armed: bool,
    pub active: bool,
    pub meter_l: f32,
    pub meter_r: f32,
}

impl MixerTrack {
    fn defaults_for(index: usize) -> Self {
        Self {
            name: format!("Track {}", index + 1),
            tag: format!("T{}", index + 1),
            color: DEFAULT_MIXER_COLOR,
            volume: 0.78, // ~0 dB at the teacher's 0..1 scale (see volume_label)
            pan: 0.5,
            sends: [0.0; 4],
            muted: false,
            solo: false,
            armed: false,
            active: true,
            meter_l: 0.0,
            meter_r: 0.0,
        }
    }

    fn recompute_tag(&mut self) {
        self.tag = self.name.chars().take(4).collect::<String>().to_uppercase();
    }

    pub fn volume_label(&self) -> String {
        if self.volume < 0.001 {
            return NEG_INF_LABEL.to_string();
        }
        let db = 20.0 * self.volume.log10();
        if db > -0.5 {
            "0.0 dB".to_string()
        } else if db < -60.0 {
            NEG_INF_LABEL.to_string()
        } else {
            format!("{db:.1} dB")
        }
    }

    pub fn pan_label(&self) -> String {
        if (0.48..=0.52).contains(&self.pan) {
            return "C".to_string();
        }
        let steps = ((self.pan - 0.5) * 50.0).round() as i32;
        if steps < 0 {
            format!("L{}", -steps)
        } else {
            format!("R{steps}")
        }
    }
}

pub struct MixerModel {
    tracks: Vec<MixerTrack>,
    selected: usize,
}

impl Default for MixerModel {
    fn default() -> Self {
        Self::new(8)
    }
}

impl MixerModel {
    pub fn new(initial_len: usize) -> Self {
        Self {
            tracks: (0..initial_len).map(MixerTrack::defaults_for).collect(),
            selected: 0,
        }
    }

    pub fn get(&self, index: usize) -> Option<&MixerTrack> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Clamp and store the selected track index.
    pub fn set_selected(&mut self, index: usize) -> bool {
        let clamped = index.min(self.tracks.len().saturating_sub(1));
        if clamped == self.selected {
            false
        } else {
            self.selected = clamped;
            true
        }
    }

    /// Grow with freshly-defaulted tracks or shrink by truncation.
    pub fn set_total_tracks(&mut self, total: usize) {
        if total > self.tracks.len() {
            for i in self.tracks.len()..total {
                self.tracks.push(MixerTrack::defaults_for(i));
            }
        } else {
            self.tracks.truncate(total);
        }
        if self.selected >= self.tracks.len() {
            self.selected = self.tracks.len().saturating_sub(1);
        }
    }

    pub fn set_name(&mut self, index: usize, name: String) -> bool {
        match self.tracks.get_mut(index) {
            Some(t) if t.name != name => {
                t.name = name;
                t.recompute_tag();
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

    pub fn set_volume(&mut self, index: usize, volume: f32) -> bool {
        let volume = volume.clamp(0.0, 1.0);
        match self.tracks.get_mut(index) {
            Some(t) if (t.volume - volume).abs() > f32::EPSILON => {
                t.volume = volume;
                true
            }
            _ => false,
        }
    }

    pub fn set_pan(&mut self, index: usize, pan: f32) -> bool {
        let pan = pan.clamp(0.0, 1.0);
        match self.tracks.get_mut(index) {
            Some(t) if (t.pan - pan).abs() > f32::EPSILON => {
                t.pan = pan;
                true
            }
            _ => false,
        }
    }

    pub fn set_send(&mut self, index: usize, send_index: usize, value: f32) -> bool {
        if send_index >= 4 {
            return false;
        }
        let value = value.clamp(0.0, 1.0);
        match self.tracks.get_mut(index) {
            Some(t) if (t.sends[send_index] - value).abs() > f32::EPSILON => {
                t.sends[send_index] = value;
                true
            }
            _ => false,
        }
    }

    pub fn set_muted(&mut self, index: usize, muted: bool) -> bool {
        match self.tracks.get_mut(index) {
            Some(t) if t.muted != muted => {
                t.muted = muted;
                true
            }
            _ => false,
        }
    }

    pub fn set_solo(&mut self, index: usize, solo: bool) -> bool {
        match self.tracks.get_mut(index) {
            Some(t) if t.solo != solo => {
                t.solo = solo;
                true
            }
            _ => false,
        }
    }

    pub fn set_armed(&mut self, index: usize, armed: bool) -> bool {
        match self.tracks.get_mut(index) {
            Some(t) if t.armed != armed => {
                t.armed = armed;
                true
            }
            _ => false,
        }
    }
}
