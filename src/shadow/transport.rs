//! Transport shadow: play/record/loop/tempo/position/shift state.

#[derive(Debug, Clone, PartialEq)]
pub struct TransportState {
    pub playing: bool,
    pub recording: bool,
    pub looping: bool,
    pub tempo: f64,
    pub position: String,
    pub shift_pressed: bool,
}

impl Default for TransportState {
    fn default() -> Self {
        Self {
            playing: false,
            recording: false,
            looping: false,
            tempo: 120.0,
            position: "1.1.1".to_string(),
            shift_pressed: false,
        }
    }
}

impl TransportState {
    pub fn set_playing(&mut self, playing: bool) -> bool {
        if self.playing == playing {
            false
        } else {
            self.playing = playing;
            true
        }
    }

    pub fn set_recording(&mut self, recording: bool) -> bool {
        if self.recording == recording {
            false
        } else {
            self.recording = recording;
            true
        }
    }

    pub fn set_looping(&mut self, looping: bool) -> bool {
        if self.looping == looping {
            false
        } else {
            self.looping = looping;
            true
        }
    }

    pub fn set_tempo(&mut self, tempo: f64) -> bool {
        if (self.tempo - tempo).abs() < f64::EPSILON {
            false
        } else {
            self.tempo = tempo;
            true
        }
    }

    pub fn set_position(&mut self, position: String) -> bool {
        if self.position == position {
            false
        } else {
            self.position = position;
            true
        }
    }

    pub fn set_shift_pressed(&mut self, pressed: bool) -> bool {
        if self.shift_pressed == pressed {
            false
        } else {
            self.shift_pressed = pressed;
            true
        }
    }

    /// Apply the three transport flag bits atomically: bit 0 playing,
    /// bit 1 recording, bit 2 looping. Returns `true` if anything
    /// changed, so the caller emits at most one notification for the
    /// whole frame rather than one per bit.
    pub fn apply_state_flags(&mut self, flags: u8) -> bool {
        let playing = flags & 0b001 != 0;
        let recording = flags & 0b010 != 0;
        let looping = flags & 0b100 != 0;
        let changed = self.playing != playing || self.recording != recording || self.looping != looping;
        self.playing = playing;
        self.recording = recording;
        self.looping = looping;
        changed
    }
}
