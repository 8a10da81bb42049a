//! Translation between the device's absolute track/scene coordinates
//! and the host's fixed 8x4 visible window ("session ring").
//!
//! This has no counterpart in the original serial controller, which
//! addressed tracks/scenes directly — it's the part of this link layer
//! that didn't exist before and was added to let a bounded shadow mirror
//! an unbounded project.

pub const RING_WIDTH: u16 = 8;
pub const RING_HEIGHT: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RingOffset {
    pub track_offset: u16,
    pub scene_offset: u16,
}

/// Translates absolute device coordinates into the host's relative
/// window and tracks the current offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RingProjection {
    offset: RingOffset,
}

impl RingProjection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> RingOffset {
        self.offset
    }

    /// Project an absolute track index into the window; `None` if it
    /// falls outside the visible 8 columns.
    pub fn project_track(&self, abs_track: u16) -> Option<usize> {
        let rel = abs_track.checked_sub(self.offset.track_offset)?;
        (rel < RING_WIDTH).then_some(rel as usize)
    }

    /// Project an absolute scene index into the window; `None` if it
    /// falls outside the visible 4 rows.
    pub fn project_scene(&self, abs_scene: u16) -> Option<usize> {
        let rel = abs_scene.checked_sub(self.offset.scene_offset)?;
        (rel < RING_HEIGHT).then_some(rel as usize)
    }

    /// Project an absolute (track, scene) pair; `None` unless both
    /// coordinates land inside the window.
    pub fn project(&self, abs_track: u16, abs_scene: u16) -> Option<(usize, usize)> {
        Some((self.project_track(abs_track)?, self.project_scene(abs_scene)?))
    }

    /// Update the offset. Returns `true` if it actually changed, which
    /// is the dispatcher's cue to clear the Clip and Track shadows
    /// before applying anything else from the same frame.
    pub fn set_offset(&mut self, offset: RingOffset) -> bool {
        if offset == self.offset {
            false
        } else {
            self.offset = offset;
            true
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn projection_is_none_or_within_window(
            off_t in 0u16..100, off_s in 0u16..100,
            abs_t in 0u16..200, abs_s in 0u16..200,
        ) {
            let mut ring = RingProjection::new();
            ring.set_offset(RingOffset { track_offset: off_t, scene_offset: off_s });
            match ring.project(abs_t, abs_s) {
                Some((rt, rs)) => {
                    prop_assert!(rt < RING_WIDTH as usize);
                    prop_assert!(rs < RING_HEIGHT as usize);
                    prop_assert_eq!(abs_t, off_t + rt as u16);
                    prop_assert_eq!(abs_s, off_s + rs as u16);
                }
                None => {
                    let in_t = abs_t >= off_t && abs_t - off_t < RING_WIDTH;
                    let in_s = abs_s >= off_s && abs_s - off_s < RING_HEIGHT;
                    prop_assert!(!(in_t && in_s));
                }
            }
        }
    }
}
