//! Time-bounded cleanup of stale track entries after a refresh burst.
//!
//! Grounded on `SerialController::scheduleTrackCleanup` /
//! `handleTrackBatchTimeout`: a presence bitset, a "saw index 0" flag
//! that arms the batch, a 100ms single-shot timer restarted on every
//! `TrackName` update, and on timeout, pruning everything past the
//! longest contiguous-from-zero run of present indices.

use std::time::{Duration, Instant};

use crate::ring::RING_WIDTH;

pub const BATCH_TIMEOUT: Duration = Duration::from_millis(100);

pub struct TrackBatchReaper {
    present: [bool; RING_WIDTH as usize],
    batch_armed: bool,
    deadline: Option<Instant>,
}

impl Default for TrackBatchReaper {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackBatchReaper {
    pub fn new() -> Self {
        Self {
            present: [false; RING_WIDTH as usize],
            batch_armed: false,
            deadline: None,
        }
    }

    /// Record that a `TrackName` update was applied at relative index
    /// `index`, and (re)start the 100ms timer.
    pub fn mark_present(&mut self, index: usize, now: Instant) {
        if index < self.present.len() {
            self.present[index] = true;
            if index == 0 {
                self.batch_armed = true;
            }
        }
        self.deadline = Some(now + BATCH_TIMEOUT);
    }

    /// Called once per tick. If the timer is armed and has elapsed,
    /// returns the highest index to keep (everything past it should be
    /// cleared) and resets internal state for the next batch.
    pub fn poll_timer(&mut self, now: Instant) -> Option<usize> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        if !self.batch_armed {
            self.present = [false; RING_WIDTH as usize];
            return None;
        }
        let mut last_contiguous = None;
        for (i, &present) in self.present.iter().enumerate() {
            if present {
                last_contiguous = Some(i);
            } else {
                break;
            }
        }
        self.present = [false; RING_WIDTH as usize];
        self.batch_armed = false;
        last_contiguous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_longest_contiguous_run_from_zero() {
        let mut reaper = TrackBatchReaper::new();
        let t0 = Instant::now();
        reaper.mark_present(0, t0);
        reaper.mark_present(1, t0);
        reaper.mark_present(2, t0);
        assert_eq!(reaper.poll_timer(t0 + BATCH_TIMEOUT), Some(2));
    }

    #[test]
    fn gap_in_batch_stops_the_run_early() {
        let mut reaper = TrackBatchReaper::new();
        let t0 = Instant::now();
        reaper.mark_present(0, t0);
        reaper.mark_present(2, t0);
        assert_eq!(reaper.poll_timer(t0 + BATCH_TIMEOUT), Some(0));
    }

    #[test]
    fn batch_without_index_zero_never_arms() {
        let mut reaper = TrackBatchReaper::new();
        let t0 = Instant::now();
        reaper.mark_present(3, t0);
        assert_eq!(reaper.poll_timer(t0 + BATCH_TIMEOUT), None);
    }

    #[test]
    fn timer_does_not_fire_before_deadline() {
        let mut reaper = TrackBatchReaper::new();
        let t0 = Instant::now();
        reaper.mark_present(0, t0);
        assert_eq!(reaper.poll_timer(t0 + BATCH_TIMEOUT / 2), None);
    }

    #[test]
    fn timer_is_reset_by_each_mark() {
        let mut reaper = TrackBatchReaper::new();
        let t0 = Instant::now();
        reaper.mark_present(0, t0);
        let t1 = t0 + BATCH_TIMEOUT / 2;
        reaper.mark_present(1, t1);
        // Original deadline would have elapsed by now, but the mark at
        // t1 pushed it out another full interval.
        assert_eq!(reaper.poll_timer(t0 + BATCH_TIMEOUT), None);
        assert_eq!(reaper.poll_timer(t1 + BATCH_TIMEOUT), Some(1));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn result_is_always_a_prefix_length(indices in prop::collection::hash_set(0usize..8, 0..8)) {
            let mut reaper = TrackBatchReaper::new();
            let t0 = Instant::now();
            for &i in &indices {
                reaper.mark_present(i, t0);
            }
            if let Some(last) = reaper.poll_timer(t0 + BATCH_TIMEOUT) {
                for i in 0..=last {
                    prop_assert!(indices.contains(&i));
                }
            }
        }
    }
}
