//! Queue navigation - index calculations for next/prev/ended
//!
//! All code that needs to determine which track comes next goes through
//! `QueueNavigator`, so manual navigation and end-of-track handling agree.

use rand::Rng;

use super::message::Direction;
use super::state::RepeatMode;

/// What to do when a track finishes on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndAction {
    /// Rewind and play the same track again
    Restart,
    /// Stay on the finished track, paused
    Stop,
    /// Move on to the next track
    Advance,
}

/// Computes track indices for a playlist of `queue_len` tracks
pub struct QueueNavigator {
    queue_len: usize,
    current_idx: usize,
    is_shuffle: bool,
}

impl QueueNavigator {
    pub fn new(queue_len: usize, current_idx: usize, is_shuffle: bool) -> Self {
        Self {
            queue_len,
            current_idx,
            is_shuffle,
        }
    }

    /// Index reached by moving in `direction`
    ///
    /// Shuffle picks a uniformly random other track; otherwise the index
    /// wraps around at both ends.
    pub fn step(&self, direction: Direction) -> usize {
        if self.queue_len <= 1 {
            return 0;
        }

        if self.is_shuffle {
            return random_index_excluding(self.current_idx, self.queue_len);
        }

        match direction {
            Direction::Next => (self.current_idx + 1) % self.queue_len,
            Direction::Prev => {
                if self.current_idx == 0 {
                    self.queue_len - 1
                } else {
                    self.current_idx - 1
                }
            }
        }
    }

    /// Decide what happens when the current track ends
    pub fn on_ended(&self, repeat_mode: RepeatMode) -> EndAction {
        match repeat_mode {
            RepeatMode::One => EndAction::Restart,
            RepeatMode::Off if !self.is_shuffle && self.is_last() => EndAction::Stop,
            RepeatMode::Off | RepeatMode::All => EndAction::Advance,
        }
    }

    fn is_last(&self) -> bool {
        self.current_idx + 1 >= self.queue_len
    }
}

/// Uniform random index in `[0, len)` other than `exclude`
fn random_index_excluding(exclude: usize, len: usize) -> usize {
    let pick = rand::rng().random_range(0..len - 1);
    if pick >= exclude { pick + 1 } else { pick }
}
