//! Active cue resolution and change detection
//!
//! Resolution is a plain in-order scan: lyric files hold tens to a few
//! hundred lines, so there is nothing to gain from an index.

use super::parser::Cue;

/// Resolve the cue active at `time` (seconds)
///
/// The active cue is the last one of the leading run of cues starting at or
/// before `time`. A cue whose time equals `time` is active. Returns `None`
/// for empty input or when `time` is before the first cue.
pub fn resolve_active_cue(cues: &[Cue], time: f64) -> Option<usize> {
    cues.iter()
        .take_while(|cue| cue.time <= time)
        .count()
        .checked_sub(1)
}

/// Transition between two active cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CueChange {
    pub previous: Option<usize>,
    pub current: Option<usize>,
}

/// Remembers the last resolved cue so that renderers only hear about
/// transitions, not every time update.
#[derive(Debug, Clone, Default)]
pub struct LyricSync {
    last_active: Option<usize>,
}

impl LyricSync {
    /// Forget the tracked position (new track or new lyrics)
    pub fn reset(&mut self) {
        self.last_active = None;
    }

    /// Resolve the cue for `time` and report a change if it differs from the
    /// previous resolution. Empty cue sets never report.
    pub fn update(&mut self, cues: &[Cue], time: f64) -> Option<CueChange> {
        if cues.is_empty() {
            return None;
        }

        let current = resolve_active_cue(cues, time);
        if current == self.last_active {
            return None;
        }

        let change = CueChange {
            previous: self.last_active,
            current,
        };
        self.last_active = current;
        Some(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cues(times: &[f64]) -> Vec<Cue> {
        times
            .iter()
            .enumerate()
            .map(|(i, &t)| Cue::new(t, format!("line {}", i)))
            .collect()
    }

    #[test]
    fn test_hello_world_scenario() {
        let cues = vec![Cue::new(1.5, "Hello"), Cue::new(3.0, "World")];
        assert_eq!(resolve_active_cue(&cues, 2.0), Some(0));
        assert_eq!(resolve_active_cue(&cues, 3.0), Some(1));
        assert_eq!(resolve_active_cue(&cues, 0.0), None);
    }

    #[test]
    fn test_empty_cues() {
        assert_eq!(resolve_active_cue(&[], 10.0), None);
    }

    #[test]
    fn test_before_first_and_after_last() {
        let cues = cues(&[2.0, 2.0, 5.0, 9.5]);
        for t in [-1.0, 0.0, 1.0, 1.999] {
            assert_eq!(resolve_active_cue(&cues, t), None);
        }
        for t in [9.5, 10.0, 1000.0] {
            assert_eq!(resolve_active_cue(&cues, t), Some(3));
        }
    }

    #[test]
    fn test_tie_selects_last_equal_cue() {
        let cues = cues(&[1.0, 4.0, 4.0, 6.0]);
        assert_eq!(resolve_active_cue(&cues, 4.0), Some(2));
    }

    #[test]
    fn test_monotonic_in_time() {
        let sorted = cues(&[0.5, 1.0, 1.0, 3.25, 7.0, 12.0]);
        let unsorted = cues(&[3.0, 1.0, 5.0, 2.0, 8.0]);

        for cues in [sorted, unsorted] {
            let mut previous = None;
            let mut t = -1.0;
            while t < 15.0 {
                let current = resolve_active_cue(&cues, t);
                assert!(current >= previous, "regressed at t={}", t);
                previous = current;
                t += 0.125;
            }
        }
    }

    #[test]
    fn test_sync_reports_only_transitions() {
        let cues = cues(&[1.0, 2.0, 3.0]);
        let mut sync = LyricSync::default();

        assert_eq!(sync.update(&cues, 0.5), None);
        assert_eq!(
            sync.update(&cues, 1.0),
            Some(CueChange {
                previous: None,
                current: Some(0)
            })
        );
        assert_eq!(sync.update(&cues, 1.25), None);
        assert_eq!(sync.update(&cues, 1.75), None);
        assert_eq!(
            sync.update(&cues, 2.5),
            Some(CueChange {
                previous: Some(0),
                current: Some(1)
            })
        );
    }

    #[test]
    fn test_sync_backward_seek_to_boundary() {
        let cues = cues(&[1.0, 2.0, 3.0]);
        let mut sync = LyricSync::default();

        sync.update(&cues, 3.5);
        assert_eq!(
            sync.update(&cues, 2.0),
            Some(CueChange {
                previous: Some(2),
                current: Some(1)
            })
        );
        // Same cue re-selected is a no-op
        assert_eq!(sync.update(&cues, 2.0), None);
        assert_eq!(
            sync.update(&cues, 0.0),
            Some(CueChange {
                previous: Some(1),
                current: None
            })
        );
    }

    #[test]
    fn test_sync_ignores_empty_cues_and_resets() {
        let mut sync = LyricSync::default();
        assert_eq!(sync.update(&[], 5.0), None);

        let cues = cues(&[1.0]);
        sync.update(&cues, 5.0);
        sync.reset();
        assert_eq!(
            sync.update(&cues, 5.0),
            Some(CueChange {
                previous: None,
                current: Some(0)
            })
        );
    }
}
