//! Mastery Progression
//!
//! Per-word mastery level 0..=4, one step up per correct unhinted review.
//! Incorrect attempts never lower the level here; regression is a long-term
//! policy owned by the backing store.

use serde::{Deserialize, Serialize};

use crate::reward::xp_for;
use crate::types::{GemTier, MAX_MASTERY_LEVEL};

/// Minimum time between two recorded attempts for the same word
pub const THROTTLE_WINDOW_SECS: u64 = 10 * 60;

const HOUR_SECS: u64 = 60 * 60;
const DAY_SECS: u64 = 24 * HOUR_SECS;

/// Review interval per mastery level, non-decreasing
pub const REVIEW_INTERVALS_SECS: [u64; 5] = [
    4 * HOUR_SECS,
    DAY_SECS,
    3 * DAY_SECS,
    7 * DAY_SECS,
    21 * DAY_SECS,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryStep {
    pub previous_level: u8,
    pub new_level: u8,
    pub tier_upgraded: bool,
    pub points_awarded: u32,
}

/// Level after one attempt at `current`
pub fn next_mastery_level(current: u8, is_correct: bool, hint_used: bool) -> MasteryStep {
    let previous_level = current.min(MAX_MASTERY_LEVEL);
    let counted = is_correct && !hint_used;
    let new_level = if counted {
        (previous_level + 1).min(MAX_MASTERY_LEVEL)
    } else {
        previous_level
    };

    MasteryStep {
        previous_level,
        new_level,
        tier_upgraded: new_level > previous_level,
        points_awarded: if counted {
            xp_for(GemTier::from_level(new_level))
        } else {
            0
        },
    }
}

/// Delay until the next review; incorrect or hinted attempts come back soonest
pub fn review_interval_secs(level: u8, counted_correct: bool) -> u64 {
    if !counted_correct {
        return REVIEW_INTERVALS_SECS[0];
    }
    REVIEW_INTERVALS_SECS[level.min(MAX_MASTERY_LEVEL) as usize]
}

/// Whether an attempt `elapsed_ms` after the last recorded one must be skipped.
/// A negative elapsed time (clock skew) is treated as inside the window.
pub fn is_throttled(elapsed_ms: i64, window_secs: u64) -> bool {
    elapsed_ms < (window_secs as i64).saturating_mul(1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_steps_up_and_caps() {
        let mut level = 0;
        for expected in [1, 2, 3, 4, 4] {
            let step = next_mastery_level(level, true, false);
            assert_eq!(step.new_level, expected);
            level = step.new_level;
        }
        assert!(!next_mastery_level(4, true, false).tier_upgraded);
    }

    #[test]
    fn test_incorrect_and_hinted_never_regress() {
        let step = next_mastery_level(3, false, false);
        assert_eq!(step.new_level, 3);
        assert_eq!(step.points_awarded, 0);

        let step = next_mastery_level(2, true, true);
        assert_eq!(step.new_level, 2);
        assert!(!step.tier_upgraded);
        assert_eq!(step.points_awarded, 0);
    }

    #[test]
    fn test_points_follow_new_tier() {
        let step = next_mastery_level(0, true, false);
        assert!(step.tier_upgraded);
        assert_eq!(step.points_awarded, xp_for(GemTier::Uncommon));
    }

    #[test]
    fn test_intervals_non_decreasing_and_positive() {
        for level in 0..MAX_MASTERY_LEVEL {
            assert!(review_interval_secs(level, true) <= review_interval_secs(level + 1, true));
        }
        assert!(review_interval_secs(0, false) > 0);
        assert_eq!(review_interval_secs(4, false), REVIEW_INTERVALS_SECS[0]);
    }

    #[test]
    fn test_throttle_window() {
        assert!(is_throttled(0, THROTTLE_WINDOW_SECS));
        assert!(is_throttled(9 * 60 * 1000, THROTTLE_WINDOW_SECS));
        assert!(!is_throttled(10 * 60 * 1000, THROTTLE_WINDOW_SECS));
        assert!(is_throttled(-5_000, THROTTLE_WINDOW_SECS));
    }
}
