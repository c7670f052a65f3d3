//! Gem Rewards
//!
//! Rarity follows the word's mastery level before the attempt (first correct
//! exposure -> common, one tier up per completed review), shifted by at most
//! one tier by the attempt's signals:
//!
//! - fast response or a long running streak: one tier up
//! - hint usage or an effortful production mode (typing, dictation): one tier down
//!
//! Incorrect attempts never earn a gem.

use serde::{Deserialize, Serialize};

use crate::modes::strategy;
use crate::types::{GemTier, Mode};

/// Responses faster than this nudge the tier up
pub const FAST_RESPONSE_MS: u64 = 2000;

/// Streak length (before the attempt) that nudges the tier up
pub const LONG_STREAK: u32 = 5;

/// XP per tier, indexed by tier level
pub const XP_BY_TIER: [u32; 5] = [10, 25, 50, 100, 200];

/// Largest tier shift the modulation band may apply
const MAX_SHIFT: i8 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardInput {
    pub is_correct: bool,
    pub response_time_ms: u64,
    pub streak: u32,
    pub hint_used: bool,
    pub mode: Mode,
    pub prior_mastery_level: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub tier: GemTier,
    pub xp: u32,
}

/// Tier shift in [-1, 1] from latency, streak, hint and mode signals
pub fn modulation(input: &RewardInput) -> i8 {
    let mut shift = 0i8;
    if input.response_time_ms < FAST_RESPONSE_MS {
        shift += 1;
    }
    if input.streak >= LONG_STREAK {
        shift += 1;
    }
    if input.hint_used {
        shift -= 1;
    }
    if strategy(input.mode).effortful {
        shift -= 1;
    }
    shift.clamp(-MAX_SHIFT, MAX_SHIFT)
}

pub fn rarity_for(input: &RewardInput) -> Option<GemTier> {
    if !input.is_correct {
        return None;
    }
    Some(GemTier::from_level(input.prior_mastery_level).shifted(modulation(input)))
}

pub fn xp_for(tier: GemTier) -> u32 {
    XP_BY_TIER[tier.level() as usize]
}

pub fn reward_for(input: &RewardInput) -> Option<Reward> {
    rarity_for(input).map(|tier| Reward {
        tier,
        xp: xp_for(tier),
    })
}
