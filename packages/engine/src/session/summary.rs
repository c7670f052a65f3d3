use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lexigem_algo::GemTally;

/// Aggregate result of a session, emitted on completion (or exit, partial)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub set_id: String,
    /// False when the learner exited before the last word
    pub completed: bool,
    pub score: u32,
    /// Percentage of counted attempts answered correctly, 0 when none counted
    pub accuracy: f64,
    pub correct_count: u32,
    pub incorrect_count: u32,
    pub shown_count: u32,
    pub total_words: usize,
    pub gems_collected: u32,
    pub gem_tally_by_tier: GemTally,
    pub max_streak: u32,
    pub xp_earned: u32,
    pub words_learned: Vec<String>,
    pub words_struggling: Vec<String>,
    /// Mastery tier-ups acknowledged by the scheduler so far
    pub tier_upgrades: u32,
    pub duration_ms: u64,
}

/// Resumable progress, offered to the save debouncer after every turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub session_id: Uuid,
    pub set_id: String,
    pub current_index: usize,
    pub total_words: usize,
    pub score: u32,
    pub correct_count: u32,
    pub incorrect_count: u32,
    pub streak: u32,
    pub max_streak: u32,
    pub gems_collected: u32,
    pub xp_earned: u32,
}

pub fn accuracy(correct: u32, incorrect: u32) -> f64 {
    let counted = correct + incorrect;
    if counted == 0 {
        return 0.0;
    }
    f64::from(correct) / f64::from(counted) * 100.0
}
