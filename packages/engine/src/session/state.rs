use serde::{Deserialize, Serialize};

use lexigem_algo::validator::{similarity, NEAR_MISS_SIMILARITY};
use lexigem_algo::{AttemptKey, ExerciseData, GemTally, Mode, Reward, Validation};

/// Points added to the score per counted correct attempt
pub const POINTS_PER_CORRECT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Loading,
    Presenting,
    Submitted,
    Advancing,
    Complete,
}

/// Identifies the one pending advancement of a submitted turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceToken {
    pub word_index: usize,
    pub turn: u64,
}

/// How an attempt affects the tallies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tally {
    Correct,
    Incorrect,
    /// Translation or hint was revealed first; excluded from counts and streak
    Shown,
}

impl Tally {
    pub fn of(validation: Validation, shown: bool) -> Self {
        if shown {
            Tally::Shown
        } else if validation.is_correct {
            Tally::Correct
        } else {
            Tally::Incorrect
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub phase: Phase,
    pub current_index: usize,
    pub current_mode: Mode,
    pub exercise: Option<ExerciseData>,
    pub score: u32,
    pub correct_count: u32,
    pub incorrect_count: u32,
    pub shown_count: u32,
    pub streak: u32,
    pub max_streak: u32,
    pub gems_collected: u32,
    pub gem_tally_by_tier: GemTally,
    pub xp_earned: u32,
    pub show_answer: bool,
    pub translation_shown: bool,
    pub last_processed_key: Option<AttemptKey>,
    pub pending_advance: Option<AdvanceToken>,
    pub time_left_secs: Option<u32>,
    pub audio_replays: u32,
    pub words_learned: Vec<String>,
    pub words_struggling: Vec<String>,
    pub turns: u64,
}

impl SessionState {
    pub fn new(mode: Mode) -> Self {
        Self {
            phase: Phase::Loading,
            current_index: 0,
            current_mode: mode,
            exercise: None,
            score: 0,
            correct_count: 0,
            incorrect_count: 0,
            shown_count: 0,
            streak: 0,
            max_streak: 0,
            gems_collected: 0,
            gem_tally_by_tier: GemTally::default(),
            xp_earned: 0,
            show_answer: false,
            translation_shown: false,
            last_processed_key: None,
            pending_advance: None,
            time_left_secs: None,
            audio_replays: 0,
            words_learned: Vec::new(),
            words_struggling: Vec::new(),
            turns: 0,
        }
    }

    /// Fold one verdict into the counters
    pub fn apply(&mut self, word_id: &str, tally: Tally, reward: Option<Reward>) {
        match tally {
            Tally::Correct => {
                self.correct_count += 1;
                self.streak += 1;
                self.max_streak = self.max_streak.max(self.streak);
                self.score += POINTS_PER_CORRECT;
                if let Some(reward) = reward {
                    self.gems_collected += 1;
                    self.gem_tally_by_tier.add(reward.tier);
                    self.xp_earned += reward.xp;
                }
                push_unique(&mut self.words_learned, word_id);
            }
            Tally::Incorrect => {
                self.incorrect_count += 1;
                self.streak = 0;
                push_unique(&mut self.words_struggling, word_id);
            }
            Tally::Shown => {
                self.shown_count += 1;
                push_unique(&mut self.words_struggling, word_id);
            }
        }
    }

    /// Clear per-word flags before presenting the word at `index`
    pub fn present(&mut self, index: usize, mode: Mode, exercise: ExerciseData) {
        self.current_index = index;
        self.current_mode = mode;
        self.time_left_secs = exercise.time_limit_secs();
        self.exercise = Some(exercise);
        self.show_answer = false;
        self.translation_shown = false;
        self.pending_advance = None;
        self.audio_replays = 0;
        self.phase = Phase::Presenting;
    }

    pub fn accepts_input(&self) -> bool {
        self.phase == Phase::Presenting && !self.show_answer
    }
}

pub fn feedback(tally: Tally, validation: Validation, user_input: &str, correct_answer: &str) -> String {
    match tally {
        Tally::Shown => "Translation was shown - practice more!".to_string(),
        Tally::Correct if validation.accent_mismatch_only => {
            format!("Correct! Remember the accents: {correct_answer}")
        }
        Tally::Correct => "Correct!".to_string(),
        Tally::Incorrect
            if !user_input.trim().is_empty()
                && similarity(user_input, correct_answer) >= NEAR_MISS_SIMILARITY =>
        {
            format!("Almost! The answer is: {correct_answer}")
        }
        Tally::Incorrect => format!("Incorrect. The answer is: {correct_answer}"),
    }
}

fn push_unique(list: &mut Vec<String>, word_id: &str) {
    if !list.iter().any(|id| id == word_id) {
        list.push(word_id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexigem_algo::GemTier;
    use proptest::prelude::*;

    fn reward(tier: GemTier) -> Option<Reward> {
        Some(Reward { tier, xp: 10 })
    }

    #[test]
    fn test_streak_sequence() {
        let mut state = SessionState::new(Mode::Typing);
        let mut streaks = Vec::new();
        for tally in [
            Tally::Correct,
            Tally::Correct,
            Tally::Shown,
            Tally::Incorrect,
            Tally::Correct,
        ] {
            let reward = if tally == Tally::Correct { reward(GemTier::Common) } else { None };
            state.apply("w", tally, reward);
            streaks.push(state.streak);
        }
        assert_eq!(streaks, vec![1, 2, 2, 0, 1]);
        assert_eq!(state.max_streak, 2);
        assert_eq!(state.correct_count, 3);
        assert_eq!(state.incorrect_count, 1);
        assert_eq!(state.shown_count, 1);
        assert_eq!(state.score, 30);
    }

    #[test]
    fn test_gem_tally_and_word_lists() {
        let mut state = SessionState::new(Mode::Typing);
        state.apply("a", Tally::Correct, reward(GemTier::Rare));
        state.apply("b", Tally::Incorrect, None);
        state.apply("c", Tally::Shown, None);
        assert_eq!(state.gems_collected, 1);
        assert_eq!(state.gem_tally_by_tier.get(GemTier::Rare), 1);
        assert_eq!(state.words_learned, vec!["a"]);
        assert_eq!(state.words_struggling, vec!["b", "c"]);
    }

    #[test]
    fn test_tally_of() {
        assert_eq!(Tally::of(Validation::EXACT, true), Tally::Shown);
        assert_eq!(Tally::of(Validation::EXACT, false), Tally::Correct);
        assert_eq!(Tally::of(Validation::INCORRECT, false), Tally::Incorrect);
    }

    #[test]
    fn test_feedback_messages() {
        assert_eq!(feedback(Tally::Correct, Validation::EXACT, "dog", "dog"), "Correct!");
        let accent = Validation {
            is_correct: true,
            accent_mismatch_only: true,
        };
        assert_eq!(
            feedback(Tally::Correct, accent, "cafe", "café"),
            "Correct! Remember the accents: café"
        );
        assert_eq!(
            feedback(Tally::Incorrect, Validation::INCORRECT, "hous", "house"),
            "Almost! The answer is: house"
        );
        assert_eq!(
            feedback(Tally::Incorrect, Validation::INCORRECT, "", "house"),
            "Incorrect. The answer is: house"
        );
        assert_eq!(
            feedback(Tally::Shown, Validation::EXACT, "house", "house"),
            "Translation was shown - practice more!"
        );
    }

    fn arb_tally() -> impl Strategy<Value = Tally> {
        prop_oneof![Just(Tally::Correct), Just(Tally::Incorrect), Just(Tally::Shown)]
    }

    proptest! {
        #[test]
        fn tallies_respect_counting_rules(tallies in prop::collection::vec(arb_tally(), 0..40)) {
            let mut state = SessionState::new(Mode::Typing);
            let mut expected_streak = 0u32;
            for (turn, tally) in tallies.iter().enumerate() {
                let reward = (*tally == Tally::Correct).then(|| Reward { tier: GemTier::Common, xp: 10 });
                state.apply(&format!("w{turn}"), *tally, reward);

                expected_streak = match tally {
                    Tally::Correct => expected_streak + 1,
                    Tally::Incorrect => 0,
                    Tally::Shown => expected_streak,
                };
                prop_assert_eq!(state.streak, expected_streak);
                prop_assert!(state.streak <= state.max_streak);
                prop_assert!(state.correct_count + state.incorrect_count <= turn as u32 + 1);
            }
            prop_assert_eq!(state.gems_collected, state.correct_count);
            prop_assert_eq!(state.score, state.correct_count * POINTS_PER_CORRECT);
        }
    }
}
