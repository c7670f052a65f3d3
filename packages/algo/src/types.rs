//! Common Types and Constants
//!
//! Shared data structures used across all practice modules.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Highest mastery level a word can reach (maps to `GemTier::Legendary`)
pub const MAX_MASTERY_LEVEL: u8 = 4;

/// Number of options in a multiple-choice exercise
pub const MULTIPLE_CHOICE_OPTIONS: usize = 4;

/// Number of pairs in a matching exercise (active word included)
pub const MATCH_PAIRS: usize = 4;

/// Marker that replaces the target word in a cloze sentence
pub const BLANK_MARKER: &str = "____";

/// Distractors used when the active word list is too small
pub const GENERIC_DISTRACTORS: &[&str] = &[
    "house", "water", "friend", "book", "school", "time", "day", "city",
];

/// Flashcard self-assessment inputs that count as a correct answer
pub const FLASHCARD_KNOWN_INPUTS: &[&str] = &["correct", "known", "easy"];

// ==================== Gem Tiers ====================

/// Reward rank of an attempt, isomorphic to mastery level 0..=4
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GemTier {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl GemTier {
    pub const ALL: [GemTier; 5] = [
        GemTier::Common,
        GemTier::Uncommon,
        GemTier::Rare,
        GemTier::Epic,
        GemTier::Legendary,
    ];

    /// Tier for a mastery level, saturating at `Legendary`
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => GemTier::Common,
            1 => GemTier::Uncommon,
            2 => GemTier::Rare,
            3 => GemTier::Epic,
            _ => GemTier::Legendary,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            GemTier::Common => 0,
            GemTier::Uncommon => 1,
            GemTier::Rare => 2,
            GemTier::Epic => 3,
            GemTier::Legendary => 4,
        }
    }

    /// Move `delta` tiers up or down, clamped to the valid range
    pub fn shifted(self, delta: i8) -> Self {
        let level = (self.level() as i8 + delta).clamp(0, MAX_MASTERY_LEVEL as i8);
        GemTier::from_level(level as u8)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GemTier::Common => "common",
            GemTier::Uncommon => "uncommon",
            GemTier::Rare => "rare",
            GemTier::Epic => "epic",
            GemTier::Legendary => "legendary",
        }
    }
}

/// Gems earned per tier
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GemTally {
    pub common: u32,
    pub uncommon: u32,
    pub rare: u32,
    pub epic: u32,
    pub legendary: u32,
}

impl GemTally {
    pub fn add(&mut self, tier: GemTier) {
        *self.slot_mut(tier) += 1;
    }

    pub fn get(&self, tier: GemTier) -> u32 {
        match tier {
            GemTier::Common => self.common,
            GemTier::Uncommon => self.uncommon,
            GemTier::Rare => self.rare,
            GemTier::Epic => self.epic,
            GemTier::Legendary => self.legendary,
        }
    }

    pub fn total(&self) -> u32 {
        GemTier::ALL.iter().map(|tier| self.get(*tier)).sum()
    }

    fn slot_mut(&mut self, tier: GemTier) -> &mut u32 {
        match tier {
            GemTier::Common => &mut self.common,
            GemTier::Uncommon => &mut self.uncommon,
            GemTier::Rare => &mut self.rare,
            GemTier::Epic => &mut self.epic,
            GemTier::Legendary => &mut self.legendary,
        }
    }
}

// ==================== Modes ====================

/// Presentation mode of an exercise
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Learn,
    Recall,
    Typing,
    Dictation,
    Listening,
    Cloze,
    MultipleChoice,
    Match,
    Flashcards,
    Speed,
    Mixed,
}

/// Mode name that matches no practice mode
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown practice mode: {0}")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "learn" => Ok(Mode::Learn),
            "recall" => Ok(Mode::Recall),
            "typing" => Ok(Mode::Typing),
            "dictation" => Ok(Mode::Dictation),
            "listening" => Ok(Mode::Listening),
            "cloze" => Ok(Mode::Cloze),
            "multiple_choice" | "multiple-choice" => Ok(Mode::MultipleChoice),
            "match" => Ok(Mode::Match),
            "flashcards" => Ok(Mode::Flashcards),
            "speed" => Ok(Mode::Speed),
            "mixed" => Ok(Mode::Mixed),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Learn => "learn",
            Mode::Recall => "recall",
            Mode::Typing => "typing",
            Mode::Dictation => "dictation",
            Mode::Listening => "listening",
            Mode::Cloze => "cloze",
            Mode::MultipleChoice => "multiple_choice",
            Mode::Match => "match",
            Mode::Flashcards => "flashcards",
            Mode::Speed => "speed",
            Mode::Mixed => "mixed",
        }
    }
}

// ==================== Vocabulary ====================

/// A word as loaded from the corpus; never mutated during a session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyWord {
    pub id: String,
    pub source_text: String,
    pub target_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_sentence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    #[serde(default)]
    pub mastery_level: u8,
}

impl VocabularyWord {
    pub fn new(
        id: impl Into<String>,
        source_text: impl Into<String>,
        target_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_text: source_text.into(),
            target_text: target_text.into(),
            example_sentence: None,
            example_translation: None,
            audio_ref: None,
            part_of_speech: None,
            mastery_level: 0,
        }
    }
}

/// Corpus sentence in the source language
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentence {
    pub text: String,
    #[serde(default)]
    pub translation: Option<String>,
}

// ==================== Exercises ====================

/// One multiple-choice option
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOption {
    pub id: usize,
    pub text: String,
    pub is_correct: bool,
}

/// Fill-in-the-blank payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClozePayload {
    pub source_sentence: String,
    pub blanked_sentence: String,
    pub translation: String,
    /// Inflected instance exactly as it appears in the sentence
    pub target_word: String,
    /// Token index of the blank within the sentence
    pub word_position: usize,
    /// True when the sentence was synthesized instead of found in the corpus
    pub synthesized: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPayload {
    pub sources: Vec<String>,
    /// Translations in shuffled order
    pub targets: Vec<String>,
}

/// Mode-specific part of an exercise
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExercisePayload {
    Plain { prompt: String },
    MultipleChoice { options: Vec<ChoiceOption> },
    Cloze(ClozePayload),
    Match(MatchPayload),
    Flashcard { front: String, back: String },
    Timed { prompt: String, time_limit_secs: u32 },
}

/// Exercise for one (word, mode) pair; discarded on advancement
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseData {
    /// Mode actually presented (`Mixed` is resolved before generation)
    pub mode: Mode,
    pub correct_answer: String,
    pub payload: ExercisePayload,
}

impl ExerciseData {
    pub fn time_limit_secs(&self) -> Option<u32> {
        match &self.payload {
            ExercisePayload::Timed { time_limit_secs, .. } => Some(*time_limit_secs),
            _ => None,
        }
    }

    pub fn options(&self) -> &[ChoiceOption] {
        match &self.payload {
            ExercisePayload::MultipleChoice { options } => options,
            _ => &[],
        }
    }

    pub fn cloze(&self) -> Option<&ClozePayload> {
        match &self.payload {
            ExercisePayload::Cloze(cloze) => Some(cloze),
            _ => None,
        }
    }
}

// ==================== Attempts ====================

/// Verdict of the answer validator
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    pub is_correct: bool,
    /// Correct only after diacritics were ignored
    pub accent_mismatch_only: bool,
}

impl Validation {
    pub const INCORRECT: Validation = Validation {
        is_correct: false,
        accent_mismatch_only: false,
    };

    pub const EXACT: Validation = Validation {
        is_correct: true,
        accent_mismatch_only: false,
    };
}

/// Identity of a submission, used to drop duplicate deliveries
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptKey {
    pub word_index: usize,
    pub raw_input: String,
    pub response_time_ms: u64,
}

/// Everything known about one attempt at submission time
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptContext {
    pub word_index: usize,
    pub word_id: String,
    pub mode: Mode,
    pub raw_input: String,
    pub response_time_ms: u64,
    pub hint_used: bool,
    pub current_streak: u32,
    pub prior_mastery_level: u8,
}

impl AttemptContext {
    pub fn key(&self) -> AttemptKey {
        AttemptKey {
            word_index: self.word_index,
            raw_input: self.raw_input.clone(),
            response_time_ms: self.response_time_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gem_tier_level_roundtrip() {
        for level in 0..=MAX_MASTERY_LEVEL {
            assert_eq!(GemTier::from_level(level).level(), level);
        }
        assert_eq!(GemTier::from_level(9), GemTier::Legendary);
    }

    #[test]
    fn test_gem_tier_ordering() {
        assert!(GemTier::Common < GemTier::Uncommon);
        assert!(GemTier::Epic < GemTier::Legendary);
        assert_eq!(GemTier::Legendary.shifted(1), GemTier::Legendary);
        assert_eq!(GemTier::Common.shifted(-1), GemTier::Common);
        assert_eq!(GemTier::Rare.shifted(-1), GemTier::Uncommon);
    }

    #[test]
    fn test_gem_tally() {
        let mut tally = GemTally::default();
        tally.add(GemTier::Rare);
        tally.add(GemTier::Rare);
        tally.add(GemTier::Legendary);
        assert_eq!(tally.get(GemTier::Rare), 2);
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("multiple_choice".parse::<Mode>(), Ok(Mode::MultipleChoice));
        assert_eq!("Speed".parse::<Mode>(), Ok(Mode::Speed));
        assert_eq!(
            "karaoke".parse::<Mode>(),
            Err(UnknownMode("karaoke".to_string()))
        );
        assert_eq!(
            UnknownMode("karaoke".to_string()).to_string(),
            "unknown practice mode: karaoke"
        );
        for mode in [Mode::Cloze, Mode::Match, Mode::Mixed] {
            assert_eq!(mode.as_str().parse::<Mode>(), Ok(mode));
        }
    }

    #[test]
    fn test_exercise_payload_serializes_tagged() {
        let exercise = ExerciseData {
            mode: Mode::Flashcards,
            correct_answer: "house".to_string(),
            payload: ExercisePayload::Flashcard {
                front: "casa".to_string(),
                back: "house".to_string(),
            },
        };
        let json = serde_json::to_value(&exercise).unwrap();
        assert_eq!(json["payload"]["type"], "flashcard");
        assert_eq!(json["correctAnswer"], "house");
    }
}
