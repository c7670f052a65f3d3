//! Mode Dispatch
//!
//! One table maps every presentation mode to how its exercise is built, which
//! side of the word is the canonical answer and how the answer is checked.
//! The session state machine consults this table and never branches on modes
//! itself.

use serde::{Deserialize, Serialize};

use crate::types::{ClozePayload, Mode, VocabularyWord};

/// Modes cycled through by `Mode::Mixed`, indexed by word position
pub const MIXED_ROTATION: [Mode; 5] = [
    Mode::MultipleChoice,
    Mode::Typing,
    Mode::Listening,
    Mode::Cloze,
    Mode::Flashcards,
];

/// Bounds of the per-word time limit in timed modes (seconds)
pub const MIN_WORD_TIME_SECS: u32 = 3;
pub const MAX_WORD_TIME_SECS: u32 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExerciseKind {
    Plain,
    MultipleChoice,
    Cloze,
    Match,
    Flashcard,
    Timed,
}

/// Which text of the word the learner must produce
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerSide {
    Source,
    Target,
    /// The inflected instance found in the cloze sentence
    ClozeInstance,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerCheck {
    /// Tolerant free-text validation
    FreeText,
    /// Selection among generated options, compared strictly
    Choice,
    /// Learner self-assessment ("known"), or a typed answer
    SelfAssessed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeStrategy {
    pub exercise: ExerciseKind,
    pub answer: AnswerSide,
    pub check: AnswerCheck,
    /// Trigger audio when the word is presented
    pub plays_audio: bool,
    /// Higher-effort production mode; nudges the reward down
    pub effortful: bool,
}

pub fn strategy(mode: Mode) -> ModeStrategy {
    use AnswerCheck::*;
    use AnswerSide::*;
    use ExerciseKind::*;

    let (exercise, answer, check, plays_audio, effortful) = match mode {
        Mode::Learn | Mode::Recall => (Plain, Target, FreeText, false, false),
        Mode::Typing => (Plain, Target, FreeText, false, true),
        Mode::Dictation => (Plain, Source, FreeText, true, true),
        Mode::Listening => (Plain, Target, FreeText, true, false),
        Mode::Cloze => (Cloze, ClozeInstance, FreeText, false, false),
        Mode::MultipleChoice => (MultipleChoice, Target, Choice, false, false),
        Mode::Match => (Match, Target, Choice, false, false),
        Mode::Flashcards => (Flashcard, Target, SelfAssessed, false, false),
        Mode::Speed => (Timed, Target, FreeText, true, false),
        Mode::Mixed => return strategy(MIXED_ROTATION[0]),
    };

    ModeStrategy {
        exercise,
        answer,
        check,
        plays_audio,
        effortful,
    }
}

/// Concrete mode presented for the word at `word_index`
pub fn resolve_mode(mode: Mode, word_index: usize) -> Mode {
    match mode {
        Mode::Mixed => MIXED_ROTATION[word_index % MIXED_ROTATION.len()],
        other => other,
    }
}

/// Canonical answer for a word in a mode; must be resolved before validating
pub fn canonical_answer(mode: Mode, word: &VocabularyWord, cloze: Option<&ClozePayload>) -> String {
    match strategy(mode).answer {
        AnswerSide::Source => word.source_text.clone(),
        AnswerSide::Target => word.target_text.clone(),
        AnswerSide::ClozeInstance => cloze
            .map(|c| c.target_word.clone())
            .unwrap_or_else(|| word.source_text.clone()),
    }
}

/// Instruction text for a mode
pub fn instruction(mode: Mode) -> &'static str {
    match mode {
        Mode::Dictation => "Listen and type what you hear",
        Mode::Listening => "Listen and type the translation",
        Mode::Cloze => "Fill in the missing word",
        Mode::Match => "Match words with translations",
        Mode::Speed => "Speed challenge",
        Mode::MultipleChoice => "Choose the correct translation",
        Mode::Flashcards => "Do you know this word?",
        _ => "Translate this word",
    }
}

/// Time allowed for one word in a timed mode, from its complexity
pub fn word_time_limit(word: &VocabularyWord) -> u32 {
    let translation_len = word.target_text.chars().count();
    let mut secs = 3 + match translation_len {
        0..=5 => 1,
        6..=10 => 2,
        11..=15 => 3,
        _ => 4,
    };

    if word
        .source_text
        .chars()
        .any(|c| "ñÑáéíóúüÁÉÍÓÚÜ".contains(c))
    {
        secs += 1;
    }
    if word.source_text.trim().contains(' ') || word.target_text.trim().contains(' ') {
        secs += 1;
    }

    secs.clamp(MIN_WORD_TIME_SECS, MAX_WORD_TIME_SECS)
}
