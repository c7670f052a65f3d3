//! Exercise Payload Builders
//!
//! Pure constructors for mode-specific payloads. Randomness is always taken
//! from the caller's RNG so tests can seed it.

use rand::seq::SliceRandom;
use rand::Rng;
use regex::RegexBuilder;

use crate::sanitize::clean_answer;
use crate::types::{
    ChoiceOption, ClozePayload, MatchPayload, Sentence, VocabularyWord, BLANK_MARKER,
    GENERIC_DISTRACTORS, MATCH_PAIRS, MULTIPLE_CHOICE_OPTIONS,
};

/// Four shuffled options, exactly one correct, no duplicate texts
pub fn multiple_choice_options<R: Rng + ?Sized>(
    word: &VocabularyWord,
    pool: &[VocabularyWord],
    rng: &mut R,
) -> Vec<ChoiceOption> {
    let correct = word.target_text.trim().to_string();
    let mut seen = vec![clean_answer(&correct)];
    let mut distractors: Vec<String> = Vec::with_capacity(MULTIPLE_CHOICE_OPTIONS - 1);

    let mut candidates: Vec<&str> = pool
        .iter()
        .filter(|other| other.id != word.id)
        .map(|other| other.target_text.trim())
        .collect();
    candidates.shuffle(rng);

    let mut generic: Vec<&str> = GENERIC_DISTRACTORS.to_vec();
    generic.shuffle(rng);

    for text in candidates.into_iter().chain(generic) {
        if distractors.len() == MULTIPLE_CHOICE_OPTIONS - 1 {
            break;
        }
        let key = clean_answer(text);
        if key.is_empty() || seen.contains(&key) {
            continue;
        }
        seen.push(key);
        distractors.push(text.to_string());
    }

    let mut texts = Vec::with_capacity(MULTIPLE_CHOICE_OPTIONS);
    texts.push(correct.clone());
    texts.extend(distractors);
    texts.shuffle(rng);

    texts
        .into_iter()
        .enumerate()
        .map(|(id, text)| ChoiceOption {
            id,
            is_correct: text == correct,
            text,
        })
        .collect()
}

/// Byte range of the first case-insensitive whole-word occurrence of `word`
pub fn find_whole_word(text: &str, word: &str) -> Option<(usize, usize)> {
    let word = word.trim();
    if word.is_empty() {
        return None;
    }
    let pattern = format!(r"\b{}\b", regex::escape(word));
    let re = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .ok()?;
    re.find(text).map(|m| (m.start(), m.end()))
}

/// Blank the first whole-word occurrence of the word in `sentence`
pub fn build_cloze(word: &VocabularyWord, sentence: &Sentence) -> Option<ClozePayload> {
    let (start, end) = find_whole_word(&sentence.text, &word.source_text)?;
    let target_word = sentence.text[start..end].to_string();
    let blanked_sentence = format!(
        "{}{}{}",
        &sentence.text[..start],
        BLANK_MARKER,
        &sentence.text[end..]
    );

    Some(ClozePayload {
        source_sentence: sentence.text.clone(),
        blanked_sentence,
        translation: sentence
            .translation
            .clone()
            .unwrap_or_else(|| word.target_text.clone()),
        target_word,
        word_position: sentence.text[..start].split_whitespace().count(),
        synthesized: false,
    })
}

/// Pick one usable candidate at random
pub fn pick_cloze<R: Rng + ?Sized>(
    word: &VocabularyWord,
    candidates: &[Sentence],
    rng: &mut R,
) -> Option<ClozePayload> {
    let usable: Vec<ClozePayload> = candidates
        .iter()
        .filter_map(|sentence| build_cloze(word, sentence))
        .collect();
    usable.choose(rng).cloned()
}

/// Minimal sentence used when the corpus has nothing for the word
pub fn synthesized_cloze(word: &VocabularyWord, language: &str) -> ClozePayload {
    let language = language_name(language);
    let sentence = format!("This word is {} in {}.", word.source_text, language);
    ClozePayload {
        blanked_sentence: format!("This word is {} in {}.", BLANK_MARKER, language),
        source_sentence: sentence,
        translation: word.target_text.clone(),
        target_word: word.source_text.clone(),
        word_position: 3,
        synthesized: true,
    }
}

/// Up to `MATCH_PAIRS` pairs including `word`, translations shuffled
pub fn match_payload<R: Rng + ?Sized>(
    word: &VocabularyWord,
    pool: &[VocabularyWord],
    rng: &mut R,
) -> MatchPayload {
    let mut others: Vec<&VocabularyWord> = pool.iter().filter(|w| w.id != word.id).collect();
    others.shuffle(rng);

    let mut chosen = vec![word];
    let mut seen = vec![clean_answer(&word.target_text)];
    for other in others {
        if chosen.len() == MATCH_PAIRS {
            break;
        }
        let key = clean_answer(&other.target_text);
        if key.is_empty() || seen.contains(&key) {
            continue;
        }
        seen.push(key);
        chosen.push(other);
    }

    let sources = chosen.iter().map(|w| w.source_text.clone()).collect();
    let mut targets: Vec<String> = chosen.iter().map(|w| w.target_text.clone()).collect();
    targets.shuffle(rng);

    MatchPayload { sources, targets }
}

pub fn language_name(code: &str) -> &str {
    match code {
        "es" => "Spanish",
        "fr" => "French",
        "de" => "German",
        "it" => "Italian",
        "pt" => "Portuguese",
        "en" => "English",
        other => other,
    }
}
