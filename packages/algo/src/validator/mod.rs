//! Answer Validation
//!
//! Compares a learner's free-text answer with the canonical answer under
//! linguistic tolerance rules:
//!
//! - Punctuation, bracketed annotations and case are ignored
//! - Accents are a soft requirement: an accent-only difference is accepted
//!   but flagged with `accent_mismatch_only`
//! - The canonical answer may list alternatives (`a, b`, `a / b`, `a or b`, ...)
//! - Contractions are expanded on both sides ("I'm" == "I am")
//! - Number words and digits are interchangeable (English and Spanish, 0-99)
//! - Optional British -> American spelling normalization and synonyms

pub mod lexicon;
pub mod numbers;

use serde::{Deserialize, Serialize};

use crate::modes::{strategy, AnswerCheck};
use crate::sanitize::{clean_answer, remove_accents};
use crate::types::{Mode, Validation, FLASHCARD_KNOWN_INPUTS};

use self::lexicon::{expand_contractions, normalize_regional, synonyms};
use self::numbers::same_number;

/// Characters that separate alternatives inside one answer string
const ALTERNATIVE_DELIMITERS: &[char] = &[',', '|', ';', '/'];

/// Words that separate alternatives inside one answer string
const ALTERNATIVE_WORDS: &[&str] = &["and", "or"];

/// Similarity above which an incorrect answer counts as "almost"
pub const NEAR_MISS_SIMILARITY: f64 = 0.8;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorOptions {
    /// Accept listed synonyms of each alternative
    pub allow_synonyms: bool,
    /// Language of the canonical answer (drives synonyms and regional spelling)
    pub language: String,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            allow_synonyms: false,
            language: "en".to_string(),
        }
    }
}

/// Validate with default options (no synonyms, English spelling rules)
pub fn validate(user_input: &str, canonical_answer: &str) -> Validation {
    validate_with(user_input, canonical_answer, &ValidatorOptions::default())
}

pub fn validate_with(
    user_input: &str,
    canonical_answer: &str,
    options: &ValidatorOptions,
) -> Validation {
    let user = normalize_form(user_input, options);
    if user.is_empty() {
        return Validation::INCORRECT;
    }

    let accepted = acceptable_forms(canonical_answer, options);
    if accepted.is_empty() {
        return Validation::INCORRECT;
    }

    if let Some(verdict) = match_form(&user, &accepted) {
        return verdict;
    }

    // The learner may have typed several of the alternatives at once.
    let parts = split_alternatives(user_input);
    if parts.len() > 1 {
        let mut accent_mismatch_only = false;
        for part in &parts {
            let form = normalize_form(part, options);
            match match_form(&form, &accepted) {
                Some(verdict) => accent_mismatch_only |= verdict.accent_mismatch_only,
                None => return Validation::INCORRECT,
            }
        }
        return Validation {
            is_correct: true,
            accent_mismatch_only,
        };
    }

    Validation::INCORRECT
}

/// Validate using the answer check configured for `mode`
pub fn validate_for_mode(
    mode: Mode,
    user_input: &str,
    canonical_answer: &str,
    options: &ValidatorOptions,
) -> Validation {
    match strategy(mode).check {
        AnswerCheck::FreeText => validate_with(user_input, canonical_answer, options),
        AnswerCheck::Choice => {
            let chosen = clean_answer(user_input);
            if !chosen.is_empty() && chosen == clean_answer(canonical_answer) {
                Validation::EXACT
            } else {
                Validation::INCORRECT
            }
        }
        AnswerCheck::SelfAssessed => {
            let input = user_input.trim().to_lowercase();
            if FLASHCARD_KNOWN_INPUTS.contains(&input.as_str()) {
                Validation::EXACT
            } else {
                validate_with(user_input, canonical_answer, options)
            }
        }
    }
}

/// Normalized Levenshtein similarity in [0, 1] ignoring case and accents
pub fn similarity(a: &str, b: &str) -> f64 {
    let left: Vec<char> = remove_accents(&clean_answer(a)).chars().collect();
    let right: Vec<char> = remove_accents(&clean_answer(b)).chars().collect();
    let longest = left.len().max(right.len());
    if longest == 0 {
        return 1.0;
    }
    let distance = levenshtein(&left, &right);
    (longest - distance) as f64 / longest as f64
}

/// Every normalized form accepted for a canonical answer string
pub fn acceptable_forms(canonical_answer: &str, options: &ValidatorOptions) -> Vec<String> {
    let mut forms: Vec<String> = Vec::new();
    let mut push = |form: String| {
        if !form.is_empty() && !forms.contains(&form) {
            forms.push(form);
        }
    };

    push(normalize_form(canonical_answer, options));

    for part in split_alternatives(canonical_answer) {
        if let Some((prefix, main)) = optional_prefix(&part) {
            push(normalize_form(&format!("{prefix} {main}"), options));
            push(normalize_form(main, options));
        }
        push(normalize_form(&part, options));

        if options.allow_synonyms {
            let headword = remove_accents(&clean_answer(&part));
            for synonym in synonyms(&headword, &options.language) {
                push(normalize_form(synonym, options));
            }
        }
    }

    forms
}

/// Split an answer string on delimiter characters and on standalone "and"/"or"
pub fn split_alternatives(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    for chunk in text.split(ALTERNATIVE_DELIMITERS) {
        let mut current: Vec<&str> = Vec::new();
        for token in chunk.split_whitespace() {
            if ALTERNATIVE_WORDS.contains(&token.to_lowercase().as_str()) {
                if !current.is_empty() {
                    parts.push(current.join(" "));
                    current.clear();
                }
            } else {
                current.push(token);
            }
        }
        if !current.is_empty() {
            parts.push(current.join(" "));
        }
    }
    parts
}

fn normalize_form(text: &str, options: &ValidatorOptions) -> String {
    let cleaned = expand_contractions(&clean_answer(text));
    if options.language == "en" {
        normalize_regional(&cleaned)
    } else {
        cleaned
    }
}

/// `(to) recycle` -> Some(("to", "recycle"))
fn optional_prefix(text: &str) -> Option<(&str, &str)> {
    let rest = text.trim().strip_prefix('(')?;
    let (inner, main) = rest.split_once(')')?;
    let main = main.trim();
    if inner.trim().is_empty() || main.is_empty() {
        return None;
    }
    Some((inner.trim(), main))
}

fn match_form(user: &str, accepted: &[String]) -> Option<Validation> {
    if accepted.iter().any(|form| form == user) {
        return Some(Validation::EXACT);
    }

    let bare_user = remove_accents(user);
    if accepted.iter().any(|form| remove_accents(form) == bare_user) {
        return Some(Validation {
            is_correct: true,
            accent_mismatch_only: true,
        });
    }

    if accepted.iter().any(|form| same_number(form, user)) {
        return Some(Validation::EXACT);
    }

    None
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    let mut costs: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut previous = costs[0];
        costs[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let current = costs[j + 1];
            costs[j + 1] = if ca == cb {
                previous
            } else {
                1 + previous.min(current).min(costs[j])
            };
            previous = current;
        }
    }
    costs[b.len()]
}
