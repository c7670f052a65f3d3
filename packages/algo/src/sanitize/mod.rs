//! Text Sanitization
//!
//! Normalization applied to learner input and canonical answers before any
//! comparison.
//!
//! Functions:
//! - Quote normalization (curly -> straight)
//! - Removal of bracketed / parenthetical annotations
//! - Punctuation stripping and whitespace collapsing
//! - Diacritic removal (NFD, combining marks dropped)

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Punctuation removed anywhere in an answer. Apostrophes and hyphens are kept
/// because they belong to words ("don't", "twenty-one").
const STRIPPED_PUNCTUATION: &[char] = &[
    '¿', '¡', '?', '!', '.', ',', ';', ':', '"', '«', '»', '…', '(', ')', '[', ']', '{', '}',
];

/// Replace typographic quotes with their ASCII forms
pub fn normalize_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' | '`' | '´' => '\'',
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' => '"',
            other => other,
        })
        .collect()
}

/// Drop `( ... )` and `[ ... ]` segments, keeping the text around them
pub fn strip_annotations(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' | '[' => {
                depth += 1;
                out.push(' ');
            }
            ')' | ']' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Collapse runs of whitespace into single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Full cleaning pipeline for one answer form
pub fn clean_answer(text: &str) -> String {
    let quoted = normalize_quotes(text);
    let bare = strip_annotations(&quoted).to_lowercase();
    let stripped: String = bare
        .chars()
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .collect();
    let collapsed = collapse_whitespace(&stripped);
    collapsed
        .trim_matches(|c: char| c == '\'' || c == '-')
        .trim()
        .to_string()
}

/// Remove diacritics: decompose to NFD and drop combining marks (ñ -> n)
pub fn remove_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// True for non-empty ASCII digit strings
pub fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}
