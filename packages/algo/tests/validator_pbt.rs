//! Property-Based Tests for the Answer Validator
//!
//! Tests the following invariants:
//! - Reflexivity: every answer validates against itself exactly
//! - Accent insensitivity: stripping diacritics never turns a match into a miss
//! - Order insensitivity: the order of delimited alternatives does not matter
//! - Number equivalence: digits and number words agree for 0-99 in both languages

use proptest::prelude::*;

use lexigem_algo::validator::numbers::number_value;
use lexigem_algo::{validate, validate_with, Validation, ValidatorOptions};

// ============================================================================
// Arbitrary Generators
// ============================================================================

const EN_UNITS: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];
const EN_TENS: [&str; 8] = [
    "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];
const ES_UNITS: [&str; 30] = [
    "cero", "uno", "dos", "tres", "cuatro", "cinco", "seis", "siete", "ocho", "nueve", "diez",
    "once", "doce", "trece", "catorce", "quince", "dieciséis", "diecisiete", "dieciocho",
    "diecinueve", "veinte", "veintiuno", "veintidós", "veintitrés", "veinticuatro",
    "veinticinco", "veintiséis", "veintisiete", "veintiocho", "veintinueve",
];
const ES_TENS: [&str; 7] = [
    "treinta", "cuarenta", "cincuenta", "sesenta", "setenta", "ochenta", "noventa",
];

fn english_word(n: usize, separator: &str) -> String {
    match n {
        0..=19 => EN_UNITS[n].to_string(),
        _ if n % 10 == 0 => EN_TENS[n / 10 - 2].to_string(),
        _ => format!("{}{separator}{}", EN_TENS[n / 10 - 2], EN_UNITS[n % 10]),
    }
}

fn spanish_word(n: usize) -> String {
    match n {
        0..=29 => ES_UNITS[n].to_string(),
        _ if n % 10 == 0 => ES_TENS[n / 10 - 3].to_string(),
        _ => format!("{} y {}", ES_TENS[n / 10 - 3], ES_UNITS[n % 10]),
    }
}

/// A lower-case word that is not one of the alternative separator words
fn arb_word() -> impl Strategy<Value = String> {
    "[a-z]{2,10}".prop_filter("separator word", |w| w != "and" && w != "or")
}

fn accented(c: char) -> char {
    match c {
        'a' => 'á',
        'e' => 'é',
        'i' => 'í',
        'o' => 'ó',
        'u' => 'ú',
        'n' => 'ñ',
        other => other,
    }
}

fn arb_delimiter() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(", "), Just(" / "), Just("; "), Just(" | ")]
}

fn spanish() -> ValidatorOptions {
    ValidatorOptions {
        allow_synonyms: false,
        language: "es".to_string(),
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn validate_is_reflexive(word in arb_word()) {
        prop_assert_eq!(validate(&word, &word), Validation::EXACT);
    }

    #[test]
    fn validate_ignores_case_and_surrounding_punctuation(word in arb_word()) {
        let shouted = format!("  {}! ", word.to_uppercase());
        prop_assert!(validate(&shouted, &word).is_correct);
    }

    #[test]
    fn validate_is_accent_insensitive(word in arb_word(), mask in prop::collection::vec(any::<bool>(), 10)) {
        let with_accents: String = word
            .chars()
            .zip(mask.iter().cycle())
            .map(|(c, accent)| if *accent { accented(c) } else { c })
            .collect();

        let verdict = validate_with(&word, &with_accents, &spanish());
        prop_assert!(verdict.is_correct);
        prop_assert_eq!(verdict.accent_mismatch_only, with_accents != word);
    }

    #[test]
    fn validate_ignores_alternative_order(
        first in arb_word(),
        second in arb_word(),
        other in arb_word(),
        delimiter in arb_delimiter(),
    ) {
        let forward = format!("{first}{delimiter}{second}");
        let backward = format!("{second}{delimiter}{first}");

        for input in [&first, &second, &other] {
            prop_assert_eq!(
                validate(input, &forward).is_correct,
                validate(input, &backward).is_correct
            );
        }
        prop_assert!(validate(&first, &backward).is_correct);
        prop_assert!(validate(&second, &forward).is_correct);
    }

    #[test]
    fn wrong_single_answer_is_rejected(word in arb_word(), other in arb_word()) {
        prop_assume!(word != other);
        prop_assume!(number_value(&word).is_none() || number_value(&other).is_none());
        prop_assert!(!validate(&word, &other).is_correct);
    }

    #[test]
    fn number_words_match_digits(n in 0usize..100) {
        let digits = n.to_string();

        for word in [english_word(n, " "), english_word(n, "-"), spanish_word(n)] {
            prop_assert!(validate(&word, &digits).is_correct, "{} vs {}", word, digits);
            prop_assert!(validate(&digits, &word).is_correct, "{} vs {}", digits, word);
        }
        prop_assert!(!validate(&english_word((n + 1) % 100, " "), &digits).is_correct);
    }
}
