//! Number-word <-> digit equivalence for English and Spanish, 0 to 99 (plus 100).
//!
//! Keys are stored lower-case, accent-free and space separated; lookups
//! normalize hyphens to spaces so "twenty-four" and "twenty four" agree.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::sanitize::{collapse_whitespace, is_digits, remove_accents};

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
    "once", "doce", "trece", "catorce", "quince", "dieciseis", "diecisiete", "dieciocho",
    "diecinueve", "veinte", "veintiuno", "veintidos", "veintitres", "veinticuatro",
    "veinticinco", "veintiseis", "veintisiete", "veintiocho", "veintinueve",
];

const ES_TENS: [&str; 7] = [
    "treinta", "cuarenta", "cincuenta", "sesenta", "setenta", "ochenta", "noventa",
];

static NUMBER_WORDS: LazyLock<HashMap<String, u32>> = LazyLock::new(build_table);

fn build_table() -> HashMap<String, u32> {
    let mut table = HashMap::new();

    for (value, word) in EN_UNITS.iter().enumerate() {
        table.insert(word.to_string(), value as u32);
    }
    for (i, tens) in EN_TENS.iter().enumerate() {
        let base = 20 + 10 * i as u32;
        table.insert(tens.to_string(), base);
        for unit in 1..10u32 {
            table.insert(format!("{tens} {}", EN_UNITS[unit as usize]), base + unit);
        }
    }
    for word in ["hundred", "a hundred", "one hundred"] {
        table.insert(word.to_string(), 100);
    }

    for (value, word) in ES_UNITS.iter().enumerate() {
        table.insert(word.to_string(), value as u32);
    }
    for (word, value) in [("un", 1), ("una", 1), ("veintiun", 21), ("veintiuna", 21)] {
        table.insert(word.to_string(), value);
    }
    for (i, tens) in ES_TENS.iter().enumerate() {
        let base = 30 + 10 * i as u32;
        table.insert(tens.to_string(), base);
        for unit in 1..10u32 {
            table.insert(format!("{tens} y {}", ES_UNITS[unit as usize]), base + unit);
        }
        table.insert(format!("{tens} y una"), base + 1);
        table.insert(format!("{tens} y un"), base + 1);
    }
    for word in ["cien", "ciento"] {
        table.insert(word.to_string(), 100);
    }

    table
}

/// Numeric value of a digit string or a known number word
pub fn number_value(text: &str) -> Option<u32> {
    let bare = remove_accents(text.trim()).to_lowercase();
    if is_digits(&bare) {
        return bare.parse().ok();
    }
    let spaced = collapse_whitespace(&bare.replace('-', " "));
    NUMBER_WORDS.get(&spaced).copied()
}

/// True when both sides denote the same number
pub fn same_number(a: &str, b: &str) -> bool {
    match (number_value(a), number_value(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}
