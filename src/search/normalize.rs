//! Label normalization.
//!
//! Classification labels come from a spreadsheet import with inconsistent casing and
//! spelling. They are stored verbatim and normalized on read: `match_key` for comparisons,
//! `title_case` for display, and `normalize_grade` to fold grade spellings onto the canonical
//! set.

use regex::Regex;
use std::sync::LazyLock;

static WORD_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w").expect("static regex"));

/// Canonical grades in pedagogical order.
pub const GRADE_ORDER: [&str; 11] = [
    "Pre-K",
    "Kindergarten",
    "First Grade",
    "Second Grade",
    "Third Grade",
    "Fourth Grade",
    "Fifth Grade",
    "Sixth Grade",
    "Seventh Grade",
    "Eighth Grade",
    "High School",
];

/// Lowercased, whitespace-collapsed spellings and the canonical grade they stand for.
const GRADE_ALIASES: &[(&str, &str)] = &[
    ("pre k", "Pre-K"),
    ("pre-k", "Pre-K"),
    ("prek", "Pre-K"),
    ("pk", "Pre-K"),
    ("prekindergarten", "Pre-K"),
    ("pre-kindergarten", "Pre-K"),
    ("k", "Kindergarten"),
    ("kg", "Kindergarten"),
    ("kinder", "Kindergarten"),
    ("kindergarten", "Kindergarten"),
    ("1st grade", "First Grade"),
    ("first grade", "First Grade"),
    ("2nd grade", "Second Grade"),
    ("second grade", "Second Grade"),
    ("3rd grade", "Third Grade"),
    ("third grade", "Third Grade"),
    ("4th grade", "Fourth Grade"),
    ("fourth grade", "Fourth Grade"),
    ("5th grade", "Fifth Grade"),
    ("fifth grade", "Fifth Grade"),
    ("6th grade", "Sixth Grade"),
    ("sixth grade", "Sixth Grade"),
    ("7th grade", "Seventh Grade"),
    ("seventh grade", "Seventh Grade"),
    ("8th grade", "Eighth Grade"),
    ("eighth grade", "Eighth Grade"),
    ("high school", "High School"),
];

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Key used for case-insensitive equality between labels.
pub fn match_key(text: &str) -> String {
    collapse_whitespace(text).to_lowercase()
}

/// Trims, collapses internal whitespace and capitalizes the first letter of every word.
pub fn title_case(text: &str) -> String {
    let lowered = match_key(text);
    WORD_START
        .replace_all(&lowered, |caps: &regex::Captures| caps[0].to_uppercase())
        .into_owned()
}

pub fn canonical_grade(text: &str) -> Option<&'static str> {
    let key = match_key(text);
    GRADE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| *canonical)
}

/// Canonical display name of a grade; unknown spellings are title-cased.
pub fn normalize_grade(text: &str) -> String {
    match canonical_grade(text) {
        Some(canonical) => canonical.to_string(),
        None => title_case(text),
    }
}

/// Position of a display name in [`GRADE_ORDER`].
pub fn grade_rank(name: &str) -> Option<usize> {
    GRADE_ORDER.iter().position(|g| *g == name)
}

/// Every match key a selected grade should accept in stored data.
pub fn grade_match_keys(selected: &str) -> Vec<String> {
    let canonical = normalize_grade(selected);
    if canonical.is_empty() {
        return Vec::new();
    }

    let mut keys: Vec<String> = GRADE_ALIASES
        .iter()
        .filter(|(_, c)| *c == canonical)
        .map(|(alias, _)| alias.to_string())
        .collect();

    let own = match_key(&canonical);
    if !keys.contains(&own) {
        keys.push(own);
    }
    keys
}
