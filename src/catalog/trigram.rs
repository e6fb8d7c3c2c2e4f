//! Trigram similarity with the same word splitting and padding as PostgreSQL `pg_trgm`.
//!
//! Each word (maximal run of alphanumerics, lowercased) is padded with two spaces in front and
//! one behind, then cut into overlapping three-character windows. Similarity is the Jaccard
//! ratio of the two trigram sets.

use std::collections::HashSet;

pub fn trigrams(text: &str) -> HashSet<String> {
    let mut set = HashSet::new();
    let lowered = text.to_lowercase();

    for word in lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let padded: Vec<char> = format!("  {} ", word).chars().collect();
        for window in padded.windows(3) {
            set.insert(window.iter().collect());
        }
    }

    set
}

pub fn similarity(a: &str, b: &str) -> f64 {
    let left = trigrams(a);
    let right = trigrams(b);
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let common = left.intersection(&right).count();
    let union = left.len() + right.len() - common;
    common as f64 / union as f64
}
