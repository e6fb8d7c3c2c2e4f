//! Relevance scoring for free-text queries.
//!
//! Each text field earns points for the best kind of match it has against the query
//! (exact > prefix > fuzzy), multiplied by a per-field weight. The field order
//! subject > topic > sub_topic > name > grade is the contract; the numbers are tunable.

use super::trigram::similarity;
use super::types::{Presentation, TextField};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingWeights {
    pub subject: f64,
    pub topic: f64,
    pub sub_topic: f64,
    pub name: f64,
    pub grade: f64,
    pub exact: f64,
    pub prefix: f64,
    pub fuzzy: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            subject: 5.0,
            topic: 4.0,
            sub_topic: 3.0,
            name: 2.0,
            grade: 1.0,
            exact: 10.0,
            prefix: 6.0,
            fuzzy: 4.0,
        }
    }
}

impl RankingWeights {
    pub fn field(&self, field: TextField) -> f64 {
        match field {
            TextField::Subject => self.subject,
            TextField::Topic => self.topic,
            TextField::SubTopic => self.sub_topic,
            TextField::Name => self.name,
            TextField::Grade => self.grade,
        }
    }
}

/// Unweighted points one field value earns against an already lowercased query.
pub fn field_points(value: &str, query: &str, weights: &RankingWeights) -> f64 {
    let value = value.trim().to_lowercase();
    if value.is_empty() || query.is_empty() {
        return 0.0;
    }

    if value == query {
        weights.exact
    } else if value.starts_with(query) {
        weights.prefix
    } else {
        weights.fuzzy * similarity(&value, query)
    }
}

pub fn relevance(record: &Presentation, query: &str, weights: &RankingWeights) -> f64 {
    let query = query.trim().to_lowercase();
    TextField::ALL
        .iter()
        .map(|field| weights.field(*field) * field_points(field.value(record), &query, weights))
        .sum()
}
