//! Request parsing.
//!
//! Clients send the same search in several shapes: a JSON body, a query string with repeated
//! keys, or a query string with comma-separated values. Everything is coerced into a
//! [`SearchRequest`]; malformed numbers fall back to defaults instead of being rejected.

use super::types::{DEFAULT_PAGE_SIZE, FacetSelection, MAX_PAGE_SIZE, SearchRequest};

use serde_json::Value;

pub type QueryPairs = Vec<(String, String)>;

pub const DEFAULT_FACET_LIMIT: usize = 500;
pub const MAX_FACET_LIMIT: usize = 1000;

/// Decodes a raw `application/x-www-form-urlencoded` query string.
pub fn parse_query(raw: Option<&str>) -> QueryPairs {
    raw.map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

/// Reads a list-valued parameter.
///
/// `key` and `key[]` are equivalent, and every occurrence is split on commas, so
/// `subjects=A,B&subjects=C` reads as three values. The result holds trimmed, non-empty
/// strings in request order.
pub fn read_list(pairs: &[(String, String)], key: &str) -> Vec<String> {
    let bracketed = format!("{key}[]");
    pairs
        .iter()
        .filter(|(k, _)| k == key || *k == bracketed)
        .flat_map(|(_, v)| v.split(','))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn read_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

pub fn coerce_page(raw: Option<i64>) -> u32 {
    match raw {
        Some(page) if page >= 1 => page.min(i64::from(u32::MAX)) as u32,
        _ => 1,
    }
}

pub fn coerce_page_size(raw: Option<i64>) -> u32 {
    match raw {
        Some(size) => size.clamp(1, i64::from(MAX_PAGE_SIZE)) as u32,
        None => DEFAULT_PAGE_SIZE,
    }
}

/// Facet list cap: defaults to 500, never above 1000, never below 1.
pub fn coerce_facet_limit(raw: Option<&str>) -> usize {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .map(|v| v.clamp(1, MAX_FACET_LIMIT as i64) as usize)
        .unwrap_or(DEFAULT_FACET_LIMIT)
}

fn parse_int(text: &str) -> Option<i64> {
    let text = text.trim();
    text.parse::<i64>()
        .ok()
        .or_else(|| text.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
}

fn parse_flag(text: &str) -> bool {
    matches!(text.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

fn json_int(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_int(s),
        _ => None,
    }
}

fn json_list(value: Option<&Value>) -> Vec<String> {
    let raw: Vec<String> = match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };

    raw.into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn json_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => parse_flag(s),
        Some(Value::Number(n)) => n.as_i64().is_some_and(|v| v != 0),
        _ => false,
    }
}

impl SearchRequest {
    /// Lenient JSON decoding. An empty or unparsable body is the default request.
    pub fn from_json_body(body: &[u8]) -> Self {
        let value: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(err) => {
                if !body.is_empty() {
                    tracing::debug!("Unparsable search body, using defaults: {}", err);
                }
                return Self::default();
            }
        };

        let Value::Object(map) = value else {
            return Self::default();
        };

        let q = match map.get("q") {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        Self {
            q,
            facets: FacetSelection {
                subjects: json_list(map.get("subjects")),
                grades: json_list(map.get("grades")),
                topics: json_list(map.get("topics")),
                sub_topics: json_list(map.get("sub_topics")),
            },
            page: coerce_page(json_int(map.get("page"))),
            page_size: coerce_page_size(json_int(map.get("pageSize"))),
            with_aggregates: json_flag(map.get("withAggregates")),
        }
    }

    pub fn from_query_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            q: read_value(pairs, "q").unwrap_or("").trim().to_string(),
            facets: FacetSelection {
                subjects: read_list(pairs, "subjects"),
                grades: read_list(pairs, "grades"),
                topics: read_list(pairs, "topics"),
                sub_topics: read_list(pairs, "sub_topics"),
            },
            page: coerce_page(read_value(pairs, "page").and_then(parse_int)),
            page_size: coerce_page_size(read_value(pairs, "pageSize").and_then(parse_int)),
            with_aggregates: read_value(pairs, "withAggregates").is_some_and(parse_flag),
        }
    }
}
