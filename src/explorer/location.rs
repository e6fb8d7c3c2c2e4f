use super::controller::QueryKey;
use crate::search::params::{coerce_page, parse_query, read_list, read_value};
use crate::search::types::FacetSelection;

use ::url::form_urlencoded;

/// Canonical query string for a key. Empty `q` and page 1 are omitted; facet values use
/// repeated keys.
pub fn encode(key: &QueryKey) -> String {
    let mut out = form_urlencoded::Serializer::new(String::new());

    if !key.q.is_empty() {
        out.append_pair("q", &key.q);
    }
    if key.page > 1 {
        out.append_pair("page", &key.page.to_string());
    }

    let facets = &key.facets;
    for (name, values) in [
        ("subjects", &facets.subjects),
        ("grades", &facets.grades),
        ("topics", &facets.topics),
        ("sub_topics", &facets.sub_topics),
    ] {
        for value in values {
            out.append_pair(name, value);
        }
    }

    out.finish()
}

/// Reads a key back from a query string, with or without the leading `?`.
pub fn decode(query: &str) -> QueryKey {
    let query = query.trim().trim_start_matches('?');
    let pairs = parse_query(Some(query));

    QueryKey {
        q: read_value(&pairs, "q").unwrap_or("").trim().to_string(),
        facets: FacetSelection {
            subjects: read_list(&pairs, "subjects"),
            grades: read_list(&pairs, "grades"),
            topics: read_list(&pairs, "topics"),
            sub_topics: read_list(&pairs, "sub_topics"),
        },
        page: coerce_page(read_value(&pairs, "page").and_then(|p| p.trim().parse().ok())),
    }
}
