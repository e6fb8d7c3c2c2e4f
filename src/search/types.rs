use crate::catalog::types::{CatalogFilter, Presentation};
use crate::search::normalize::{grade_match_keys, match_key};

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 12;
pub const MAX_PAGE_SIZE: u32 = 50;

/// Facet values the user has selected, as typed or as picked from a facet list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacetSelection {
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub grades: Vec<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub sub_topics: Vec<String>,
}

impl FacetSelection {
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
            && self.grades.is_empty()
            && self.topics.is_empty()
            && self.sub_topics.is_empty()
    }

    /// Store filter matching this selection. Grades accept every spelling that canonicalizes
    /// to the selected grade.
    pub fn to_filter(&self) -> CatalogFilter {
        CatalogFilter {
            subjects: keys(&self.subjects),
            grades: dedup(self.grades.iter().flat_map(|g| grade_match_keys(g)).collect()),
            topics: keys(&self.topics),
            sub_topics: keys(&self.sub_topics),
            text: None,
        }
    }
}

fn keys(values: &[String]) -> Vec<String> {
    dedup(
        values
            .iter()
            .map(|v| match_key(v))
            .filter(|k| !k.is_empty())
            .collect(),
    )
}

fn dedup(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// Body of `POST /api/presentations/search`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub q: String,
    #[serde(flatten)]
    pub facets: FacetSelection,
    pub page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    #[serde(rename = "withAggregates")]
    pub with_aggregates: bool,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            q: String::new(),
            facets: FacetSelection::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            with_aggregates: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregates {
    pub subjects: Vec<FacetCount>,
    pub grades: Vec<FacetCount>,
    pub topics: Vec<FacetCount>,
    pub sub_topics: Vec<FacetCount>,
}

/// Public shape of one search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub subject: String,
    pub grade: String,
    pub topic: Option<String>,
    pub sub_topic: Option<String>,
    pub thumbnail: Option<String>,
    pub thumbnail_alt_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub total: u64,
    pub items: Vec<CatalogItem>,
    pub aggregates: Option<Aggregates>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestItem {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub subject: String,
    pub grade: String,
    pub topic: Option<String>,
    pub subtopic: Option<String>,
    pub snippet: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestResponse {
    pub items: Vec<SuggestItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoMeta {
    pub title: String,
    pub description: String,
}

/// Full record returned by `GET /api/presentations/{slug}`, plus derived viewer fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationDetail {
    #[serde(flatten)]
    pub presentation: Presentation,
    pub embed_url: Option<String>,
    pub seo: SeoMeta,
}
