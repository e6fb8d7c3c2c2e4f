use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::ranking::RankingWeights;
use crate::search::normalize::match_key;

/// One row of the `"Presentation"` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Presentation {
    pub id: i32,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub sub_topic: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub thumbnail_alt_text: Option<String>,
    #[serde(default)]
    pub presentation_content: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub presentation_view_link: Option<String>,
    #[serde(default)]
    pub slides_export_link_url: Option<String>,
    #[serde(default)]
    pub download_ppt_url: Option<String>,
    #[serde(default)]
    pub download_pdf_url: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub reviews: Option<i32>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub meta_titles: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The classification dimensions used for browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetDimension {
    Subject,
    Grade,
    Topic,
    SubTopic,
}

impl FacetDimension {
    pub const ALL: [FacetDimension; 4] = [
        FacetDimension::Subject,
        FacetDimension::Grade,
        FacetDimension::Topic,
        FacetDimension::SubTopic,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            FacetDimension::Subject => "subject",
            FacetDimension::Grade => "grade",
            FacetDimension::Topic => "topic",
            FacetDimension::SubTopic => "sub_topic",
        }
    }

    pub fn value<'a>(&self, record: &'a Presentation) -> Option<&'a str> {
        match self {
            FacetDimension::Subject => Some(record.subject.as_str()),
            FacetDimension::Grade => Some(record.grade.as_str()),
            FacetDimension::Topic => record.topic.as_deref(),
            FacetDimension::SubTopic => record.sub_topic.as_deref(),
        }
    }
}

/// Fields the free-text clause looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Subject,
    Topic,
    SubTopic,
    Name,
    Grade,
}

impl TextField {
    pub const ALL: [TextField; 5] = [
        TextField::Subject,
        TextField::Topic,
        TextField::SubTopic,
        TextField::Name,
        TextField::Grade,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            TextField::Subject => "subject",
            TextField::Topic => "topic",
            TextField::SubTopic => "sub_topic",
            TextField::Name => "name",
            TextField::Grade => "grade",
        }
    }

    pub fn value<'a>(&self, record: &'a Presentation) -> &'a str {
        match self {
            TextField::Subject => &record.subject,
            TextField::Topic => record.topic.as_deref().unwrap_or(""),
            TextField::SubTopic => record.sub_topic.as_deref().unwrap_or(""),
            TextField::Name => &record.name,
            TextField::Grade => &record.grade,
        }
    }
}

/// Conjunctive filter handed to a store.
///
/// Facet vectors hold *match keys* (see [`match_key`]); a record passes a dimension when the
/// match key of its value is one of them. An empty vector does not constrain the dimension.
/// `text` is a case-insensitive substring tested against every [`TextField`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    pub subjects: Vec<String>,
    pub grades: Vec<String>,
    pub topics: Vec<String>,
    pub sub_topics: Vec<String>,
    pub text: Option<String>,
}

impl CatalogFilter {
    pub fn keys(&self, dimension: FacetDimension) -> &[String] {
        match dimension {
            FacetDimension::Subject => &self.subjects,
            FacetDimension::Grade => &self.grades,
            FacetDimension::Topic => &self.topics,
            FacetDimension::SubTopic => &self.sub_topics,
        }
    }

    pub fn matches(&self, record: &Presentation) -> bool {
        for dimension in FacetDimension::ALL {
            let keys = self.keys(dimension);
            if keys.is_empty() {
                continue;
            }
            let key = match_key(dimension.value(record).unwrap_or(""));
            if !keys.iter().any(|k| *k == key) {
                return false;
            }
        }

        match self.text.as_deref() {
            Some(text) if !text.is_empty() => text_matches(record, text),
            _ => true,
        }
    }
}

pub fn text_matches(record: &Presentation, text: &str) -> bool {
    let needle = text.to_lowercase();
    TextField::ALL
        .iter()
        .any(|field| field.value(record).to_lowercase().contains(&needle))
}

/// Ordering of a result page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOrder {
    /// Stable, deterministic pagination.
    IdAscending,
    /// Weighted relevance, then newest first, then ascending id.
    Relevance {
        query: String,
        weights: RankingWeights,
    },
}

/// One raw `GROUP BY` row, before display normalization.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct RawFacetCount {
    pub value: String,
    pub count: i64,
}
