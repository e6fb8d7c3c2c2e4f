//! Record builders shared by the unit tests.

use super::memory::MemoryCatalog;
use super::store::CatalogStore;
use super::types::*;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

pub fn record(id: i32, name: &str, subject: &str, grade: &str, topic: Option<&str>) -> Presentation {
    Presentation {
        id,
        slug: format!("presentation-{id}"),
        name: name.to_string(),
        subject: subject.to_string(),
        grade: grade.to_string(),
        topic: topic.map(str::to_string),
        sub_topic: None,
        thumbnail: None,
        thumbnail_alt_text: None,
        presentation_content: None,
        summary: None,
        presentation_view_link: None,
        slides_export_link_url: None,
        download_ppt_url: None,
        download_pdf_url: None,
        rating: None,
        reviews: None,
        meta_description: None,
        meta_titles: None,
        created_at: None,
    }
}

pub fn day(n: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2024, 1, n, 12, 0, 0).single()
}

/// 15 Math/Algebra records (ids 1..=15) interleaved with 15 Science ones (ids 101..=115)
/// and a handful of odd labels.
pub fn sample_catalog() -> MemoryCatalog {
    let mut records = Vec::new();
    for i in 1..=15 {
        let grade = if i % 2 == 0 { "1st grade" } else { "Second Grade" };
        let mut r = record(i, &format!("Algebra Lesson {i}"), "Math", grade, Some("Algebra Basics"));
        r.sub_topic = Some("Linear Equations".to_string());
        records.push(r);
    }
    for i in 101..=115 {
        let mut r = record(i, &format!("Cells {i}"), "science", "Kindergarten", Some("Biology"));
        r.sub_topic = Some("Cells".to_string());
        records.push(r);
    }
    records.push(record(200, "Spelling Bee", "  english  ", "Kingdergardon", Some("Spelling")));
    records.push(record(201, "Reading", "English", "HIGH SCHOOL", Some("")));
    records.push(record(202, "Untitled", "", "  ", None));

    match MemoryCatalog::from_records(records) {
        Ok(catalog) => catalog,
        Err(e) => panic!("fixture catalog is invalid: {e:#}"),
    }
}

/// A store whose every read fails, as an unreachable database would.
pub struct FailingCatalog;

#[async_trait]
impl CatalogStore for FailingCatalog {
    fn backend(&self) -> &'static str {
        "failing"
    }

    async fn supports_trigram(&self) -> Result<bool> {
        Err(anyhow!("connection refused"))
    }

    async fn count(&self, _filter: &CatalogFilter) -> Result<u64> {
        Err(anyhow!("connection refused"))
    }

    async fn page(
        &self,
        _filter: &CatalogFilter,
        _order: &PageOrder,
        _limit: u32,
        _offset: u64,
    ) -> Result<Vec<Presentation>> {
        Err(anyhow!("connection refused"))
    }

    async fn facet_counts(
        &self,
        _dimension: FacetDimension,
        _filter: &CatalogFilter,
        _contains: Option<&str>,
    ) -> Result<Vec<RawFacetCount>> {
        Err(anyhow!("connection refused"))
    }

    async fn find_by_slug(&self, _slug: &str) -> Result<Option<Presentation>> {
        Err(anyhow!("connection refused"))
    }

    async fn suggest(&self, _query: &str, _limit: u32) -> Result<Vec<Presentation>> {
        Err(anyhow!("connection refused"))
    }
}
