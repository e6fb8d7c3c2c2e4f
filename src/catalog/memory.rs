use super::ranking::relevance;
use super::store::CatalogStore;
use super::types::*;

use anyhow::{Context, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

/// In-process catalog backed by concurrent maps.
///
/// Keeps records keyed by id plus a slug index, enforcing the same uniqueness rules the
/// relational table does. Trigram support is switchable so both text-search strategies can run
/// against it.
pub struct MemoryCatalog {
    records: DashMap<i32, Presentation>,
    slugs: DashMap<String, i32>,
    trigram: bool,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            slugs: DashMap::new(),
            trigram: true,
        }
    }

    pub fn with_trigram(mut self, enabled: bool) -> Self {
        self.trigram = enabled;
        self
    }

    pub fn from_records(records: Vec<Presentation>) -> Result<Self> {
        let catalog = Self::new();
        for record in records {
            catalog.insert(record)?;
        }
        Ok(catalog)
    }

    /// Loads a JSON array of presentations.
    pub fn load_json(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading catalog file {}", path.display()))?;
        let records: Vec<Presentation> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing catalog file {}", path.display()))?;

        tracing::info!("Loaded {} presentations from {}", records.len(), path.display());
        Self::from_records(records)
    }

    /// Inserts or replaces a record. `id` and `slug` are immutable once assigned.
    ///
    /// The id entry is held while the slug is claimed, so concurrent inserts cannot both take
    /// the same slug. Locks are always taken records-then-slugs.
    pub fn insert(&self, record: Presentation) -> Result<()> {
        let slot = self.records.entry(record.id);
        if let Entry::Occupied(existing) = &slot
            && existing.get().slug != record.slug
        {
            return Err(anyhow::anyhow!(
                "Presentation {} already has slug '{}'",
                record.id,
                existing.get().slug
            ));
        }

        match self.slugs.entry(record.slug.clone()) {
            Entry::Occupied(owner) if *owner.get() != record.id => {
                return Err(anyhow::anyhow!(
                    "Slug '{}' already belongs to presentation {}",
                    record.slug,
                    owner.get()
                ));
            }
            Entry::Occupied(_) => {}
            Entry::Vacant(vacant) => {
                vacant.insert(record.id);
            }
        }

        slot.insert(record);
        Ok(())
    }

    pub fn get(&self, id: i32) -> Option<Presentation> {
        self.records.get(&id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn matching(&self, filter: &CatalogFilter) -> Vec<Presentation> {
        self.records
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn newest_first(a: &Presentation, b: &Presentation) -> Ordering {
    match (a.created_at, b.created_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn supports_trigram(&self) -> Result<bool> {
        Ok(self.trigram)
    }

    async fn count(&self, filter: &CatalogFilter) -> Result<u64> {
        Ok(self
            .records
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .count() as u64)
    }

    async fn page(
        &self,
        filter: &CatalogFilter,
        order: &PageOrder,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Presentation>> {
        let mut rows = self.matching(filter);

        match order {
            PageOrder::IdAscending => rows.sort_by_key(|p| p.id),
            PageOrder::Relevance { query, weights } => {
                if !self.trigram {
                    return Err(anyhow::anyhow!(
                        "Relevance ordering requested but trigram similarity is disabled"
                    ));
                }
                let mut scored: Vec<(f64, Presentation)> = rows
                    .into_iter()
                    .map(|p| (relevance(&p, query, weights), p))
                    .collect();
                scored.sort_by(|a, b| {
                    b.0.total_cmp(&a.0)
                        .then_with(|| newest_first(&a.1, &b.1))
                        .then_with(|| a.1.id.cmp(&b.1.id))
                });
                rows = scored.into_iter().map(|(_, p)| p).collect();
            }
        }

        Ok(rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn facet_counts(
        &self,
        dimension: FacetDimension,
        filter: &CatalogFilter,
        contains: Option<&str>,
    ) -> Result<Vec<RawFacetCount>> {
        let mut groups: HashMap<String, i64> = HashMap::new();

        for entry in self.records.iter() {
            let record = entry.value();
            let Some(value) = dimension.value(record) else {
                continue;
            };
            if value.trim().is_empty() || !filter.matches(record) {
                continue;
            }
            if let Some(needle) = contains
                && !contains_ci(value, needle)
            {
                continue;
            }
            *groups.entry(value.to_string()).or_insert(0) += 1;
        }

        Ok(groups
            .into_iter()
            .map(|(value, count)| RawFacetCount { value, count })
            .collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Presentation>> {
        Ok(self
            .slugs
            .get(slug)
            .and_then(|id| self.records.get(id.value()).map(|r| r.value().clone())))
    }

    async fn suggest(&self, query: &str, limit: u32) -> Result<Vec<Presentation>> {
        let mut rows: Vec<Presentation> = self
            .records
            .iter()
            .filter(|entry| {
                let record = entry.value();
                text_matches(record, query)
                    || record
                        .presentation_content
                        .as_deref()
                        .is_some_and(|c| contains_ci(c, query))
            })
            .map(|entry| entry.value().clone())
            .collect();

        rows.sort_by_key(|p| p.id);
        rows.truncate(limit as usize);
        Ok(rows)
    }
}
