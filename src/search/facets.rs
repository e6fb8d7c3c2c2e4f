//! Facet Aggregator
//!
//! Turns raw `GROUP BY` rows into display lists: labels are normalized, case variants are
//! merged with their counts summed, blanks are dropped, and the list is ordered
//! alphabetically (grades follow the pedagogical order instead).

use super::normalize::{grade_rank, normalize_grade, title_case};
use super::types::{Aggregates, FacetCount, FacetSelection};
use crate::catalog::store::CatalogStore;
use crate::catalog::types::{CatalogFilter, FacetDimension, RawFacetCount};

use anyhow::Result;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Scope of one facet listing.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetQuery {
    pub dimension: FacetDimension,
    pub selection: FacetSelection,
    /// Substring the listed values must contain.
    pub contains: Option<String>,
    pub limit: usize,
}

impl FacetQuery {
    pub fn unscoped(dimension: FacetDimension) -> Self {
        Self {
            dimension,
            selection: FacetSelection::default(),
            contains: None,
            limit: usize::MAX,
        }
    }
}

pub fn display_name(dimension: FacetDimension, raw: &str) -> String {
    match dimension {
        FacetDimension::Grade => normalize_grade(raw),
        _ => title_case(raw),
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn compare_grades(a: &str, b: &str) -> Ordering {
    match (grade_rank(a), grade_rank(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => compare_names(a, b),
    }
}

/// Normalizes, merges and orders raw rows.
pub fn aggregate(dimension: FacetDimension, rows: Vec<RawFacetCount>) -> Vec<FacetCount> {
    let mut merged: HashMap<String, FacetCount> = HashMap::new();

    for row in rows {
        let name = display_name(dimension, &row.value);
        if name.trim().is_empty() {
            continue;
        }
        merged
            .entry(name.to_lowercase())
            .and_modify(|entry| entry.count += row.count.max(0) as u64)
            .or_insert(FacetCount {
                name,
                count: row.count.max(0) as u64,
            });
    }

    let mut list: Vec<FacetCount> = merged.into_values().collect();
    match dimension {
        FacetDimension::Grade => list.sort_by(|a, b| compare_grades(&a.name, &b.name)),
        _ => list.sort_by(|a, b| compare_names(&a.name, &b.name)),
    }
    list
}

pub async fn try_facet_counts(store: &dyn CatalogStore, query: &FacetQuery) -> Result<Vec<FacetCount>> {
    let filter: CatalogFilter = query.selection.to_filter();
    let contains = query
        .contains
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let rows = store
        .facet_counts(query.dimension, &filter, contains)
        .await?;

    let mut list = aggregate(query.dimension, rows);
    list.truncate(query.limit);
    Ok(list)
}

/// Same as [`try_facet_counts`], degrading to an empty list when the store fails.
pub async fn facet_counts(store: &dyn CatalogStore, query: &FacetQuery) -> Vec<FacetCount> {
    match try_facet_counts(store, query).await {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!(
                "Facet listing for {} failed, returning empty list: {:#}",
                query.dimension.column(),
                e
            );
            Vec::new()
        }
    }
}

/// Unfiltered counts for all four dimensions, used to populate filter pickers.
pub async fn try_aggregates(store: &dyn CatalogStore) -> Result<Aggregates> {
    let [subject, grade, topic, sub_topic] = FacetDimension::ALL.map(FacetQuery::unscoped);

    let (subjects, grades, topics, sub_topics) = tokio::try_join!(
        try_facet_counts(store, &subject),
        try_facet_counts(store, &grade),
        try_facet_counts(store, &topic),
        try_facet_counts(store, &sub_topic),
    )?;

    Ok(Aggregates {
        subjects,
        grades,
        topics,
        sub_topics,
    })
}
