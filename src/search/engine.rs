use super::facets::try_aggregates;
use super::text::TextSearch;
use super::thumbnail::{SNIPPET_CHARS, embed_url, extract_thumbnail, plain_snippet, seo_meta};
use super::types::*;
use crate::catalog::store::CatalogStore;
use crate::catalog::types::{CatalogFilter, PageOrder, Presentation};

use anyhow::Result;

pub const SUGGEST_LIMIT: u32 = 8;
pub const SUGGEST_MIN_CHARS: usize = 2;

/// A search request resolved into store terms.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPlan {
    pub filter: CatalogFilter,
    pub order: PageOrder,
    pub limit: u32,
    pub offset: u64,
}

pub fn plan(request: &SearchRequest, text_search: &dyn TextSearch) -> SearchPlan {
    let limit = request.page_size.clamp(1, MAX_PAGE_SIZE);
    let page = request.page.max(1);
    let offset = u64::from(page - 1) * u64::from(limit);

    let mut filter = request.facets.to_filter();
    let q = request.q.trim();

    let order = if q.is_empty() {
        PageOrder::IdAscending
    } else {
        filter.text = Some(q.to_string());
        text_search.order_for(q)
    };

    SearchPlan {
        filter,
        order,
        limit,
        offset,
    }
}

pub fn to_item(record: Presentation) -> CatalogItem {
    CatalogItem {
        thumbnail: extract_thumbnail(record.thumbnail.as_deref()),
        id: record.id,
        slug: record.slug,
        name: record.name,
        subject: record.subject,
        grade: record.grade,
        topic: record.topic,
        sub_topic: record.sub_topic,
        thumbnail_alt_text: record.thumbnail_alt_text,
    }
}

pub async fn search(
    request: &SearchRequest,
    store: &dyn CatalogStore,
    text_search: &dyn TextSearch,
) -> Result<SearchResponse> {
    let plan = plan(request, text_search);
    tracing::debug!(
        "Search q='{}' limit={} offset={} order={:?}",
        request.q,
        plan.limit,
        plan.offset,
        plan.order
    );

    let (total, rows) = tokio::try_join!(
        store.count(&plan.filter),
        store.page(&plan.filter, &plan.order, plan.limit, plan.offset),
    )?;

    let aggregates = if request.with_aggregates {
        Some(try_aggregates(store).await?)
    } else {
        None
    };

    Ok(SearchResponse {
        total,
        items: rows.into_iter().map(to_item).collect(),
        aggregates,
    })
}

pub async fn suggest(query: &str, store: &dyn CatalogStore) -> Result<Vec<SuggestItem>> {
    let query = query.trim();
    if query.chars().count() < SUGGEST_MIN_CHARS {
        return Ok(Vec::new());
    }

    let rows = store.suggest(query, SUGGEST_LIMIT).await?;
    Ok(rows
        .into_iter()
        .map(|record| SuggestItem {
            snippet: plain_snippet(record.presentation_content.as_deref(), SNIPPET_CHARS),
            id: record.id,
            slug: record.slug,
            title: record.name,
            subject: record.subject,
            grade: record.grade,
            topic: record.topic,
            subtopic: record.sub_topic,
        })
        .collect())
}

pub async fn detail(slug: &str, store: &dyn CatalogStore) -> Result<Option<PresentationDetail>> {
    Ok(store.find_by_slug(slug).await?.map(|presentation| PresentationDetail {
        embed_url: embed_url(&presentation),
        seo: seo_meta(&presentation),
        presentation,
    }))
}
