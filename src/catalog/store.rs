//! Store Seam
//!
//! Every read the web layer performs goes through `CatalogStore`. Implementations are created
//! once at startup and shared behind an `Arc<dyn CatalogStore>`.

use super::types::*;

use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Short backend name used in logs.
    fn backend(&self) -> &'static str;

    /// Capability probe: can this store compute trigram similarity?
    async fn supports_trigram(&self) -> Result<bool>;

    /// Number of records passing `filter`, before pagination.
    async fn count(&self, filter: &CatalogFilter) -> Result<u64>;

    /// One page of records passing `filter`, in `order`.
    async fn page(
        &self,
        filter: &CatalogFilter,
        order: &PageOrder,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Presentation>>;

    /// Raw value counts for `dimension`, grouped by stored value.
    ///
    /// Null and blank values are never returned. When `contains` is set, only values of the
    /// grouped dimension containing it (case-insensitively) are counted.
    async fn facet_counts(
        &self,
        dimension: FacetDimension,
        filter: &CatalogFilter,
        contains: Option<&str>,
    ) -> Result<Vec<RawFacetCount>>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Presentation>>;

    /// Lightweight typeahead lookup: substring over the text fields and the long-form content,
    /// ascending id.
    async fn suggest(&self, query: &str, limit: u32) -> Result<Vec<Presentation>>;
}
