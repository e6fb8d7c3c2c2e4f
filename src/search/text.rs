//! Text-search strategies.
//!
//! Free text always filters by case-insensitive substring. What differs is the ordering of a
//! page: `RankedTextSearch` orders by weighted trigram relevance, `SubstringTextSearch` keeps
//! ascending id. The strategy is chosen once at startup from the store's capability probe.

use crate::catalog::ranking::RankingWeights;
use crate::catalog::store::CatalogStore;
use crate::catalog::types::PageOrder;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub trait TextSearch: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Ordering for a page of results matching `query`.
    fn order_for(&self, query: &str) -> PageOrder;
}

#[derive(Debug, Clone, Default)]
pub struct RankedTextSearch {
    weights: RankingWeights,
}

impl RankedTextSearch {
    pub fn new(weights: RankingWeights) -> Self {
        Self { weights }
    }
}

impl TextSearch for RankedTextSearch {
    fn name(&self) -> &'static str {
        "ranked"
    }

    fn order_for(&self, query: &str) -> PageOrder {
        let query = query.trim();
        if query.is_empty() {
            return PageOrder::IdAscending;
        }
        PageOrder::Relevance {
            query: query.to_string(),
            weights: self.weights,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringTextSearch;

impl TextSearch for SubstringTextSearch {
    fn name(&self) -> &'static str {
        "substring"
    }

    fn order_for(&self, _query: &str) -> PageOrder {
        PageOrder::IdAscending
    }
}

/// Configured preference; `Auto` defers to the capability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextSearchMode {
    #[default]
    Auto,
    Ranked,
    Substring,
}

impl FromStr for TextSearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(TextSearchMode::Auto),
            "ranked" => Ok(TextSearchMode::Ranked),
            "substring" => Ok(TextSearchMode::Substring),
            other => Err(format!("unknown text search mode '{}'", other)),
        }
    }
}

pub async fn select_text_search(
    store: &dyn CatalogStore,
    mode: TextSearchMode,
) -> Arc<dyn TextSearch> {
    if mode == TextSearchMode::Substring {
        tracing::info!("Text search: substring (configured)");
        return Arc::new(SubstringTextSearch);
    }

    let supported = match store.supports_trigram().await {
        Ok(supported) => supported,
        Err(e) => {
            tracing::warn!("Trigram capability probe failed: {:#}", e);
            false
        }
    };

    if supported {
        tracing::info!("Text search: ranked ({} supports trigram similarity)", store.backend());
        return Arc::new(RankedTextSearch::default());
    }

    if mode == TextSearchMode::Ranked {
        tracing::warn!(
            "Ranked text search requested but {} has no trigram support, using substring",
            store.backend()
        );
    } else {
        tracing::info!("Text search: substring ({} has no trigram support)", store.backend());
    }
    Arc::new(SubstringTextSearch)
}
