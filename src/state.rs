use crate::catalog::memory::MemoryCatalog;
use crate::catalog::postgres::PgCatalog;
use crate::catalog::store::CatalogStore;
use crate::config::Config;
use crate::search::text::{TextSearch, select_text_search};

use std::sync::Arc;

/// Process-wide handles shared by every request.
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub text_search: Arc<dyn TextSearch>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogStore>, text_search: Arc<dyn TextSearch>) -> Arc<Self> {
        Arc::new(Self {
            catalog,
            text_search,
        })
    }

    /// Opens the configured store and picks the text-search strategy from its capabilities.
    pub async fn initialize(config: &Config) -> anyhow::Result<Arc<Self>> {
        let catalog: Arc<dyn CatalogStore> = match (&config.database_url, &config.catalog_file) {
            (Some(url), _) => Arc::new(PgCatalog::connect(url, config.max_connections).await?),
            (None, Some(path)) => Arc::new(MemoryCatalog::load_json(path)?),
            (None, None) => {
                tracing::warn!("No DATABASE_URL or catalog file configured, serving an empty catalog");
                Arc::new(MemoryCatalog::new())
            }
        };
        tracing::info!("Catalog backend: {}", catalog.backend());

        let text_search = select_text_search(catalog.as_ref(), config.text_search).await;

        Ok(Self::new(catalog, text_search))
    }
}
