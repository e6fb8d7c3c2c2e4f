//! Catalog Module
//!
//! The single source of truth for presentation records.
//!
//! ## Core Concepts
//! - **Record**: `Presentation` is the only persistent entity. It is written by the offline
//!   import and read by everything else.
//! - **Store seam**: `CatalogStore` is the narrow async interface the search layer talks to
//!   (count, page, facet groups, slug lookup, suggestions). Handlers never see SQL.
//! - **Backends**: `PgCatalog` runs against PostgreSQL through a shared connection pool,
//!   `MemoryCatalog` keeps records in a concurrent map (local runs and tests).
//! - **Ranking**: `ranking` and `trigram` define the relevance score both backends agree on.

pub mod memory;
pub mod postgres;
pub mod ranking;
pub mod store;
pub mod trigram;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;
#[cfg(test)]
mod tests;
