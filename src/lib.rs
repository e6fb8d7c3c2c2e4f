//! Lessn Catalog Service Library
//!
//! Backend for the Lessn presentation library: facet listings, filtered and ranked search,
//! typeahead suggestions and item detail over a single `Presentation` table, plus the
//! explorer controller that drives searches from a client.
//!
//! ## Architecture Modules
//!
//! - **`catalog`**: The data layer. Defines the `Presentation` record and the `CatalogStore`
//!   seam, with a pooled PostgreSQL implementation and a concurrent in-memory one.
//! - **`search`**: Query building and result shaping. Parses requests, plans filters and
//!   ordering (ranked or substring), aggregates facets, and serves the search endpoints.
//! - **`meta`**: Facet listing endpoints (subjects, grades, topics, sub-topics).
//! - **`explorer`**: The client-side search controller. A finite-state machine with
//!   debouncing, request supersession, a page cache and URL sync, driven by tokio.
//! - **`config`** / **`state`** / **`routes`**: Startup configuration, shared handles and
//!   router assembly.

pub mod catalog;
pub mod config;
pub mod explorer;
pub mod meta;
pub mod routes;
pub mod search;
pub mod state;
