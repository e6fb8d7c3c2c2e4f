//! Search Service Module
//!
//! Resolves explorer queries against the catalog.
//!
//! ## Overview
//! A request (free text, facet selections, pagination) is parsed leniently, planned into a
//! store filter plus ordering, executed as a count and a page query, and shaped into the public
//! item format. Optional aggregates carry unfiltered facet counts for the filter pickers.
//!
//! ## Submodules
//! - **`engine`**: Planning, execution and result shaping; suggestions and item detail.
//! - **`facets`**: The facet aggregator (normalize, merge, order).
//! - **`handlers`**: HTTP handlers for the Axum web server.
//! - **`normalize`**: Label normalization and grade canonicalization.
//! - **`params`**: Query-string and body parsing with default coercion.
//! - **`text`**: Ranked and substring text-search strategies.
//! - **`thumbnail`**: URL and snippet extraction from stored HTML.
//! - **`types`**: Data Transfer Objects (DTOs) for API communication.

pub mod engine;
pub mod facets;
pub mod handlers;
pub mod normalize;
pub mod params;
pub mod text;
pub mod thumbnail;
pub mod types;
