//! Facet Metadata Module
//!
//! Read-only endpoints listing facet values with counts, used to populate filter pickers.
//! These reads are advisory: a storage failure yields an empty list with status 200.

pub mod handlers;

#[cfg(test)]
mod tests;
