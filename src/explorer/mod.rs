//! Explorer Controller
//!
//! Client-side search controller for the library explorer. Mediates between user input
//! (typing, facet picks, paging, history navigation) and the search endpoint while keeping the
//! visible URL, the displayed results and a page cache consistent.
//!
//! ## Submodules
//! - **`controller`**: Pure state machine. Consumes [`controller::Event`]s, emits
//!   [`controller::Command`]s, never performs I/O. Stale responses are dropped by generation.
//! - **`driver`**: Runs a controller on tokio: debounce timers, cancellable fetches, history.
//! - **`client`**: The `SearchBackend` seam and its HTTP implementation.
//! - **`location`**: Query-string encoding of a search key (the visible URL).
//! - **`history`**: In-memory back/forward stack.

pub mod client;
pub mod controller;
pub mod driver;
pub mod history;
pub mod location;
