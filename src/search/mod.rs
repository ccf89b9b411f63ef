//! Catalog search and filtering.
//!
//! Pure functions over the static tool catalog: no side effects, no stored
//! state, cheap enough to run on every keystroke. "No results" is an empty
//! vec, never an error.

pub mod engine;

pub use engine::{filter_by_category, preview, search, search_and_filter, sort_tools, SortKey};
