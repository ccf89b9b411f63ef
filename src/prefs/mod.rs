//! Favorites, recently-used tracking, and user preferences.
//!
//! `PrefsManager` enforces the data invariants on top of the `Store`:
//! favorites are a set, recents are deduplicated and capped, preferences
//! merge field-wise. Every mutation broadcasts a `ChangeEvent`.

pub mod manager;

pub use manager::PrefsManager;
