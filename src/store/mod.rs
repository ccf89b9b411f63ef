//! Local persistence for user state.
//!
//! This module provides:
//! - `Store`: namespaced key-value storage backed by one JSON file per key.
//!   Reads never fail (missing or corrupt data degrades to the type's empty
//!   default) and write failures are logged but never surface to callers.
//! - `ChangeHub`: a broadcast channel of typed `ChangeEvent` payloads so
//!   independent UI surfaces stay consistent without direct coupling.

pub mod events;
pub mod kv;

pub use events::{ChangeEvent, ChangeHub, FavoriteAction};
pub use kv::{
    Store, KEY_FAVORITES, KEY_PREFERENCES, KEY_RECENT, KEY_SCORE_LOG, KEY_SESSION_TOKEN,
    KEY_SESSION_USER, KEY_USER_TABLE,
};
