//! GameTrail core - offline-first state for an educational games catalog.
//!
//! This crate implements everything the catalog UI needs that is not
//! rendering: catalog search and filtering, the favorites and
//! recently-used lists with their persistence invariants, user
//! preferences, an offline cache controller with per-request-class
//! strategies, and a mock account/leaderboard service.
//!
//! The static tool catalog is supplied by the surrounding application as a
//! read-only slice; this crate never mutates it.

pub mod account;
pub mod cache;
pub mod config;
pub mod models;
pub mod prefs;
pub mod search;
pub mod store;
pub mod utils;

pub use account::{AccountError, AccountService, MockAccountService};
pub use cache::{CacheController, Fetch, FetchRequest, FetchResponse, HttpFetcher};
pub use config::Config;
pub use models::{Category, CategoryFilter, Tool, User, UserPreferences};
pub use prefs::PrefsManager;
pub use store::{ChangeEvent, ChangeHub, Store};

use std::io;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Call once at startup from the embedding application. Use the RUST_LOG
/// env var to control log level (e.g., RUST_LOG=debug).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}
