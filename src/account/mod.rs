//! Account and leaderboard services.
//!
//! `AccountService` is the seam the UI depends on: login, registration,
//! session management, and score updates. `MockAccountService` is the
//! store-backed placeholder implementation used until a real backend
//! exists; callers must not depend on its storage details.

pub mod error;
pub mod mock;
pub mod service;

pub use error::AccountError;
pub use mock::MockAccountService;
pub use service::AccountService;
