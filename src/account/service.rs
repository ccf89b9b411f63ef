use std::future::Future;

use crate::models::User;

use super::AccountError;

/// The account workflow as the UI sees it.
///
/// The mock implementation simulates this against local storage; a real
/// network-backed implementation can replace it without touching callers.
pub trait AccountService {
    /// Authenticate and establish the current session.
    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<User, AccountError>> + Send;

    /// Create an account, persist it, and log it in.
    fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<User, AccountError>> + Send;

    /// Clear the current session. The underlying account record survives.
    fn logout(&self);

    /// Record a finished game for the current session, incrementing the
    /// cumulative score and play count. Returns the updated user, or `None`
    /// when nobody is logged in.
    fn update_score(&self, game_id: &str, score: u64) -> Option<User>;

    /// The currently logged-in user, if any.
    fn current_user(&self) -> Option<User>;
}
