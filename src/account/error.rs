use thiserror::Error;

/// Failures surfaced by account operations. Each variant carries a message
/// suitable for showing to the user directly.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Email already registered")]
    EmailTaken,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Password must be at least 6 characters")]
    WeakPassword,

    #[error("Invalid email or password")]
    InvalidCredentials,
}
