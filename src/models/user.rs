use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A mock account as exposed to the application. Field names follow the
/// wire shape the original backend returned, so previously stored sessions
/// keep deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub total_score: u64,
    pub games_played: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A row in the locally stored user table: the account plus its credential
/// hash. The hash is absent for records created without a password (for
/// example the demo account mirrored in on a score update).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(flatten)]
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

/// One submitted game result, appended to the per-user score log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub game_id: String,
    pub score: u64,
    pub timestamp: DateTime<Utc>,
}

/// One ranked leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: String,
    pub username: String,
    pub total_score: u64,
    pub games_played: u64,
    pub average_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub rank: usize,
}
