use std::collections::HashMap;
use std::time::Duration;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::{debug, warn};

use crate::models::{LeaderboardEntry, ScoreRecord, User, UserRecord};
use crate::store::{
    ChangeEvent, ChangeHub, Store, KEY_SCORE_LOG, KEY_SESSION_TOKEN, KEY_SESSION_USER,
    KEY_USER_TABLE,
};

use super::{AccountError, AccountService};

// ============================================================================
// Constants
// ============================================================================

/// Simulated network latency for auth operations, so the UI's loading
/// states behave the way they will against a real backend.
const AUTH_DELAY_MS: u64 = 600;

/// Minimum password length accepted at registration.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Credential pair that always resolves to the built-in demo account.
const DEMO_EMAIL: &str = "demo@gametrail.app";
const DEMO_PASSWORD: &str = "demo123";

/// Length of generated session tokens and account ids.
const TOKEN_LENGTH: usize = 32;
const ID_LENGTH: usize = 8;

/// Fabricated players backing the demo leaderboard: (id, username, score,
/// games played).
const SEED_PLAYERS: [(&str, &str, u64, u64); 10] = [
    ("seed-1", "MathWizard2024", 15_420, 128),
    ("seed-2", "ScienceExplorer", 14_890, 115),
    ("seed-3", "WordMaster", 14_320, 121),
    ("seed-4", "BrainTrainer", 13_950, 98),
    ("seed-5", "LogicMaster", 13_480, 104),
    ("seed-6", "QuizChampion", 12_990, 95),
    ("seed-7", "StudyHero", 12_750, 88),
    ("seed-8", "DemoPlayer", 12_500, 92),
    ("seed-9", "LearnMaster", 12_250, 83),
    ("seed-10", "GamePro", 12_000, 79),
];

/// Simulated login/registration/score tracking against local storage.
///
/// No real backend, no token validation, no security guarantees; the score
/// log and user table exist so leaderboards and profile surfaces have
/// plausible data to render.
pub struct MockAccountService {
    store: Store,
    hub: ChangeHub,
}

impl MockAccountService {
    pub fn new(store: Store, hub: ChangeHub) -> Self {
        Self { store, hub }
    }

    fn demo_user() -> User {
        User {
            id: "demo".to_string(),
            username: "DemoPlayer".to_string(),
            email: DEMO_EMAIL.to_string(),
            total_score: 12_500,
            games_played: 92,
            created_at: Utc::now(),
            avatar: None,
        }
    }

    /// Build a throwaway account from an email address, the way the mock
    /// accepts any unknown credential pair.
    fn fabricate_user(email: &str) -> User {
        let username = email.split('@').next().unwrap_or(email).to_string();
        User {
            id: generate_id(),
            username,
            email: email.to_string(),
            total_score: 0,
            games_played: 0,
            created_at: Utc::now(),
            avatar: None,
        }
    }

    fn user_table(&self) -> Vec<UserRecord> {
        self.store.read(KEY_USER_TABLE)
    }

    fn set_session(&self, user: &User) {
        self.store.write(KEY_SESSION_USER, user);
        self.store.write(KEY_SESSION_TOKEN, &generate_token());
        self.hub.broadcast(ChangeEvent::SessionChanged {
            user: Some(user.clone()),
        });
    }

    /// The opaque token issued with the current session, if any.
    pub fn session_token(&self) -> Option<String> {
        self.store.read(KEY_SESSION_TOKEN)
    }

    // ===== Leaderboards =====

    /// All-time ranking across every player: stored accounts merged with
    /// the seeded mock players, highest total score first.
    pub fn global_leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .user_table()
            .iter()
            .map(|record| unranked_entry(&record.user))
            .collect();

        for (id, username, score, played) in SEED_PLAYERS {
            if entries.iter().any(|e| e.username == username) {
                continue;
            }
            entries.push(LeaderboardEntry {
                id: id.to_string(),
                username: username.to_string(),
                total_score: score,
                games_played: played,
                average_score: average(score, played),
                avatar: None,
                rank: 0,
            });
        }

        rank_and_truncate(entries, limit)
    }

    /// Ranking for a single game, aggregated from the score log.
    pub fn game_leaderboard(&self, game_id: &str, limit: usize) -> Vec<LeaderboardEntry> {
        let scores: HashMap<String, Vec<ScoreRecord>> = self.store.read(KEY_SCORE_LOG);
        let table = self.user_table();
        let session = self.current_user();

        let mut entries = Vec::new();
        for (user_id, records) in &scores {
            let total: u64 = records
                .iter()
                .filter(|r| r.game_id == game_id)
                .map(|r| r.score)
                .sum();
            let played = records.iter().filter(|r| r.game_id == game_id).count() as u64;
            if played == 0 {
                continue;
            }

            // Resolve the player from the user table, falling back to the
            // session for accounts fabricated at login.
            let user = table
                .iter()
                .find(|r| r.user.id == *user_id)
                .map(|r| &r.user)
                .or_else(|| session.as_ref().filter(|u| u.id == *user_id));
            let Some(user) = user else {
                debug!(user_id = %user_id, "Score log entry for unknown user, skipping");
                continue;
            };

            entries.push(LeaderboardEntry {
                id: user.id.clone(),
                username: user.username.clone(),
                total_score: total,
                games_played: played,
                average_score: average(total, played),
                avatar: user.avatar.clone(),
                rank: 0,
            });
        }

        rank_and_truncate(entries, limit)
    }
}

impl AccountService for MockAccountService {
    async fn login(&self, email: &str, password: &str) -> Result<User, AccountError> {
        tokio::time::sleep(Duration::from_millis(AUTH_DELAY_MS)).await;

        let user = if email.eq_ignore_ascii_case(DEMO_EMAIL) && password == DEMO_PASSWORD {
            Self::demo_user()
        } else if let Some(record) = self
            .user_table()
            .into_iter()
            .find(|r| r.user.email.eq_ignore_ascii_case(email))
        {
            if let Some(hash) = &record.password_hash {
                if !verify_password(password, hash) {
                    return Err(AccountError::InvalidCredentials);
                }
            }
            record.user
        } else {
            Self::fabricate_user(email)
        };

        self.set_session(&user);
        Ok(user)
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AccountError> {
        tokio::time::sleep(Duration::from_millis(AUTH_DELAY_MS)).await;

        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(AccountError::WeakPassword);
        }

        let mut table = self.user_table();
        if table
            .iter()
            .any(|r| r.user.email.eq_ignore_ascii_case(email))
        {
            return Err(AccountError::EmailTaken);
        }
        if table.iter().any(|r| r.user.username == username) {
            return Err(AccountError::UsernameTaken);
        }

        let user = User {
            id: generate_id(),
            username: username.to_string(),
            email: email.to_string(),
            total_score: 0,
            games_played: 0,
            created_at: Utc::now(),
            avatar: None,
        };

        let password_hash = match hash_password(password) {
            Ok(hash) => Some(hash),
            Err(e) => {
                warn!(error = %e, "Failed to hash password, storing account without credential check");
                None
            }
        };

        table.push(UserRecord {
            user: user.clone(),
            password_hash,
        });
        self.store.write(KEY_USER_TABLE, &table);
        self.set_session(&user);
        Ok(user)
    }

    fn logout(&self) {
        // The user table entry is retained; only the session goes away
        self.store.remove(KEY_SESSION_USER);
        self.store.remove(KEY_SESSION_TOKEN);
        self.hub
            .broadcast(ChangeEvent::SessionChanged { user: None });
    }

    fn update_score(&self, game_id: &str, score: u64) -> Option<User> {
        let mut user: User = self.store.read::<Option<User>>(KEY_SESSION_USER)?;

        let mut scores: HashMap<String, Vec<ScoreRecord>> = self.store.read(KEY_SCORE_LOG);
        scores.entry(user.id.clone()).or_default().push(ScoreRecord {
            game_id: game_id.to_string(),
            score,
            timestamp: Utc::now(),
        });
        self.store.write(KEY_SCORE_LOG, &scores);

        user.total_score += score;
        user.games_played += 1;
        self.store.write(KEY_SESSION_USER, &user);

        // Best-effort mirror into the user table
        let mut table = self.user_table();
        if let Some(record) = table.iter_mut().find(|r| r.user.id == user.id) {
            record.user.total_score = user.total_score;
            record.user.games_played = user.games_played;
            self.store.write(KEY_USER_TABLE, &table);
        }

        self.hub.broadcast(ChangeEvent::SessionChanged {
            user: Some(user.clone()),
        });
        Some(user)
    }

    fn current_user(&self) -> Option<User> {
        self.store.read(KEY_SESSION_USER)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn generate_token() -> String {
    random_string(TOKEN_LENGTH)
}

fn generate_id() -> String {
    random_string(ID_LENGTH)
}

fn random_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

fn unranked_entry(user: &User) -> LeaderboardEntry {
    LeaderboardEntry {
        id: user.id.clone(),
        username: user.username.clone(),
        total_score: user.total_score,
        games_played: user.games_played,
        average_score: average(user.total_score, user.games_played),
        avatar: user.avatar.clone(),
        rank: 0,
    }
}

fn average(total: u64, played: u64) -> f64 {
    if played == 0 {
        0.0
    } else {
        total as f64 / played as f64
    }
}

fn rank_and_truncate(mut entries: Vec<LeaderboardEntry>, limit: usize) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| b.total_score.cmp(&a.total_score));
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index + 1;
    }
    entries.truncate(limit);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("demo123").expect("Failed to hash password");
        assert!(verify_password("demo123", &hash));
        assert!(!verify_password("demo124", &hash));
        assert!(!verify_password("demo123", "not-a-hash"));
    }

    #[test]
    fn test_fabricated_user_takes_username_from_email() {
        let user = MockAccountService::fabricate_user("mathfan@example.com");
        assert_eq!(user.username, "mathfan");
        assert_eq!(user.email, "mathfan@example.com");
        assert_eq!(user.total_score, 0);
    }

    #[test]
    fn test_random_strings_are_unique() {
        assert_ne!(generate_token(), generate_token());
        assert_eq!(generate_id().len(), ID_LENGTH);
    }

    #[test]
    fn test_rank_assignment() {
        let entries = vec![
            LeaderboardEntry {
                id: "a".into(),
                username: "a".into(),
                total_score: 10,
                games_played: 1,
                average_score: 10.0,
                avatar: None,
                rank: 0,
            },
            LeaderboardEntry {
                id: "b".into(),
                username: "b".into(),
                total_score: 30,
                games_played: 1,
                average_score: 30.0,
                avatar: None,
                rank: 0,
            },
        ];

        let ranked = rank_and_truncate(entries, 10);
        assert_eq!(ranked[0].username, "b");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].rank, 2);
    }
}
