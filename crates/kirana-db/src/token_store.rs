//! # Ephemeral Token Store
//!
//! Side key-value store for short-lived secrets: publish tokens (one-shot
//! authorization for store registration) and OTP codes. Lives in its own
//! SQLite handle, deliberately outside the main database and its
//! migration chain: rows here are disposable and the schema bootstraps
//! inline on open.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Token Lifecycle                              │
//! │                                                                     │
//! │  issue_publish_token() ──► row(token, created_at)                   │
//! │                                                                     │
//! │  verify_publish_token(t)                                            │
//! │    ├── prune rows older than 60 min                                 │
//! │    ├── row exists?  ──► delete it, return true   (single use)       │
//! │    └── otherwise    ──► return false                                │
//! │                                                                     │
//! │  store_otp(email, otp) ──► row(email, otp, created_at)              │
//! │  verify_otp(email, otp) ──► true iff younger than 10 min;           │
//! │                             deletes the row on success              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use rand::RngCore;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

/// How long a publish token stays valid.
pub const PUBLISH_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// How long an OTP stays valid by default.
pub const OTP_TTL: Duration = Duration::from_secs(10 * 60);

/// Bytes of entropy per publish token (43 chars once URL-safe encoded).
const TOKEN_BYTES: usize = 32;

/// Handle to the ephemeral token database.
///
/// Constructed explicitly and passed by reference, like [`crate::Database`].
#[derive(Debug, Clone)]
pub struct TokenStore {
    pool: SqlitePool,
}

impl TokenStore {
    /// Opens (and bootstraps) the token store at the given path.
    pub async fn open(path: impl Into<PathBuf>) -> DbResult<Self> {
        let path = path.into();
        info!(path = %path.display(), "Opening token store");

        let connect_url = format!("sqlite://{}?mode=rwc", path.display());
        let options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        let store = TokenStore { pool };
        store.bootstrap().await?;
        Ok(store)
    }

    /// In-memory token store for tests.
    pub async fn in_memory() -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite://:memory:")
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        let store = TokenStore { pool };
        store.bootstrap().await?;
        Ok(store)
    }

    /// Creates the two tables if they don't exist yet.
    async fn bootstrap(&self) -> DbResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS publish_tokens (
                 token      TEXT PRIMARY KEY NOT NULL,
                 created_at TEXT NOT NULL
             )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS otp_codes (
                 email      TEXT NOT NULL,
                 otp        TEXT NOT NULL,
                 created_at TEXT NOT NULL
             )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // =========================================================================
    // Publish Tokens
    // =========================================================================

    /// Issues a fresh single-use publish token.
    pub async fn issue_publish_token(&self) -> DbResult<String> {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        let token = URL_SAFE_NO_PAD.encode(bytes);

        let now = Utc::now();
        sqlx::query("INSERT INTO publish_tokens (token, created_at) VALUES (?1, ?2)")
            .bind(&token)
            .bind(now)
            .execute(&self.pool)
            .await?;

        debug!("Issued publish token");
        Ok(token)
    }

    /// Verifies and consumes a publish token.
    ///
    /// Valid iff the token exists and is younger than
    /// [`PUBLISH_TOKEN_TTL`]. A successful verify deletes the row, so a
    /// token can authorize exactly one operation. Expired rows are pruned
    /// on every call.
    pub async fn verify_publish_token(&self, token: &str) -> DbResult<bool> {
        if token.is_empty() {
            return Ok(false);
        }

        let cutoff = Utc::now()
            - chrono::Duration::from_std(PUBLISH_TOKEN_TTL)
                .map_err(|e| DbError::Internal(e.to_string()))?;

        sqlx::query("DELETE FROM publish_tokens WHERE created_at < ?1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        let deleted = sqlx::query("DELETE FROM publish_tokens WHERE token = ?1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(deleted.rows_affected() > 0)
    }

    // =========================================================================
    // OTP Codes
    // =========================================================================

    /// Stores an OTP issued to an email address. Generating and delivering
    /// the code is the caller's job.
    pub async fn store_otp(&self, email: &str, otp: &str) -> DbResult<()> {
        let now = Utc::now();
        sqlx::query("INSERT INTO otp_codes (email, otp, created_at) VALUES (?1, ?2, ?3)")
            .bind(email)
            .bind(otp)
            .bind(now)
            .execute(&self.pool)
            .await?;

        debug!(email = %email, "Stored OTP");
        Ok(())
    }

    /// Verifies and consumes an OTP with the default [`OTP_TTL`].
    pub async fn verify_otp(&self, email: &str, otp: &str) -> DbResult<bool> {
        self.verify_otp_with_ttl(email, otp, OTP_TTL).await
    }

    /// Verifies and consumes an OTP with an explicit expiry window.
    pub async fn verify_otp_with_ttl(
        &self,
        email: &str,
        otp: &str,
        ttl: Duration,
    ) -> DbResult<bool> {
        let cutoff = Utc::now()
            - chrono::Duration::from_std(ttl).map_err(|e| DbError::Internal(e.to_string()))?;

        let deleted = sqlx::query(
            "DELETE FROM otp_codes WHERE email = ?1 AND otp = ?2 AND created_at >= ?3",
        )
        .bind(email)
        .bind(otp)
        .bind(cutoff)
        .execute(&self.pool)
        .await?;

        Ok(deleted.rows_affected() > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_token_roundtrip_is_single_use() {
        let store = TokenStore::in_memory().await.unwrap();

        let token = store.issue_publish_token().await.unwrap();
        assert!(token.len() >= 40);

        assert!(store.verify_publish_token(&token).await.unwrap());
        // second use must fail
        assert!(!store.verify_publish_token(&token).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_and_empty_tokens_fail() {
        let store = TokenStore::in_memory().await.unwrap();

        assert!(!store.verify_publish_token("no-such-token").await.unwrap());
        assert!(!store.verify_publish_token("").await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_publish_token_is_pruned() {
        let store = TokenStore::in_memory().await.unwrap();

        // plant a token created beyond the TTL
        let stale = Utc::now() - chrono::Duration::hours(2);
        sqlx::query("INSERT INTO publish_tokens (token, created_at) VALUES (?1, ?2)")
            .bind("stale-token")
            .bind(stale)
            .execute(&store.pool)
            .await
            .unwrap();

        assert!(!store.verify_publish_token("stale-token").await.unwrap());

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM publish_tokens")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn test_otp_verify_consumes() {
        let store = TokenStore::in_memory().await.unwrap();

        store.store_otp("asha@example.com", "482910").await.unwrap();

        // wrong code, wrong email, then the real one
        assert!(!store.verify_otp("asha@example.com", "000000").await.unwrap());
        assert!(!store.verify_otp("other@example.com", "482910").await.unwrap());
        assert!(store.verify_otp("asha@example.com", "482910").await.unwrap());
        // consumed
        assert!(!store.verify_otp("asha@example.com", "482910").await.unwrap());
    }

    #[tokio::test]
    async fn test_otp_expiry_window() {
        let store = TokenStore::in_memory().await.unwrap();

        let stale = Utc::now() - chrono::Duration::minutes(30);
        sqlx::query("INSERT INTO otp_codes (email, otp, created_at) VALUES (?1, ?2, ?3)")
            .bind("asha@example.com")
            .bind("482910")
            .bind(stale)
            .execute(&store.pool)
            .await
            .unwrap();

        assert!(!store.verify_otp("asha@example.com", "482910").await.unwrap());

        // a generous window accepts the same row
        let ttl = Duration::from_secs(3600);
        store.store_otp("asha@example.com", "482910").await.unwrap();
        assert!(store
            .verify_otp_with_ttl("asha@example.com", "482910", ttl)
            .await
            .unwrap());
    }
}
