/// Server-side session store
///
/// Login establishes a session row keyed by an opaque random token; the
/// token travels to the browser inside a signed cookie (the web layer owns
/// the signing). Resolving a request back to a user means looking the token
/// up here — a token that is unknown, expired, or revoked resolves to
/// nothing, and the request is treated as anonymous.
///
/// The token is 32 bytes from the OS RNG, hex-encoded. It carries no
/// user data; all state lives in the `sessions` table.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sessions (
///     token VARCHAR(64) PRIMARY KEY,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     expires_at TIMESTAMPTZ NOT NULL
/// );
/// ```

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

/// Number of random bytes in a session token (hex-encoded to 64 chars)
const TOKEN_BYTES: usize = 32;

/// A live session binding an opaque token to a user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// Opaque session token (hex-encoded random bytes)
    pub token: String,

    /// The authenticated user
    pub user_id: Uuid,

    /// When the session was established
    pub created_at: DateTime<Utc>,

    /// When the session stops resolving
    pub expires_at: DateTime<Utc>,
}

/// Generates a fresh opaque session token
///
/// 32 bytes of OS randomness, hex-encoded.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

impl Session {
    /// Establishes a new session for `user_id` with the given lifetime
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist (foreign key violation)
    /// or the database connection fails.
    pub async fn create(pool: &PgPool, user_id: Uuid, ttl: Duration) -> Result<Self, sqlx::Error> {
        let token = generate_token();
        let expires_at = Utc::now() + ttl;

        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (token, user_id, expires_at)
            VALUES ($1, $2, $3)
            RETURNING token, user_id, created_at, expires_at
            "#,
        )
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(pool)
        .await?;

        debug!(user_id = %session.user_id, "Session established");
        Ok(session)
    }

    /// Resolves a token to a live session
    ///
    /// Returns `None` for unknown, revoked, or expired tokens — all three
    /// look identical to the caller, which treats the request as anonymous.
    /// Expiry is checked inside the query, so a stale row never resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn resolve(pool: &PgPool, token: &str) -> Result<Option<Self>, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT token, user_id, created_at, expires_at
            FROM sessions
            WHERE token = $1 AND expires_at > NOW()
            "#,
        )
        .bind(token)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Revokes a session (logout)
    ///
    /// Idempotent: revoking an unknown or already-revoked token succeeds
    /// and reports false.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn revoke(pool: &PgPool, token: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes all expired session rows
    ///
    /// Expired tokens already fail to resolve; this only reclaims storage.
    /// Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;

        if result.rows_affected() > 0 {
            debug!(purged = result.rows_affected(), "Purged expired sessions");
        }
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_length() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_token_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
    }

    // Create/resolve/revoke against a live database are covered in
    // tests/store_tests.rs
}
