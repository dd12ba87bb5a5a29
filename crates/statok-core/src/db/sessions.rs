//! Session token operations
//!
//! Tokens are random UUIDv4 strings handed to the client once. The database
//! only ever sees their SHA-256 digest.

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, OptionalExtension};
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::users::row_to_user;
use super::{format_datetime, Database};
use crate::error::Result;
use crate::models::User;

/// A freshly issued session
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Bearer token; not recoverable after creation
    pub token: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

impl Database {
    /// Issue a session for a user, valid for `ttl`
    pub fn create_session(&self, user_id: i64, ttl: Duration) -> Result<Session> {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let expires_at = Utc::now() + ttl;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sessions (token_hash, user_id, expires_at) VALUES (?, ?, ?)",
            params![hash_token(&token), user_id, format_datetime(expires_at)],
        )?;

        Ok(Session {
            token,
            user_id,
            expires_at,
        })
    }

    /// Look up the user behind a token; expired or unknown tokens give `None`
    pub fn resolve_session(&self, token: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                r#"
                SELECT u.id, u.username, u.email, u.created_at
                FROM sessions s
                JOIN users u ON u.id = s.user_id
                WHERE s.token_hash = ? AND s.expires_at > ?
                "#,
                params![hash_token(token), format_datetime(Utc::now())],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Revoke a session (logout). Returns whether a session was removed.
    pub fn delete_session(&self, token: &str) -> Result<bool> {
        let conn = self.conn()?;
        let removed = conn.execute(
            "DELETE FROM sessions WHERE token_hash = ?",
            params![hash_token(token)],
        )?;
        Ok(removed > 0)
    }

    /// Remove every expired session, returning how many were purged
    pub fn purge_expired_sessions(&self) -> Result<usize> {
        let conn = self.conn()?;
        let removed = conn.execute(
            "DELETE FROM sessions WHERE expires_at <= ?",
            params![format_datetime(Utc::now())],
        )?;
        Ok(removed)
    }
}
