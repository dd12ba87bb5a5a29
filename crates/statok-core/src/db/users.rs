//! User operations

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rusqlite::{params, OptionalExtension};
use tracing::info;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::User;

/// Hash a password with Argon2id and a per-user random salt
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::encode_b64(uuid::Uuid::new_v4().as_bytes())
        .map_err(|e| Error::Auth(format!("Failed to create salt: {}", e)))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Auth(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Map an `id, username, email, created_at` row
pub(super) fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let created_at: String = row.get(3)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        created_at: parse_datetime(&created_at),
    })
}

/// A unique-constraint failure means another registration took the name first
pub(super) fn user_insert_error(err: rusqlite::Error) -> Error {
    match err {
        rusqlite::Error::SqliteFailure(ref e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Error::Conflict("Username or email already registered".to_string())
        }
        other => other.into(),
    }
}

impl Database {
    /// Register a new user
    ///
    /// Usernames and emails are unique; a duplicate is a `Conflict`.
    pub fn create_user(&self, username: &str, email: &str, password: &str) -> Result<User> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() || email.is_empty() {
            return Err(Error::InvalidData(
                "Username and email are required".to_string(),
            ));
        }
        if !email.contains('@') {
            return Err(Error::InvalidData("Invalid email address".to_string()));
        }
        if password.len() < 8 {
            return Err(Error::InvalidData(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        let conn = self.conn()?;
        let taken: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ? OR email = ?)",
            params![username, email],
            |row| row.get(0),
        )?;
        if taken {
            return Err(Error::Conflict(
                "Username or email already registered".to_string(),
            ));
        }

        let password_hash = hash_password(password)?;
        conn.execute(
            "INSERT INTO users (username, email, password_hash) VALUES (?, ?, ?)",
            params![username, email, password_hash],
        )
        .map_err(user_insert_error)?;
        let id = conn.last_insert_rowid();
        info!(user_id = id, username, "User registered");

        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", id)))
    }

    /// Check credentials, returning the user on success
    ///
    /// Accepts either the username or the email as the login name.
    pub fn authenticate_user(&self, login: &str, password: &str) -> Result<User> {
        let conn = self.conn()?;
        let found: Option<(i64, String)> = conn
            .query_row(
                "SELECT id, password_hash FROM users WHERE username = ?1 OR email = ?1",
                params![login.trim()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match found {
            Some((id, hash)) if verify_password(password, &hash) => self
                .get_user(id)?
                .ok_or_else(|| Error::NotFound(format!("User {}", id))),
            _ => Err(Error::Auth("Invalid username or password".to_string())),
        }
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, username, email, created_at FROM users WHERE id = ?",
                params![id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Get a user by username
    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, username, email, created_at FROM users WHERE username = ?",
                params![username.trim()],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// List all users
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, username, email, created_at FROM users ORDER BY username")?;

        let users = stmt
            .query_map([], row_to_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(users)
    }
}
