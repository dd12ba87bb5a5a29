//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_config` - Analytics settings from `--config` or the default location
//! - `resolve_user` - The user a command acts as
//! - `parse_date_arg` - Optional YYYY-MM-DD argument, defaulting to today
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use statok_core::db::Database;
use statok_core::models::User;
use statok_core::AnalyticsConfig;
use tracing::debug;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Load analytics settings, falling back to defaults when no file exists
pub fn load_config(config_path: Option<&Path>) -> Result<AnalyticsConfig> {
    AnalyticsConfig::load_or_default(config_path).context("Failed to load analytics config")
}

/// Find the user a command should act as
///
/// With no `--user`, a database holding exactly one user uses that user.
pub fn resolve_user(db: &Database, username: Option<&str>) -> Result<User> {
    let user = match username {
        Some(name) => db
            .get_user_by_username(name)?
            .with_context(|| format!("User '{}' not found", name))?,
        None => {
            let mut users = db.list_users()?;
            match users.len() {
                0 => bail!(
                    "No users yet. Create one with: statok users add <name> --email <email> --password <password>"
                ),
                1 => users.remove(0),
                _ => bail!("Several users exist; choose one with --user <username>"),
            }
        }
    };

    debug!(user = %user.username, "Acting as user");
    Ok(user)
}

/// Parse an optional YYYY-MM-DD argument, defaulting to today
pub fn parse_date_arg(value: Option<&str>, flag: &str) -> Result<NaiveDate> {
    match value {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .with_context(|| format!("Invalid --{} date format (use YYYY-MM-DD)", flag)),
        None => Ok(Utc::now().date_naive()),
    }
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else if db.is_encrypted()? {
        println!("   🔒 Encryption: ENABLED");
    } else {
        println!("   ⚠️  Encryption: DISABLED (set STATOK_DB_KEY to enable)");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Create a user: statok users add <name> --email <email> --password <password>");
    println!("  2. Add a budget: statok budgets add Groceries --category Food --amount 400");
    println!("  3. Start web UI: statok serve");

    Ok(())
}
