//! User command implementations

use anyhow::{Context, Result};
use statok_core::db::Database;

use super::truncate;

pub fn cmd_users_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;

    if users.is_empty() {
        println!("No users yet. Create one with 'statok users add'.");
        return Ok(());
    }

    println!();
    println!("👤 Users");
    println!("   {:>4} │ {:20} │ {:30} │ Created", "ID", "Username", "Email");
    println!("   ─────┼──────────────────────┼────────────────────────────────┼────────────");
    for user in &users {
        println!(
            "   {:>4} │ {:20} │ {:30} │ {}",
            user.id,
            truncate(&user.username, 20),
            truncate(&user.email, 30),
            user.created_at.format("%Y-%m-%d")
        );
    }

    Ok(())
}

pub fn cmd_users_add(db: &Database, username: &str, email: &str, password: &str) -> Result<()> {
    let user = db
        .create_user(username, email, password)
        .context("Failed to create user")?;

    db.log_audit(&user.username, "register", Some("user"), Some(user.id), Some("cli"))?;

    println!("✅ Created user '{}' (ID {})", user.username, user.id);
    Ok(())
}
