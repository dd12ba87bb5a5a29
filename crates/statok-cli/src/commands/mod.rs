//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_db, load_config, resolve_user)
//! - `users` - User registration and listing
//! - `budgets` - Budget management
//! - `expenses` - Expense logging
//! - `goals` - Savings goals and their deposits/withdrawals
//! - `reports` - Analytics report generation
//! - `transfer` - CSV export and import
//! - `serve` - Web server command

pub mod budgets;
pub mod core;
pub mod expenses;
pub mod goals;
pub mod reports;
pub mod serve;
pub mod transfer;
pub mod users;

// Re-export command functions for main.rs
pub use budgets::*;
pub use core::*;
pub use expenses::*;
pub use goals::*;
pub use reports::*;
pub use serve::*;
pub use transfer::*;
pub use users::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
