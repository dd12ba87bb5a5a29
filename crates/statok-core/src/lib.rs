//! Statok Core Library
//!
//! Shared functionality for the Statok personal finance app:
//! - Database access and migrations (users, budgets, expenses, savings)
//! - Analytics over spending and savings with a linear-trend forecast
//! - Report period resolution
//! - Expense CSV import and export

pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod import;
pub mod models;
pub mod period;

/// Record fixtures for analytics tests
#[cfg(test)]
pub mod test_utils;

pub use analytics::{AnalyticsEngine, RecordSet, RecordSource};
pub use config::AnalyticsConfig;
pub use db::{AuditEntry, Database, Session};
pub use error::{Error, Result};
pub use export::{expenses_to_csv, ExpenseExportOptions, ExpenseExportRow};
pub use import::{parse_expenses_csv, ImportStats};
pub use period::{resolve_period, ReportWindow};
