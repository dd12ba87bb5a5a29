//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Statok - Budgets, savings goals and spending analytics
#[derive(Parser)]
#[command(name = "statok")]
#[command(about = "Self-hosted personal finance tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "statok.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set STATOK_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    /// Analytics config file (defaults to ~/.config/statok/config.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// User to act as (optional when the database has a single user)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Manage users
    Users {
        #[command(subcommand)]
        action: Option<UsersAction>,
    },

    /// Manage budgets
    Budgets {
        #[command(subcommand)]
        action: Option<BudgetsAction>,
    },

    /// Manage expenses
    Expenses {
        #[command(subcommand)]
        action: Option<ExpensesAction>,
    },

    /// Manage savings goals
    Goals {
        #[command(subcommand)]
        action: Option<GoalsAction>,
    },

    /// Generate analytics reports
    Report {
        #[command(subcommand)]
        report_type: ReportType,
    },

    /// Export data to CSV
    Export {
        #[command(subcommand)]
        target: ExportTarget,
    },

    /// Import data from CSV
    Import {
        #[command(subcommand)]
        target: ImportTarget,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// List users
    List,

    /// Register a user
    Add {
        /// Username
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (at least 8 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
pub enum BudgetsAction {
    /// List budgets with spending to date
    List,

    /// Create a budget
    Add {
        /// Budget name
        name: String,

        /// Spending category
        #[arg(short, long)]
        category: String,

        /// Budgeted amount
        #[arg(short, long)]
        amount: f64,
    },

    /// Update a budget (unspecified fields keep their value)
    Update {
        /// Budget ID
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long)]
        amount: Option<f64>,
    },

    /// Delete a budget and all its expenses
    Delete {
        /// Budget ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// List expenses, newest first
    List {
        /// Only expenses for this budget ID
        #[arg(short, long)]
        budget: Option<i64>,

        /// Maximum number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Log an expense against a budget
    Add {
        /// Budget ID
        #[arg(short, long)]
        budget: i64,

        /// Amount spent
        #[arg(short, long)]
        amount: f64,

        /// What the money went on
        #[arg(short, long)]
        description: Option<String>,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum GoalsAction {
    /// List savings goals with progress
    List,

    /// Create a savings goal
    Add {
        /// Goal name
        name: String,

        /// Target amount
        #[arg(short, long)]
        target: f64,

        /// Goal category
        #[arg(short, long, default_value = "General")]
        category: String,

        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,
    },

    /// Add money to a goal
    Deposit {
        /// Goal ID
        id: i64,

        /// Amount
        amount: f64,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Take money out of a goal
    Withdraw {
        /// Goal ID
        id: i64,

        /// Amount
        amount: f64,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a goal and its transactions
    Delete {
        /// Goal ID
        id: i64,
    },
}

/// Period and output options shared by every report
#[derive(Args, Clone, Debug, Default)]
pub struct ReportArgs {
    /// Time period: 3, 6, 12 (months) or this-month, last-month, this-year,
    /// last-year, last-30-days, last-90-days, last-12-months, all
    #[arg(short, long)]
    pub period: Option<String>,

    /// Custom start date (YYYY-MM-DD) - overrides period
    #[arg(long)]
    pub from: Option<String>,

    /// Custom end date (YYYY-MM-DD) - overrides period
    #[arg(long)]
    pub to: Option<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Monthly expenditure with month-over-month growth
    Monthly {
        #[command(flatten)]
        args: ReportArgs,
    },

    /// Budget adherence
    Adherence {
        #[command(flatten)]
        args: ReportArgs,
    },

    /// Savings goal progress
    Savings {
        #[command(flatten)]
        args: ReportArgs,
    },

    /// Spending by category
    Categories {
        #[command(flatten)]
        args: ReportArgs,
    },

    /// Expense and savings forecast
    Forecast {
        #[command(flatten)]
        args: ReportArgs,
    },

    /// Insights drawn from all reports
    Insights {
        #[command(flatten)]
        args: ReportArgs,
    },

    /// Every report
    All {
        #[command(flatten)]
        args: ReportArgs,
    },
}

impl ReportType {
    pub fn args(&self) -> &ReportArgs {
        match self {
            Self::Monthly { args }
            | Self::Adherence { args }
            | Self::Savings { args }
            | Self::Categories { args }
            | Self::Forecast { args }
            | Self::Insights { args }
            | Self::All { args } => args,
        }
    }
}

#[derive(Subcommand)]
pub enum ExportTarget {
    /// Export expenses as CSV
    Expenses {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Only expenses for this budget ID
        #[arg(short, long)]
        budget: Option<i64>,
    },
}

#[derive(Subcommand)]
pub enum ImportTarget {
    /// Import expenses from CSV (columns: date, amount, description)
    Expenses {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,

        /// Budget ID to log the expenses against
        #[arg(short, long)]
        budget: i64,
    },
}
