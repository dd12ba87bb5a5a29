//! Statok CLI - Budgets, savings goals and spending analytics
//!
//! Usage:
//!   statok init                      Initialize database
//!   statok users add NAME ...        Register a user
//!   statok budgets add NAME ...      Create a budget
//!   statok report all --period 6     Print every analytics report
//!   statok serve --port 3000         Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use statok_core::models::TransactionType;
use statok_core::AnalyticsEngine;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            static_dir,
        } => {
            let analytics = commands::load_config(cli.config.as_deref())?;
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                cli.no_encrypt,
                static_dir.as_deref(),
                analytics,
            )
            .await
        }
        Commands::Users { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(UsersAction::List) => commands::cmd_users_list(&db),
                Some(UsersAction::Add {
                    username,
                    email,
                    password,
                }) => commands::cmd_users_add(&db, &username, &email, &password),
            }
        }
        Commands::Budgets { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let user = commands::resolve_user(&db, cli.user.as_deref())?;
            match action {
                None | Some(BudgetsAction::List) => commands::cmd_budgets_list(&db, &user),
                Some(BudgetsAction::Add {
                    name,
                    category,
                    amount,
                }) => commands::cmd_budgets_add(&db, &user, &name, &category, amount),
                Some(BudgetsAction::Update {
                    id,
                    name,
                    category,
                    amount,
                }) => commands::cmd_budgets_update(
                    &db,
                    &user,
                    id,
                    name.as_deref(),
                    category.as_deref(),
                    amount,
                ),
                Some(BudgetsAction::Delete { id }) => commands::cmd_budgets_delete(&db, &user, id),
            }
        }
        Commands::Expenses { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let user = commands::resolve_user(&db, cli.user.as_deref())?;
            match action {
                None => commands::cmd_expenses_list(&db, &user, None, 20),
                Some(ExpensesAction::List { budget, limit }) => {
                    commands::cmd_expenses_list(&db, &user, budget, limit)
                }
                Some(ExpensesAction::Add {
                    budget,
                    amount,
                    description,
                    date,
                }) => commands::cmd_expenses_add(
                    &db,
                    &user,
                    budget,
                    amount,
                    description.as_deref(),
                    date.as_deref(),
                ),
                Some(ExpensesAction::Delete { id }) => {
                    commands::cmd_expenses_delete(&db, &user, id)
                }
            }
        }
        Commands::Goals { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let user = commands::resolve_user(&db, cli.user.as_deref())?;
            match action {
                None | Some(GoalsAction::List) => commands::cmd_goals_list(&db, &user),
                Some(GoalsAction::Add {
                    name,
                    target,
                    category,
                    deadline,
                }) => commands::cmd_goals_add(
                    &db,
                    &user,
                    &name,
                    target,
                    &category,
                    deadline.as_deref(),
                ),
                Some(GoalsAction::Deposit { id, amount, date }) => commands::cmd_goals_transaction(
                    &db,
                    &user,
                    id,
                    amount,
                    TransactionType::Deposit,
                    date.as_deref(),
                ),
                Some(GoalsAction::Withdraw { id, amount, date }) => {
                    commands::cmd_goals_transaction(
                        &db,
                        &user,
                        id,
                        amount,
                        TransactionType::Withdrawal,
                        date.as_deref(),
                    )
                }
                Some(GoalsAction::Delete { id }) => commands::cmd_goals_delete(&db, &user, id),
            }
        }
        Commands::Report { report_type } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let user = commands::resolve_user(&db, cli.user.as_deref())?;
            let engine = AnalyticsEngine::new(commands::load_config(cli.config.as_deref())?);
            commands::cmd_report(&db, &engine, &user, &report_type, Utc::now().date_naive())
        }
        Commands::Export { target } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let user = commands::resolve_user(&db, cli.user.as_deref())?;
            match target {
                ExportTarget::Expenses {
                    output,
                    from,
                    to,
                    budget,
                } => commands::cmd_export_expenses(
                    &db,
                    &user,
                    output.as_deref(),
                    from.as_deref(),
                    to.as_deref(),
                    budget,
                ),
            }
        }
        Commands::Import { target } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let user = commands::resolve_user(&db, cli.user.as_deref())?;
            match target {
                ImportTarget::Expenses { file, budget } => {
                    commands::cmd_import_expenses(&db, &user, &file, budget)
                }
            }
        }
    }
}
