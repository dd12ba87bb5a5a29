//! Savings goal command implementations

use anyhow::{Context, Result};
use chrono::NaiveDate;
use statok_core::db::Database;
use statok_core::models::{NewSavingsGoal, NewSavingsTransaction, TransactionType, User};

use super::{parse_date_arg, truncate};

pub fn cmd_goals_list(db: &Database, user: &User) -> Result<()> {
    let goals = db.list_goals(user.id)?;

    if goals.is_empty() {
        println!("No savings goals yet. Add one with 'statok goals add'.");
        return Ok(());
    }

    println!();
    println!("🎯 Savings goals for {}", user.username);
    println!(
        "   {:>4} │ {:20} │ {:12} │ {:>10} │ {:>10} │ {:>6} │ Deadline",
        "ID", "Name", "Category", "Saved", "Target", "%"
    );
    println!("   ─────┼──────────────────────┼──────────────┼────────────┼────────────┼────────┼────────────");

    for goal in &goals {
        let progress = if goal.target_amount > 0.0 {
            goal.current_amount / goal.target_amount * 100.0
        } else {
            0.0
        };
        println!(
            "   {:>4} │ {:20} │ {:12} │ {:>10.2} │ {:>10.2} │ {:>5.1}% │ {}",
            goal.id,
            truncate(&goal.name, 20),
            truncate(&goal.category, 12),
            goal.current_amount,
            goal.target_amount,
            progress,
            goal.deadline
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
    }

    Ok(())
}

pub fn cmd_goals_add(
    db: &Database,
    user: &User,
    name: &str,
    target: f64,
    category: &str,
    deadline: Option<&str>,
) -> Result<()> {
    let deadline = deadline
        .map(|d| {
            NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d")
                .context("Invalid --deadline date format (use YYYY-MM-DD)")
        })
        .transpose()?;

    let goal = db
        .create_goal(
            user.id,
            &NewSavingsGoal {
                name: name.to_string(),
                category: category.to_string(),
                target_amount: target,
                current_amount: 0.0,
                deadline,
            },
        )
        .context("Failed to create savings goal")?;

    db.log_audit(&user.username, "create", Some("savings_goal"), Some(goal.id), Some("cli"))?;

    println!(
        "✅ Created goal '{}' with a target of ${:.2} (ID {})",
        goal.name, goal.target_amount, goal.id
    );
    Ok(())
}

/// Record a deposit or withdrawal and show the goal's new balance
pub fn cmd_goals_transaction(
    db: &Database,
    user: &User,
    goal_id: i64,
    amount: f64,
    transaction_type: TransactionType,
    date: Option<&str>,
) -> Result<()> {
    let date = parse_date_arg(date, "date")?;
    let tx = db
        .add_savings_transaction(
            user.id,
            goal_id,
            &NewSavingsTransaction {
                amount,
                transaction_type,
                date,
            },
        )
        .with_context(|| format!("Failed to record {}", transaction_type))?;

    db.log_audit(
        &user.username,
        "create",
        Some("savings_transaction"),
        Some(tx.id),
        Some(transaction_type.as_str()),
    )?;

    let goal = db
        .get_goal(user.id, goal_id)?
        .with_context(|| format!("Savings goal {} not found", goal_id))?;

    let verb = match transaction_type {
        TransactionType::Deposit => "Deposited",
        TransactionType::Withdrawal => "Withdrew",
    };
    println!(
        "✅ {} ${:.2} ({}): '{}' now at ${:.2} of ${:.2}",
        verb, tx.amount, tx.date, goal.name, goal.current_amount, goal.target_amount
    );
    Ok(())
}

pub fn cmd_goals_delete(db: &Database, user: &User, id: i64) -> Result<()> {
    db.delete_goal(user.id, id)
        .with_context(|| format!("Failed to delete savings goal {}", id))?;

    db.log_audit(&user.username, "delete", Some("savings_goal"), Some(id), Some("cli"))?;

    println!("🗑️  Deleted savings goal {} and its transactions", id);
    Ok(())
}
