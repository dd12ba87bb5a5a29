//! Expense command implementations

use anyhow::{Context, Result};
use statok_core::db::Database;
use statok_core::models::{NewExpense, User};

use super::{parse_date_arg, truncate};

pub fn cmd_expenses_list(
    db: &Database,
    user: &User,
    budget_id: Option<i64>,
    limit: usize,
) -> Result<()> {
    let expenses = match budget_id {
        Some(id) => db.list_expenses(user.id, id)?,
        None => db.list_all_expenses(user.id)?,
    };

    if expenses.is_empty() {
        println!("No expenses found.");
        return Ok(());
    }

    let budgets = db.list_budgets(user.id)?;
    let budget_name = |id: i64| {
        budgets
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.name.as_str())
            .unwrap_or("?")
    };

    println!();
    println!(
        "   {:>5} │ {:10} │ {:18} │ {:>10} │ Description",
        "ID", "Date", "Budget", "Amount"
    );
    println!("   ──────┼────────────┼────────────────────┼────────────┼────────────────────");

    for expense in expenses.iter().take(limit) {
        println!(
            "   {:>5} │ {:10} │ {:18} │ {:>10.2} │ {}",
            expense.id,
            expense.date,
            truncate(budget_name(expense.budget_id), 18),
            expense.amount,
            expense.description.as_deref().unwrap_or("")
        );
    }

    if expenses.len() > limit {
        println!();
        println!("   ... {} more (use --limit to show more)", expenses.len() - limit);
    }

    Ok(())
}

pub fn cmd_expenses_add(
    db: &Database,
    user: &User,
    budget_id: i64,
    amount: f64,
    description: Option<&str>,
    date: Option<&str>,
) -> Result<()> {
    let date = parse_date_arg(date, "date")?;
    let expense = db
        .add_expense(
            user.id,
            budget_id,
            &NewExpense {
                amount,
                description: description.map(String::from),
                date,
            },
        )
        .context("Failed to add expense")?;

    db.log_audit(&user.username, "create", Some("expense"), Some(expense.id), Some("cli"))?;

    println!(
        "✅ Logged ${:.2} on {} against budget {} (ID {})",
        expense.amount, expense.date, budget_id, expense.id
    );
    Ok(())
}

pub fn cmd_expenses_delete(db: &Database, user: &User, id: i64) -> Result<()> {
    db.delete_expense(user.id, id)
        .with_context(|| format!("Failed to delete expense {}", id))?;

    db.log_audit(&user.username, "delete", Some("expense"), Some(id), Some("cli"))?;

    println!("🗑️  Deleted expense {}", id);
    Ok(())
}
