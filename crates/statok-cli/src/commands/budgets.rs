//! Budget command implementations

use anyhow::{Context, Result};
use statok_core::db::Database;
use statok_core::models::{NewBudget, User};

use super::truncate;

pub fn cmd_budgets_list(db: &Database, user: &User) -> Result<()> {
    let budgets = db.list_budgets_with_spent(user.id)?;

    if budgets.is_empty() {
        println!("No budgets yet. Add one with 'statok budgets add'.");
        return Ok(());
    }

    println!();
    println!("💰 Budgets for {}", user.username);
    println!(
        "   {:>4} │ {:20} │ {:15} │ {:>10} │ {:>10} │ {:>10} │ {:>5}",
        "ID", "Name", "Category", "Budget", "Spent", "Remaining", "Count"
    );
    println!("   ─────┼──────────────────────┼─────────────────┼────────────┼────────────┼────────────┼──────");

    for item in &budgets {
        let remaining = if item.remaining < 0.0 {
            format!("\x1b[31m{:>10.2}\x1b[0m", item.remaining)
        } else {
            format!("{:>10.2}", item.remaining)
        };
        println!(
            "   {:>4} │ {:20} │ {:15} │ {:>10.2} │ {:>10.2} │ {} │ {:>5}",
            item.budget.id,
            truncate(&item.budget.name, 20),
            truncate(&item.budget.category, 15),
            item.budget.budget_amount,
            item.spent,
            remaining,
            item.expense_count
        );
    }

    let total_budget: f64 = budgets.iter().map(|b| b.budget.budget_amount).sum();
    let total_spent: f64 = budgets.iter().map(|b| b.spent).sum();
    println!();
    println!("   Total: ${:.2} spent of ${:.2}", total_spent, total_budget);

    Ok(())
}

pub fn cmd_budgets_add(
    db: &Database,
    user: &User,
    name: &str,
    category: &str,
    amount: f64,
) -> Result<()> {
    let budget = db
        .create_budget(
            user.id,
            &NewBudget {
                name: name.to_string(),
                category: category.to_string(),
                budget_amount: amount,
            },
        )
        .context("Failed to create budget")?;

    db.log_audit(&user.username, "create", Some("budget"), Some(budget.id), Some("cli"))?;

    println!(
        "✅ Created budget '{}' ({}) for ${:.2} (ID {})",
        budget.name, budget.category, budget.budget_amount, budget.id
    );
    Ok(())
}

pub fn cmd_budgets_update(
    db: &Database,
    user: &User,
    id: i64,
    name: Option<&str>,
    category: Option<&str>,
    amount: Option<f64>,
) -> Result<()> {
    let current = db
        .get_budget(user.id, id)?
        .with_context(|| format!("Budget {} not found", id))?;

    let budget = db.update_budget(
        user.id,
        id,
        &NewBudget {
            name: name.map(String::from).unwrap_or(current.name),
            category: category.map(String::from).unwrap_or(current.category),
            budget_amount: amount.unwrap_or(current.budget_amount),
        },
    )?;

    db.log_audit(&user.username, "update", Some("budget"), Some(id), Some("cli"))?;

    println!(
        "✅ Updated budget {}: '{}' ({}) ${:.2}",
        budget.id, budget.name, budget.category, budget.budget_amount
    );
    Ok(())
}

pub fn cmd_budgets_delete(db: &Database, user: &User, id: i64) -> Result<()> {
    db.delete_budget(user.id, id)
        .with_context(|| format!("Failed to delete budget {}", id))?;

    db.log_audit(&user.username, "delete", Some("budget"), Some(id), Some("cli"))?;

    println!("🗑️  Deleted budget {} and its expenses", id);
    Ok(())
}
