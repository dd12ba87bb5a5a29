//! Budget operations
//!
//! Every query is scoped to the owning user; another user's budget behaves
//! exactly like a missing one.

use rusqlite::{params, OptionalExtension};

use super::{date_column, Database};
use crate::error::{Error, Result};
use crate::models::{validate_name, validate_non_negative, Budget, BudgetWithSpent, NewBudget};

const BUDGET_COLUMNS: &str = "id, user_id, name, category, budget_amount, created_date";

pub(crate) fn row_to_budget(row: &rusqlite::Row<'_>) -> rusqlite::Result<Budget> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        category: row.get(3)?,
        budget_amount: row.get(4)?,
        created_date: date_column(row, 5)?,
    })
}

fn validate_budget(budget: &NewBudget) -> Result<()> {
    validate_name("Budget name", &budget.name)?;
    validate_name("Category", &budget.category)?;
    validate_non_negative("Budget amount", budget.budget_amount)
}

impl Database {
    /// Create a budget for a user
    pub fn create_budget(&self, user_id: i64, budget: &NewBudget) -> Result<Budget> {
        validate_budget(budget)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO budgets (user_id, name, category, budget_amount) VALUES (?, ?, ?, ?)",
            params![
                user_id,
                budget.name.trim(),
                budget.category.trim(),
                budget.budget_amount
            ],
        )?;
        let id = conn.last_insert_rowid();

        self.get_budget(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Budget {}", id)))
    }

    /// List a user's budgets, newest first
    pub fn list_budgets(&self, user_id: i64) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM budgets WHERE user_id = ? ORDER BY created_date DESC, id DESC",
            BUDGET_COLUMNS
        ))?;

        let budgets = stmt
            .query_map(params![user_id], row_to_budget)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(budgets)
    }

    /// List a user's budgets with all-time spending (dashboard view)
    pub fn list_budgets_with_spent(&self, user_id: i64) -> Result<Vec<BudgetWithSpent>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT b.id, b.user_id, b.name, b.category, b.budget_amount, b.created_date,
                   COALESCE(SUM(e.amount), 0) AS spent,
                   COUNT(e.id) AS expense_count
            FROM budgets b
            LEFT JOIN expenses e ON e.budget_id = b.id
            WHERE b.user_id = ?
            GROUP BY b.id
            ORDER BY b.created_date DESC, b.id DESC
            "#,
        )?;

        let budgets = stmt
            .query_map(params![user_id], |row| {
                let budget = row_to_budget(row)?;
                let spent: f64 = row.get(6)?;
                Ok(BudgetWithSpent {
                    remaining: budget.budget_amount - spent,
                    budget,
                    spent,
                    expense_count: row.get(7)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(budgets)
    }

    /// Get a budget by ID
    pub fn get_budget(&self, user_id: i64, id: i64) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let budget = conn
            .query_row(
                &format!(
                    "SELECT {} FROM budgets WHERE id = ? AND user_id = ?",
                    BUDGET_COLUMNS
                ),
                params![id, user_id],
                row_to_budget,
            )
            .optional()?;
        Ok(budget)
    }

    /// Update a budget's name, category and amount
    pub fn update_budget(&self, user_id: i64, id: i64, budget: &NewBudget) -> Result<Budget> {
        validate_budget(budget)?;

        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE budgets SET name = ?, category = ?, budget_amount = ? WHERE id = ? AND user_id = ?",
            params![
                budget.name.trim(),
                budget.category.trim(),
                budget.budget_amount,
                id,
                user_id
            ],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Budget {}", id)));
        }

        self.get_budget(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Budget {}", id)))
    }

    /// Delete a budget and its expenses
    pub fn delete_budget(&self, user_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        // Expenses go with it through ON DELETE CASCADE
        let deleted = conn.execute(
            "DELETE FROM budgets WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Budget {}", id)));
        }
        Ok(())
    }
}
