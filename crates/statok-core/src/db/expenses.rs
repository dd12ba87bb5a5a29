//! Expense operations

use rusqlite::{params, OptionalExtension};

use super::{date_column, Database};
use crate::error::{Error, Result};
use crate::models::{validate_positive, Expense, NewExpense};

pub(crate) fn row_to_expense(row: &rusqlite::Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        budget_id: row.get(1)?,
        amount: row.get(2)?,
        description: row.get(3)?,
        date: date_column(row, 4)?,
    })
}

fn clean_description(description: &Option<String>) -> Option<&str> {
    description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
}

impl Database {
    /// Log an expense against one of the user's budgets
    pub fn add_expense(
        &self,
        user_id: i64,
        budget_id: i64,
        expense: &NewExpense,
    ) -> Result<Expense> {
        validate_positive("Amount", expense.amount)?;
        if self.get_budget(user_id, budget_id)?.is_none() {
            return Err(Error::NotFound(format!("Budget {}", budget_id)));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO expenses (budget_id, amount, description, date) VALUES (?, ?, ?, ?)",
            params![
                budget_id,
                expense.amount,
                clean_description(&expense.description),
                expense.date.to_string()
            ],
        )?;
        let id = conn.last_insert_rowid();

        self.get_expense(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Expense {}", id)))
    }

    /// List a budget's expenses, newest first
    pub fn list_expenses(&self, user_id: i64, budget_id: i64) -> Result<Vec<Expense>> {
        if self.get_budget(user_id, budget_id)?.is_none() {
            return Err(Error::NotFound(format!("Budget {}", budget_id)));
        }

        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, budget_id, amount, description, date
            FROM expenses
            WHERE budget_id = ?
            ORDER BY date DESC, id DESC
            "#,
        )?;

        let expenses = stmt
            .query_map(params![budget_id], row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// List all of a user's expenses across budgets, newest first
    pub fn list_all_expenses(&self, user_id: i64) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT e.id, e.budget_id, e.amount, e.description, e.date
            FROM expenses e
            JOIN budgets b ON b.id = e.budget_id
            WHERE b.user_id = ?
            ORDER BY e.date DESC, e.id DESC
            "#,
        )?;

        let expenses = stmt
            .query_map(params![user_id], row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// Get an expense by ID
    pub fn get_expense(&self, user_id: i64, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let expense = conn
            .query_row(
                r#"
                SELECT e.id, e.budget_id, e.amount, e.description, e.date
                FROM expenses e
                JOIN budgets b ON b.id = e.budget_id
                WHERE e.id = ? AND b.user_id = ?
                "#,
                params![id, user_id],
                row_to_expense,
            )
            .optional()?;
        Ok(expense)
    }

    /// Update an expense's amount, description and date
    pub fn update_expense(&self, user_id: i64, id: i64, expense: &NewExpense) -> Result<Expense> {
        validate_positive("Amount", expense.amount)?;

        let conn = self.conn()?;
        let updated = conn.execute(
            r#"
            UPDATE expenses SET amount = ?, description = ?, date = ?
            WHERE id = ? AND budget_id IN (SELECT id FROM budgets WHERE user_id = ?)
            "#,
            params![
                expense.amount,
                clean_description(&expense.description),
                expense.date.to_string(),
                id,
                user_id
            ],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Expense {}", id)));
        }

        self.get_expense(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Expense {}", id)))
    }

    /// Delete an expense
    pub fn delete_expense(&self, user_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM expenses WHERE id = ? AND budget_id IN (SELECT id FROM budgets WHERE user_id = ?)",
            params![id, user_id],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Expense {}", id)));
        }
        Ok(())
    }
}
