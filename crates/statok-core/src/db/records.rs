//! Analytics record source backed by the database

use chrono::NaiveDate;
use rusqlite::params;

use super::budgets::row_to_budget;
use super::expenses::row_to_expense;
use super::Database;
use crate::analytics::RecordSource;
use crate::error::Result;
use crate::models::{Budget, Expense, SavingsGoal, SavingsTransaction};

impl RecordSource for Database {
    fn budgets(&self, user_id: i64) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, name, category, budget_amount, created_date
            FROM budgets
            WHERE user_id = ?
            ORDER BY id
            "#,
        )?;

        let budgets = stmt
            .query_map(params![user_id], row_to_budget)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(budgets)
    }

    fn expenses(&self, user_id: i64, from: NaiveDate, to: NaiveDate) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT e.id, e.budget_id, e.amount, e.description, e.date
            FROM expenses e
            JOIN budgets b ON b.id = e.budget_id
            WHERE b.user_id = ? AND e.date >= ? AND e.date <= ?
            ORDER BY e.date, e.id
            "#,
        )?;

        let expenses = stmt
            .query_map(
                params![user_id, from.to_string(), to.to_string()],
                row_to_expense,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    fn savings_goals(&self, user_id: i64) -> Result<Vec<SavingsGoal>> {
        self.list_goals(user_id)
    }

    fn savings_transactions(
        &self,
        user_id: i64,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<SavingsTransaction>> {
        self.list_user_savings_transactions(user_id, range)
    }
}
