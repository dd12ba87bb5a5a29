//! Savings goal and savings transaction operations
//!
//! A goal's `current_amount` is kept in step with its transactions: adding a
//! deposit raises it, a withdrawal lowers it, and deleting a transaction
//! reverses whichever it was. Each change runs in one SQL transaction.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{date_column, optional_date_column, Database};
use crate::error::{Error, Result};
use crate::models::{
    validate_name, validate_non_negative, validate_positive, NewSavingsGoal,
    NewSavingsTransaction, SavingsGoal, SavingsTransaction, TransactionType,
};

const GOAL_COLUMNS: &str = "id, user_id, name, category, target_amount, current_amount, deadline";

pub(crate) fn row_to_goal(row: &rusqlite::Row<'_>) -> rusqlite::Result<SavingsGoal> {
    Ok(SavingsGoal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        category: row.get(3)?,
        target_amount: row.get(4)?,
        current_amount: row.get(5)?,
        deadline: optional_date_column(row, 6)?,
    })
}

pub(crate) fn row_to_savings_transaction(
    row: &rusqlite::Row<'_>,
) -> rusqlite::Result<SavingsTransaction> {
    let kind: String = row.get(3)?;
    Ok(SavingsTransaction {
        id: row.get(0)?,
        goal_id: row.get(1)?,
        amount: row.get(2)?,
        transaction_type: kind.parse::<TransactionType>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                rusqlite::types::Type::Text,
                e.into(),
            )
        })?,
        date: date_column(row, 4)?,
    })
}

fn validate_goal(goal: &NewSavingsGoal) -> Result<()> {
    validate_name("Goal name", &goal.name)?;
    validate_name("Category", &goal.category)?;
    validate_non_negative("Target amount", goal.target_amount)?;
    validate_non_negative("Current amount", goal.current_amount)
}

impl Database {
    /// Create a savings goal for a user
    pub fn create_goal(&self, user_id: i64, goal: &NewSavingsGoal) -> Result<SavingsGoal> {
        validate_goal(goal)?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO savings_goals (user_id, name, category, target_amount, current_amount, deadline)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                goal.name.trim(),
                goal.category.trim(),
                goal.target_amount,
                goal.current_amount,
                goal.deadline.map(|d| d.to_string())
            ],
        )?;
        let id = conn.last_insert_rowid();

        self.get_goal(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Savings goal {}", id)))
    }

    /// List a user's savings goals
    pub fn list_goals(&self, user_id: i64) -> Result<Vec<SavingsGoal>> {
        let conn = self.conn()?;
        // Goals without a deadline sort last
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM savings_goals WHERE user_id = ? ORDER BY deadline IS NULL, deadline, id",
            GOAL_COLUMNS
        ))?;

        let goals = stmt
            .query_map(params![user_id], row_to_goal)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(goals)
    }

    /// Get a savings goal by ID
    pub fn get_goal(&self, user_id: i64, id: i64) -> Result<Option<SavingsGoal>> {
        let conn = self.conn()?;
        let goal = conn
            .query_row(
                &format!(
                    "SELECT {} FROM savings_goals WHERE id = ? AND user_id = ?",
                    GOAL_COLUMNS
                ),
                params![id, user_id],
                row_to_goal,
            )
            .optional()?;
        Ok(goal)
    }

    /// Update a goal's name, category, target and deadline
    ///
    /// The saved amount only moves through savings transactions, so
    /// `current_amount` in the update is ignored.
    pub fn update_goal(
        &self,
        user_id: i64,
        id: i64,
        goal: &NewSavingsGoal,
    ) -> Result<SavingsGoal> {
        validate_goal(goal)?;

        let conn = self.conn()?;
        let updated = conn.execute(
            r#"
            UPDATE savings_goals SET name = ?, category = ?, target_amount = ?, deadline = ?
            WHERE id = ? AND user_id = ?
            "#,
            params![
                goal.name.trim(),
                goal.category.trim(),
                goal.target_amount,
                goal.deadline.map(|d| d.to_string()),
                id,
                user_id
            ],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Savings goal {}", id)));
        }

        self.get_goal(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Savings goal {}", id)))
    }

    /// Delete a savings goal and its transactions
    pub fn delete_goal(&self, user_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM savings_goals WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Savings goal {}", id)));
        }
        Ok(())
    }

    /// Record a deposit or withdrawal and move the goal's saved amount
    ///
    /// A withdrawal larger than the saved amount is rejected.
    pub fn add_savings_transaction(
        &self,
        user_id: i64,
        goal_id: i64,
        tx: &NewSavingsTransaction,
    ) -> Result<SavingsTransaction> {
        validate_positive("Amount", tx.amount)?;

        let conn = self.conn()?;

        // Use explicit transaction for atomicity
        conn.execute("BEGIN TRANSACTION", [])?;

        let result = (|| -> Result<SavingsTransaction> {
            let current: f64 = conn
                .query_row(
                    "SELECT current_amount FROM savings_goals WHERE id = ? AND user_id = ?",
                    params![goal_id, user_id],
                    |row| row.get(0),
                )
                .optional()?
                .ok_or_else(|| Error::NotFound(format!("Savings goal {}", goal_id)))?;

            if tx.transaction_type == TransactionType::Withdrawal && tx.amount > current {
                return Err(Error::InvalidData(format!(
                    "Withdrawal of {:.2} exceeds saved amount of {:.2}",
                    tx.amount, current
                )));
            }

            conn.execute(
                "INSERT INTO savings_transactions (goal_id, amount, transaction_type, date) VALUES (?, ?, ?, ?)",
                params![
                    goal_id,
                    tx.amount,
                    tx.transaction_type.as_str(),
                    tx.date.to_string()
                ],
            )?;
            let id = conn.last_insert_rowid();

            conn.execute(
                "UPDATE savings_goals SET current_amount = current_amount + ? WHERE id = ?",
                params![tx.transaction_type.sign() * tx.amount, goal_id],
            )?;

            Ok(SavingsTransaction {
                id,
                goal_id,
                amount: tx.amount,
                transaction_type: tx.transaction_type,
                date: tx.date,
            })
        })();

        match result {
            Ok(created) => {
                conn.execute("COMMIT", [])?;
                Ok(created)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }

    /// List a goal's transactions, newest first
    pub fn list_savings_transactions(
        &self,
        user_id: i64,
        goal_id: i64,
    ) -> Result<Vec<SavingsTransaction>> {
        if self.get_goal(user_id, goal_id)?.is_none() {
            return Err(Error::NotFound(format!("Savings goal {}", goal_id)));
        }

        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, goal_id, amount, transaction_type, date
            FROM savings_transactions
            WHERE goal_id = ?
            ORDER BY date DESC, id DESC
            "#,
        )?;

        let transactions = stmt
            .query_map(params![goal_id], row_to_savings_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Savings transactions across all of a user's goals, optionally within a range
    pub fn list_user_savings_transactions(
        &self,
        user_id: i64,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<SavingsTransaction>> {
        let (from, to) = match range {
            Some((from, to)) => (Some(from.to_string()), Some(to.to_string())),
            None => (None, None),
        };

        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT st.id, st.goal_id, st.amount, st.transaction_type, st.date
            FROM savings_transactions st
            JOIN savings_goals sg ON sg.id = st.goal_id
            WHERE sg.user_id = ?1
              AND (?2 IS NULL OR st.date >= ?2)
              AND (?3 IS NULL OR st.date <= ?3)
            ORDER BY st.date, st.id
            "#,
        )?;

        let transactions = stmt
            .query_map(params![user_id, from, to], row_to_savings_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Delete a savings transaction and undo its effect on the goal
    ///
    /// The saved amount never drops below zero.
    pub fn delete_savings_transaction(&self, user_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;

        conn.execute("BEGIN TRANSACTION", [])?;

        let result = (|| -> Result<()> {
            let tx = conn
                .query_row(
                    r#"
                    SELECT st.id, st.goal_id, st.amount, st.transaction_type, st.date
                    FROM savings_transactions st
                    JOIN savings_goals sg ON sg.id = st.goal_id
                    WHERE st.id = ? AND sg.user_id = ?
                    "#,
                    params![id, user_id],
                    row_to_savings_transaction,
                )
                .optional()?
                .ok_or_else(|| Error::NotFound(format!("Savings transaction {}", id)))?;

            conn.execute(
                "UPDATE savings_goals SET current_amount = MAX(0, current_amount - ?) WHERE id = ?",
                params![tx.transaction_type.sign() * tx.amount, tx.goal_id],
            )?;
            conn.execute("DELETE FROM savings_transactions WHERE id = ?", params![id])?;
            Ok(())
        })();

        match result {
            Ok(()) => {
                conn.execute("COMMIT", [])?;
                Ok(())
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }
}
