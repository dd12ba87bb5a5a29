//! Expense CSV export

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::Database;
use crate::error::{Error, Result};

/// Options for expense export
#[derive(Debug, Clone, Default)]
pub struct ExpenseExportOptions {
    /// Start date filter (inclusive)
    pub from: Option<NaiveDate>,
    /// End date filter (inclusive)
    pub to: Option<NaiveDate>,
    /// Only expenses logged against this budget
    pub budget_id: Option<i64>,
}

/// One exported CSV row
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseExportRow {
    pub date: String,
    pub budget: String,
    pub category: String,
    pub amount: f64,
    pub description: String,
}

impl Database {
    /// Expense rows for a user, oldest first
    pub fn export_expenses(
        &self,
        user_id: i64,
        opts: &ExpenseExportOptions,
    ) -> Result<Vec<ExpenseExportRow>> {
        let budgets = self.list_budgets(user_id)?;
        if let Some(budget_id) = opts.budget_id {
            if !budgets.iter().any(|b| b.id == budget_id) {
                return Err(Error::NotFound(format!("Budget {}", budget_id)));
            }
        }

        let mut rows: Vec<ExpenseExportRow> = self
            .list_all_expenses(user_id)?
            .into_iter()
            .filter(|e| opts.from.map_or(true, |from| e.date >= from))
            .filter(|e| opts.to.map_or(true, |to| e.date <= to))
            .filter(|e| opts.budget_id.map_or(true, |id| e.budget_id == id))
            .filter_map(|e| {
                let budget = budgets.iter().find(|b| b.id == e.budget_id)?;
                Some(ExpenseExportRow {
                    date: e.date.to_string(),
                    budget: budget.name.clone(),
                    category: budget.category.clone(),
                    amount: e.amount,
                    description: e.description.unwrap_or_default(),
                })
            })
            .collect();

        // list_all_expenses is newest first
        rows.reverse();
        Ok(rows)
    }

    /// Export a user's expenses as CSV text with a header row
    pub fn export_expenses_csv(&self, user_id: i64, opts: &ExpenseExportOptions) -> Result<String> {
        let rows = self.export_expenses(user_id, opts)?;
        expenses_to_csv(&rows)
    }
}

/// Render export rows as CSV text with a header row
///
/// Descriptions may span lines, so the text's line count is not the row count.
pub fn expenses_to_csv(rows: &[ExpenseExportRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if rows.is_empty() {
        writer.write_record(["date", "budget", "category", "amount", "description"])?;
    }
    for row in rows {
        writer.serialize(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::InvalidData(e.to_string()))
}
