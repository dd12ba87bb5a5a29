//! Expense CSV import
//!
//! Accepts a header row naming at least `date` and `amount` columns; a
//! `description` (or `memo`) column is optional. Column order does not matter.

use std::io::Read;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use rusqlite::params;
use serde::Serialize;
use tracing::{debug, info};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::NewExpense;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Result of an expense import
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportStats {
    pub imported: usize,
    /// Rows without a positive amount
    pub skipped: usize,
}

struct Columns {
    date: usize,
    amount: usize,
    description: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };

        Ok(Self {
            date: find(&["date"])
                .ok_or_else(|| Error::InvalidData("Missing 'date' column".to_string()))?,
            amount: find(&["amount"])
                .ok_or_else(|| Error::InvalidData("Missing 'amount' column".to_string()))?,
            description: find(&["description", "memo"]),
        })
    }
}

/// Parse a date in one of the accepted formats
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// Parse an amount, tolerating currency symbols and thousands separators
///
/// Bank exports often list debits as negatives, so the sign is dropped.
pub fn parse_amount(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    let cleaned = cleaned
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(cleaned.as_str());

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite())
        .map(f64::abs)
}

/// Parse expense rows from CSV
///
/// Zero-amount rows are kept so the import can count them as skipped; any
/// unparseable date or amount fails the whole file with the offending line
/// number.
pub fn parse_expenses_csv<R: Read>(reader: R) -> Result<Vec<NewExpense>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(csv_reader.headers()?)?;
    let mut expenses = Vec::new();

    for (idx, record) in csv_reader.records().enumerate() {
        let record = record?;
        // Header is line 1
        let line = idx + 2;

        let date_str = record.get(columns.date).unwrap_or_default();
        let date = parse_date(date_str).ok_or_else(|| {
            Error::InvalidData(format!("Line {}: invalid date '{}'", line, date_str))
        })?;

        let amount_str = record.get(columns.amount).unwrap_or_default();
        let amount = parse_amount(amount_str).ok_or_else(|| {
            Error::InvalidData(format!("Line {}: invalid amount '{}'", line, amount_str))
        })?;

        let description = columns
            .description
            .and_then(|i| record.get(i))
            .filter(|d| !d.is_empty())
            .map(String::from);

        expenses.push(NewExpense {
            amount,
            description,
            date,
        });
    }

    debug!(count = expenses.len(), "Parsed expense CSV");
    Ok(expenses)
}

impl Database {
    /// Parse a CSV file and log every row against one budget
    pub fn import_expenses_csv<R: Read>(
        &self,
        user_id: i64,
        budget_id: i64,
        reader: R,
    ) -> Result<ImportStats> {
        let expenses = parse_expenses_csv(reader)?;
        self.import_expenses(user_id, budget_id, &expenses)
    }

    /// Insert parsed expenses against one budget, all or nothing
    pub fn import_expenses(
        &self,
        user_id: i64,
        budget_id: i64,
        expenses: &[NewExpense],
    ) -> Result<ImportStats> {
        if self.get_budget(user_id, budget_id)?.is_none() {
            return Err(Error::NotFound(format!("Budget {}", budget_id)));
        }

        let conn = self.conn()?;
        conn.execute("BEGIN TRANSACTION", [])?;

        let result = (|| -> Result<ImportStats> {
            let mut stats = ImportStats::default();
            let mut stmt = conn.prepare(
                "INSERT INTO expenses (budget_id, amount, description, date) VALUES (?, ?, ?, ?)",
            )?;

            for expense in expenses {
                if expense.amount <= 0.0 {
                    debug!(date = %expense.date, "Skipping row without a positive amount");
                    stats.skipped += 1;
                    continue;
                }
                let description = expense
                    .description
                    .as_deref()
                    .map(str::trim)
                    .filter(|d| !d.is_empty());
                stmt.execute(params![
                    budget_id,
                    expense.amount,
                    description,
                    expense.date.to_string()
                ])?;
                stats.imported += 1;
            }
            Ok(stats)
        })();

        match result {
            Ok(stats) => {
                conn.execute("COMMIT", [])?;
                info!(
                    budget_id,
                    imported = stats.imported,
                    skipped = stats.skipped,
                    "Imported expenses"
                );
                Ok(stats)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewBudget;

    #[test]
    fn test_parse_amount_formats() {
        assert_eq!(parse_amount("12.50"), Some(12.5));
        assert_eq!(parse_amount("$1,234.56"), Some(1234.56));
        assert_eq!(parse_amount("-45.00"), Some(45.0));
        assert_eq!(parse_amount("(9.99)"), Some(9.99));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 7);
        assert_eq!(parse_date("2026-03-07"), expected);
        assert_eq!(parse_date("03/07/2026"), expected);
        assert_eq!(parse_date("2026/03/07"), expected);
        assert_eq!(parse_date("7 March"), None);
    }

    #[test]
    fn test_parse_expenses_csv() {
        let data = "\
Amount,Date,Description
12.50,2026-01-05,Coffee beans
\"$1,020.00\",01/20/2026,
0.00,2026-01-21,Refund placeholder
";
        let expenses = parse_expenses_csv(data.as_bytes()).unwrap();
        assert_eq!(expenses.len(), 3);
        assert_eq!(expenses[0].amount, 12.5);
        assert_eq!(expenses[0].description.as_deref(), Some("Coffee beans"));
        assert_eq!(expenses[1].amount, 1020.0);
        assert_eq!(expenses[1].date, NaiveDate::from_ymd_opt(2026, 1, 20).unwrap());
        assert!(expenses[1].description.is_none());
        assert_eq!(expenses[2].amount, 0.0);
    }

    #[test]
    fn test_parse_expenses_csv_errors() {
        let missing = parse_expenses_csv("date,description\n2026-01-01,x\n".as_bytes());
        assert!(matches!(missing, Err(Error::InvalidData(_))));

        let bad_date = parse_expenses_csv("date,amount\nyesterday,5\n".as_bytes());
        match bad_date {
            Err(Error::InvalidData(msg)) => assert!(msg.starts_with("Line 2")),
            other => panic!("expected invalid data, got {:?}", other),
        }
    }

    #[test]
    fn test_import_expenses_csv() {
        let db = Database::in_memory().unwrap();
        let user = db
            .create_user("alice", "alice@example.com", "password123")
            .unwrap();
        let budget = db
            .create_budget(
                user.id,
                &NewBudget {
                    name: "Groceries".to_string(),
                    category: "Food".to_string(),
                    budget_amount: 500.0,
                },
            )
            .unwrap();

        let data = "date,amount,memo\n2026-02-01,20,Bread\n2026-02-03,35.5,\n";
        let stats = db
            .import_expenses_csv(user.id, budget.id, data.as_bytes())
            .unwrap();
        assert_eq!(
            stats,
            ImportStats {
                imported: 2,
                skipped: 0
            }
        );
        assert_eq!(db.list_expenses(user.id, budget.id).unwrap().len(), 2);
    }

    #[test]
    fn test_import_counts_zero_amount_rows_as_skipped() {
        let db = Database::in_memory().unwrap();
        let user = db
            .create_user("alice", "alice@example.com", "password123")
            .unwrap();
        let budget = db
            .create_budget(
                user.id,
                &NewBudget {
                    name: "Groceries".to_string(),
                    category: "Food".to_string(),
                    budget_amount: 500.0,
                },
            )
            .unwrap();

        let data = "date,amount\n2026-02-01,20\n2026-02-02,0.00\n2026-02-03,0\n";
        let stats = db
            .import_expenses_csv(user.id, budget.id, data.as_bytes())
            .unwrap();
        assert_eq!(
            stats,
            ImportStats {
                imported: 1,
                skipped: 2
            }
        );
        assert_eq!(db.list_expenses(user.id, budget.id).unwrap().len(), 1);
    }

    #[test]
    fn test_import_into_foreign_budget_fails() {
        let db = Database::in_memory().unwrap();
        let alice = db
            .create_user("alice", "alice@example.com", "password123")
            .unwrap();
        let bob = db.create_user("bob", "bob@example.com", "password123").unwrap();
        let budget = db
            .create_budget(
                alice.id,
                &NewBudget {
                    name: "Rent".to_string(),
                    category: "Housing".to_string(),
                    budget_amount: 1200.0,
                },
            )
            .unwrap();

        let result = db.import_expenses(bob.id, budget.id, &[]);
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
