//! Domain models for Statok

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A spending budget for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub category: String,
    pub budget_amount: f64,
    pub created_date: NaiveDate,
}

/// A budget to be created (before DB insertion)
#[derive(Debug, Clone, Deserialize)]
pub struct NewBudget {
    pub name: String,
    pub category: String,
    pub budget_amount: f64,
}

/// A budget with its all-time spending, as shown on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetWithSpent {
    #[serde(flatten)]
    pub budget: Budget,
    pub spent: f64,
    pub remaining: f64,
    pub expense_count: i64,
}

/// An expense logged against a budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub budget_id: i64,
    pub amount: f64,
    pub description: Option<String>,
    pub date: NaiveDate,
}

/// An expense to be added (before DB insertion)
#[derive(Debug, Clone, Deserialize)]
pub struct NewExpense {
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    pub date: NaiveDate,
}

/// A savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub category: String,
    pub target_amount: f64,
    pub current_amount: f64,
    /// Optional target date; `None` means no deadline was set
    pub deadline: Option<NaiveDate>,
}

/// A savings goal to be created (before DB insertion)
#[derive(Debug, Clone, Deserialize)]
pub struct NewSavingsGoal {
    pub name: String,
    pub category: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
}

/// Direction of a savings transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
        }
    }

    /// Sign applied to the amount when computing net contributions
    pub fn sign(&self) -> f64 {
        match self {
            Self::Deposit => 1.0,
            Self::Withdrawal => -1.0,
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "deposit" => Ok(Self::Deposit),
            "withdrawal" | "withdraw" => Ok(Self::Withdrawal),
            _ => Err(format!(
                "Unknown transaction type: {} (valid: deposit, withdrawal)",
                s
            )),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A deposit into or withdrawal from a savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsTransaction {
    pub id: i64,
    pub goal_id: i64,
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub date: NaiveDate,
}

/// A savings transaction to be recorded (before DB insertion)
#[derive(Debug, Clone, Deserialize)]
pub struct NewSavingsTransaction {
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub date: NaiveDate,
}

/// Check that a user-entered amount is a usable positive number
pub(crate) fn validate_positive(field: &str, amount: f64) -> crate::Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(crate::Error::InvalidData(format!(
            "{} must be a positive number",
            field
        )));
    }
    Ok(())
}

/// Check that a user-entered amount is finite and not negative
pub(crate) fn validate_non_negative(field: &str, amount: f64) -> crate::Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(crate::Error::InvalidData(format!(
            "{} must not be negative",
            field
        )));
    }
    Ok(())
}

pub(crate) fn validate_name(field: &str, value: &str) -> crate::Result<()> {
    if value.trim().is_empty() {
        return Err(crate::Error::InvalidData(format!("{} is required", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_parse() {
        assert_eq!(
            "deposit".parse::<TransactionType>().unwrap(),
            TransactionType::Deposit
        );
        assert_eq!(
            "Withdraw".parse::<TransactionType>().unwrap(),
            TransactionType::Withdrawal
        );
        assert!("transfer".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_validate_amounts() {
        assert!(validate_positive("amount", 12.5).is_ok());
        assert!(validate_positive("amount", 0.0).is_err());
        assert!(validate_positive("amount", f64::NAN).is_err());
        assert!(validate_non_negative("budget_amount", 0.0).is_ok());
        assert!(validate_non_negative("budget_amount", -1.0).is_err());
        assert!(validate_name("name", "  ").is_err());
    }
}
