//! Report structures produced by the analytics engine
//!
//! Everything here is plain data meant for a presentation layer (JSON API,
//! CLI tables). Ratios are percentages in the 0..=100 range (or above, for
//! overspending) and are `0.0` whenever their denominator is zero.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::period::ReportWindow;

// ========== Monthly Expenditure ==========

/// Summary statistics for one populated month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStats {
    /// Bucket key, `YYYY-MM`
    pub month: String,
    pub transaction_count: usize,
    pub total: f64,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    /// Change vs the previous populated month, `None` for the first bucket
    pub growth_pct: Option<f64>,
}

/// Monthly expenditure report (oldest month first)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub months: Vec<MonthlyStats>,
    pub total_spent: f64,
    pub transaction_count: usize,
}

/// A single month's total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthTotal {
    pub month: String,
    pub value: f64,
}

/// Savings movement within one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsFlow {
    pub month: String,
    pub deposits: f64,
    pub withdrawals: f64,
    pub net: f64,
}

// ========== Budget Adherence ==========

/// Budget health tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BudgetStatus {
    #[serde(rename = "Over Budget")]
    OverBudget,
    Critical,
    Warning,
    Healthy,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OverBudget => "Over Budget",
            Self::Critical => "Critical",
            Self::Warning => "Warning",
            Self::Healthy => "Healthy",
        }
    }

    /// Severity rank, higher is worse
    pub fn severity(&self) -> u8 {
        match self {
            Self::Healthy => 0,
            Self::Warning => 1,
            Self::Critical => 2,
            Self::OverBudget => 3,
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Adherence of one budget over the report window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdherenceRow {
    pub budget_id: i64,
    pub name: String,
    pub category: String,
    pub budget_amount: f64,
    pub spent: f64,
    pub remaining: f64,
    pub usage_pct: f64,
    pub status: BudgetStatus,
    pub expense_count: usize,
}

/// Budget adherence report (highest usage first)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdherenceReport {
    pub rows: Vec<AdherenceRow>,
    pub total_budget: f64,
    pub total_spent: f64,
    /// Total spent as a share of total budget
    pub overall_usage_pct: f64,
}

// ========== Savings Progress ==========

/// Savings goal progress tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalStatus {
    Completed,
    Overdue,
    Urgent,
    #[serde(rename = "On Track")]
    OnTrack,
    Moderate,
    #[serde(rename = "Slow Progress")]
    SlowProgress,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Overdue => "Overdue",
            Self::Urgent => "Urgent",
            Self::OnTrack => "On Track",
            Self::Moderate => "Moderate",
            Self::SlowProgress => "Slow Progress",
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Progress of one savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsRow {
    pub goal_id: i64,
    pub name: String,
    pub category: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub remaining: f64,
    pub progress_pct: f64,
    pub deadline: Option<NaiveDate>,
    /// Days until the deadline (negative once passed), `None` without a deadline
    pub days_remaining: Option<i64>,
    pub status: GoalStatus,
    pub transaction_count: usize,
    pub total_deposits: f64,
    pub total_withdrawals: f64,
    /// Average net monthly contribution over recent populated months
    pub velocity: f64,
    /// `None` when there is no positive velocity to extrapolate from
    pub months_to_completion: Option<u32>,
}

/// Savings goal report (most progressed first)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavingsReport {
    pub rows: Vec<SavingsRow>,
    pub completed_count: usize,
    pub total_count: usize,
    pub completion_rate_pct: f64,
}

// ========== Category Distribution ==========

/// Spending within one budget category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub category: String,
    pub budget_count: usize,
    pub transaction_count: usize,
    pub total_spent: f64,
    pub average_expense: f64,
    pub min_expense: f64,
    pub max_expense: f64,
    pub total_budget: f64,
    pub utilization_pct: f64,
    /// Share of all category spending
    pub percentage: f64,
}

/// Category distribution report (largest spend first)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryReport {
    pub rows: Vec<CategoryRow>,
    pub total_spent: f64,
}

impl CategoryReport {
    pub fn top(&self) -> Option<&CategoryRow> {
        self.rows.first()
    }
}

// ========== Forecast ==========

/// How much history backs a forecast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastConfidence {
    High,
    Medium,
    #[default]
    Low,
}

impl ForecastConfidence {
    /// Confidence from the number of populated history months
    pub fn from_history_len(len: usize) -> Self {
        match len {
            n if n >= 3 => Self::High,
            2 => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// A projected future month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMonth {
    /// `YYYY-MM`
    pub month: String,
    /// Display label, e.g. "November 2026"
    pub label: String,
    pub expense: f64,
    pub savings: f64,
    pub net: f64,
}

/// A historical month with both spending and savings movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalMonth {
    pub month: String,
    pub expenses: f64,
    pub deposits: f64,
    pub withdrawals: f64,
    pub net_savings: f64,
    /// Net savings minus expenses
    pub net_position: f64,
}

/// Linear-trend forecast of expenses and net savings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastReport {
    pub expense_history: Vec<MonthTotal>,
    pub savings_history: Vec<MonthTotal>,
    /// Empty when there is not enough history
    pub expense_forecast: Vec<f64>,
    /// Empty when there is not enough history
    pub savings_forecast: Vec<f64>,
    pub months: Vec<ForecastMonth>,
    pub average_monthly_expense: f64,
    pub average_monthly_savings: f64,
    pub average_monthly_net: f64,
    pub confidence: ForecastConfidence,
    /// Merged history, newest month first
    pub history: Vec<HistoricalMonth>,
}

// ========== Insights ==========

/// Tone of an insight, used by the presentation layer for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Success,
    Warning,
    Danger,
    Info,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Info => "info",
        }
    }
}

/// A human-readable observation about the user's finances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
}

impl Insight {
    pub fn new(kind: InsightKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }
}

// ========== Full Report ==========

/// Every report for one user and window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub window: ReportWindow,
    pub monthly: MonthlyReport,
    pub adherence: AdherenceReport,
    pub savings: SavingsReport,
    pub categories: CategoryReport,
    pub forecast: ForecastReport,
    pub insights: Vec<Insight>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels_serialize_as_displayed() {
        assert_eq!(
            serde_json::to_string(&BudgetStatus::OverBudget).unwrap(),
            "\"Over Budget\""
        );
        assert_eq!(
            serde_json::to_string(&GoalStatus::SlowProgress).unwrap(),
            "\"Slow Progress\""
        );
        assert_eq!(
            serde_json::to_string(&ForecastConfidence::Medium).unwrap(),
            "\"medium\""
        );
        assert_eq!(serde_json::to_string(&InsightKind::Danger).unwrap(), "\"danger\"");

        for status in [BudgetStatus::OverBudget, BudgetStatus::Healthy] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
    }

    #[test]
    fn test_confidence_from_history_len() {
        assert_eq!(ForecastConfidence::from_history_len(0), ForecastConfidence::Low);
        assert_eq!(ForecastConfidence::from_history_len(2), ForecastConfidence::Medium);
        assert_eq!(ForecastConfidence::from_history_len(6), ForecastConfidence::High);
    }
}
