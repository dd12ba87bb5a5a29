//! Analytics - reports over a user's budgets, expenses and savings
//!
//! All analysis is synchronous and works on records already fetched through a
//! [`RecordSource`]. Nothing here touches the clock; the reference date comes
//! in with the [`ReportWindow`](crate::period::ReportWindow).
//!
//! ## Reports
//!
//! - **Monthly expenditure** - per-month count/total/average/min/max and growth
//! - **Budget adherence** - spent vs budget with a health tier per budget
//! - **Savings progress** - goal status, velocity and time to completion
//! - **Category distribution** - spend share and utilization per category
//! - **Forecast** - linear trend projection of expenses and net savings
//! - **Insights** - short messages derived from the reports above
//!
//! ## Usage
//!
//! ```rust,ignore
//! use statok_core::analytics::AnalyticsEngine;
//! use statok_core::period::resolve_period;
//!
//! let engine = AnalyticsEngine::new(config);
//! let window = resolve_period("12", None, None, today)?;
//! let report = engine.build_report(&db, user_id, &window)?;
//! ```

pub mod adherence;
pub mod aggregate;
pub mod categories;
pub mod engine;
pub mod forecast;
pub mod insights;
pub mod rules;
pub mod savings;
pub mod types;

pub use adherence::{classify_budget, evaluate_budgets, usage_percentage};
pub use aggregate::{monthly_report, monthly_stats, savings_flows};
pub use categories::category_distribution;
pub use engine::{AnalyticsEngine, RecordSet, RecordSource};
pub use forecast::{build_forecast, forecast, LinearTrend};
pub use insights::{format_money, generate_insights, InsightInputs};
pub use rules::{Rule, RuleChain};
pub use savings::{classify_goal, evaluate_goals, months_to_completion, velocity};
pub use types::{
    AdherenceReport, AdherenceRow, AnalyticsReport, BudgetStatus, CategoryReport, CategoryRow,
    ForecastConfidence, ForecastMonth, ForecastReport, GoalStatus, HistoricalMonth, Insight,
    InsightKind, MonthTotal, MonthlyReport, MonthlyStats, SavingsFlow, SavingsReport, SavingsRow,
};
