//! Analytics engine - fetches a user's records and builds reports

use std::time::Instant;

use chrono::NaiveDate;
use tracing::debug;

use crate::config::AnalyticsConfig;
use crate::models::{Budget, Expense, SavingsGoal, SavingsTransaction};
use crate::period::ReportWindow;
use crate::Result;

use super::adherence::evaluate_budgets;
use super::aggregate::monthly_report;
use super::categories::category_distribution;
use super::forecast::build_forecast;
use super::insights::{generate_insights, InsightInputs};
use super::savings::evaluate_goals;
use super::types::{
    AdherenceReport, AnalyticsReport, CategoryReport, ForecastReport, Insight, MonthlyReport,
    SavingsReport,
};

/// Query interface the engine reads records through
///
/// Every method is scoped to one user. Date ranges are inclusive.
pub trait RecordSource {
    fn budgets(&self, user_id: i64) -> Result<Vec<Budget>>;

    fn expenses(&self, user_id: i64, from: NaiveDate, to: NaiveDate) -> Result<Vec<Expense>>;

    fn savings_goals(&self, user_id: i64) -> Result<Vec<SavingsGoal>>;

    /// Savings transactions for the user's goals, optionally limited to a range
    fn savings_transactions(
        &self,
        user_id: i64,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<SavingsTransaction>>;
}

/// In-memory records, mainly for tests and offline analysis
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub budgets: Vec<Budget>,
    pub expenses: Vec<Expense>,
    pub goals: Vec<SavingsGoal>,
    pub savings_transactions: Vec<SavingsTransaction>,
}

impl RecordSet {
    fn owns_budget(&self, user_id: i64, budget_id: i64) -> bool {
        self.budgets
            .iter()
            .any(|b| b.id == budget_id && b.user_id == user_id)
    }

    fn owns_goal(&self, user_id: i64, goal_id: i64) -> bool {
        self.goals
            .iter()
            .any(|g| g.id == goal_id && g.user_id == user_id)
    }
}

impl RecordSource for RecordSet {
    fn budgets(&self, user_id: i64) -> Result<Vec<Budget>> {
        Ok(self
            .budgets
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }

    fn expenses(&self, user_id: i64, from: NaiveDate, to: NaiveDate) -> Result<Vec<Expense>> {
        Ok(self
            .expenses
            .iter()
            .filter(|e| e.date >= from && e.date <= to && self.owns_budget(user_id, e.budget_id))
            .cloned()
            .collect())
    }

    fn savings_goals(&self, user_id: i64) -> Result<Vec<SavingsGoal>> {
        Ok(self
            .goals
            .iter()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect())
    }

    fn savings_transactions(
        &self,
        user_id: i64,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<SavingsTransaction>> {
        Ok(self
            .savings_transactions
            .iter()
            .filter(|tx| range.map_or(true, |(from, to)| tx.date >= from && tx.date <= to))
            .filter(|tx| self.owns_goal(user_id, tx.goal_id))
            .cloned()
            .collect())
    }
}

/// Builds analytics reports from a [`RecordSource`]
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    config: AnalyticsConfig,
}

impl AnalyticsEngine {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Monthly expenditure within the window
    pub fn monthly(
        &self,
        source: &dyn RecordSource,
        user_id: i64,
        window: &ReportWindow,
    ) -> Result<MonthlyReport> {
        let expenses = source.expenses(user_id, window.start, window.end)?;
        Ok(monthly_report(expenses.iter().map(|e| (e.date, e.amount))))
    }

    /// Budget adherence within the window
    pub fn adherence(
        &self,
        source: &dyn RecordSource,
        user_id: i64,
        window: &ReportWindow,
    ) -> Result<AdherenceReport> {
        let budgets = source.budgets(user_id)?;
        let expenses = source.expenses(user_id, window.start, window.end)?;
        Ok(evaluate_budgets(&budgets, &expenses, window))
    }

    /// Savings goal progress as of the window's reference date
    pub fn savings(
        &self,
        source: &dyn RecordSource,
        user_id: i64,
        window: &ReportWindow,
    ) -> Result<SavingsReport> {
        let goals = source.savings_goals(user_id)?;
        let transactions = source.savings_transactions(user_id, None)?;
        Ok(evaluate_goals(&goals, &transactions, window.today, &self.config))
    }

    /// Category distribution within the window
    pub fn categories(
        &self,
        source: &dyn RecordSource,
        user_id: i64,
        window: &ReportWindow,
    ) -> Result<CategoryReport> {
        let budgets = source.budgets(user_id)?;
        let expenses = source.expenses(user_id, window.start, window.end)?;
        Ok(category_distribution(&budgets, &expenses, window))
    }

    /// Trend forecast from the configured history before the reference date
    pub fn forecast(
        &self,
        source: &dyn RecordSource,
        user_id: i64,
        window: &ReportWindow,
    ) -> Result<ForecastReport> {
        let range = self.history_range(window);
        let expenses = source.expenses(user_id, range.0, range.1)?;
        let transactions = source.savings_transactions(user_id, Some(range))?;
        Ok(build_forecast(&expenses, &transactions, window.today, &self.config))
    }

    /// Insights derived from every other report
    pub fn insights(
        &self,
        source: &dyn RecordSource,
        user_id: i64,
        window: &ReportWindow,
    ) -> Result<Vec<Insight>> {
        Ok(self.build_report(source, user_id, window)?.insights)
    }

    /// Build every report, reading each record set once
    pub fn build_report(
        &self,
        source: &dyn RecordSource,
        user_id: i64,
        window: &ReportWindow,
    ) -> Result<AnalyticsReport> {
        let started = Instant::now();

        let budgets = source.budgets(user_id)?;
        let goals = source.savings_goals(user_id)?;
        let transactions = source.savings_transactions(user_id, None)?;

        // One expense query covering both the window and the forecast history
        let history = self.history_range(window);
        let from = window.start.min(history.0);
        let to = window.end.max(history.1);
        let all_expenses = source.expenses(user_id, from, to)?;
        let in_window: Vec<Expense> = all_expenses
            .iter()
            .filter(|e| window.contains(e.date))
            .cloned()
            .collect();

        let monthly = monthly_report(in_window.iter().map(|e| (e.date, e.amount)));
        let adherence = evaluate_budgets(&budgets, &in_window, window);
        let savings = evaluate_goals(&goals, &transactions, window.today, &self.config);
        let categories = category_distribution(&budgets, &in_window, window);
        let forecast = build_forecast(&all_expenses, &transactions, window.today, &self.config);
        let insights = generate_insights(&InsightInputs {
            adherence: &adherence,
            savings: &savings,
            categories: &categories,
            forecast: &forecast,
        });

        debug!(
            user_id,
            budgets = budgets.len(),
            expenses = in_window.len(),
            goals = goals.len(),
            insights = insights.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Analytics report built"
        );

        Ok(AnalyticsReport {
            window: *window,
            monthly,
            adherence,
            savings,
            categories,
            forecast,
            insights,
        })
    }

    fn history_range(&self, window: &ReportWindow) -> (NaiveDate, NaiveDate) {
        (window.history_start(self.config.history_months), window.today)
    }
}
