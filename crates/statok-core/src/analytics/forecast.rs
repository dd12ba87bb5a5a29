//! Linear-trend forecasting of monthly totals
//!
//! [`forecast`] fits an ordinary least squares line through a series of
//! monthly totals (x = 0, 1, ...) and extends it forward. It is a pure
//! function; the report builder only uses the calendar to label months.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::config::AnalyticsConfig;
use crate::models::{Expense, SavingsTransaction};
use crate::period::{month_label, months_after, months_before};

use super::aggregate::{month_key, monthly_totals, savings_flows};
use super::types::{
    ForecastConfidence, ForecastMonth, ForecastReport, HistoricalMonth, MonthTotal,
};

/// Fitted line `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearTrend {
    /// Closed-form OLS fit; `None` for fewer than two points
    pub fn fit(values: &[f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }

        let n = values.len() as f64;
        let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
        for (i, &y) in values.iter().enumerate() {
            let x = i as f64;
            sum_x += x;
            sum_y += y;
            sum_xy += x * y;
            sum_x2 += x * x;
        }

        let denominator = n * sum_x2 - sum_x * sum_x;
        if denominator == 0.0 {
            return None;
        }

        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / n;
        Some(Self { slope, intercept })
    }

    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Project `horizon` values past the end of `values`, floored at zero
///
/// Empty when there is not enough history to fit a trend.
pub fn forecast(values: &[f64], horizon: usize) -> Vec<f64> {
    let Some(trend) = LinearTrend::fit(values) else {
        return Vec::new();
    };
    let n = values.len();
    (0..horizon)
        .map(|i| trend.at((n + i) as f64).max(0.0))
        .collect()
}

fn average(values: &[MonthTotal]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().map(|m| m.value).sum::<f64>() / values.len() as f64
    }
}

/// Build the forecast report from recent expense and savings history
///
/// History covers records dated from `history_months` before `today` up to
/// `today`. Missing forecast values count as zero in the monthly net.
pub fn build_forecast(
    expenses: &[Expense],
    transactions: &[SavingsTransaction],
    today: NaiveDate,
    config: &AnalyticsConfig,
) -> ForecastReport {
    let history_start = months_before(today, config.history_months);
    let in_history = |date: NaiveDate| date >= history_start && date <= today;

    let expense_history = monthly_totals(
        expenses
            .iter()
            .filter(|e| in_history(e.date))
            .map(|e| (e.date, e.amount)),
    );
    let flows = savings_flows(transactions.iter().filter(|tx| in_history(tx.date)));
    let savings_history: Vec<MonthTotal> = flows
        .iter()
        .map(|flow| MonthTotal {
            month: flow.month.clone(),
            value: flow.net,
        })
        .collect();

    let horizon = config.forecast_months as usize;
    let expense_values: Vec<f64> = expense_history.iter().map(|m| m.value).collect();
    let savings_values: Vec<f64> = savings_history.iter().map(|m| m.value).collect();
    let expense_forecast = forecast(&expense_values, horizon);
    let savings_forecast = forecast(&savings_values, horizon);

    let months = if expense_forecast.is_empty() && savings_forecast.is_empty() {
        Vec::new()
    } else {
        (0..horizon)
            .map(|i| {
                let date = months_after(today, i as u32 + 1);
                let expense = expense_forecast.get(i).copied().unwrap_or(0.0);
                let savings = savings_forecast.get(i).copied().unwrap_or(0.0);
                ForecastMonth {
                    month: month_key(date),
                    label: month_label(date),
                    expense,
                    savings,
                    net: savings - expense,
                }
            })
            .collect()
    };

    // Merge both histories per month, newest first
    let mut merged: BTreeMap<&str, HistoricalMonth> = BTreeMap::new();
    for month in &expense_history {
        merged
            .entry(month.month.as_str())
            .or_insert_with(|| empty_month(&month.month))
            .expenses = month.value;
    }
    for flow in &flows {
        let entry = merged
            .entry(flow.month.as_str())
            .or_insert_with(|| empty_month(&flow.month));
        entry.deposits = flow.deposits;
        entry.withdrawals = flow.withdrawals;
        entry.net_savings = flow.net;
    }
    let history: Vec<HistoricalMonth> = merged
        .into_values()
        .rev()
        .map(|mut m| {
            m.net_position = m.net_savings - m.expenses;
            m
        })
        .collect();

    let average_monthly_expense = average(&expense_history);
    let average_monthly_savings = average(&savings_history);

    ForecastReport {
        confidence: ForecastConfidence::from_history_len(expense_history.len()),
        average_monthly_net: average_monthly_savings - average_monthly_expense,
        average_monthly_expense,
        average_monthly_savings,
        expense_history,
        savings_history,
        expense_forecast,
        savings_forecast,
        months,
        history,
    }
}

fn empty_month(month: &str) -> HistoricalMonth {
    HistoricalMonth {
        month: month.to_string(),
        expenses: 0.0,
        deposits: 0.0,
        withdrawals: 0.0,
        net_savings: 0.0,
        net_position: 0.0,
    }
}
