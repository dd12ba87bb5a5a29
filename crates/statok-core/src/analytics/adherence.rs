//! Budget adherence evaluation

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{Budget, Expense};
use crate::period::ReportWindow;

use super::rules::{Rule, RuleChain};
use super::types::{AdherenceReport, AdherenceRow, BudgetStatus};

/// Spending against one budget, as seen by the status rules
pub struct BudgetUsage {
    pub spent: f64,
    pub budget_amount: f64,
    pub usage_pct: f64,
}

impl BudgetUsage {
    pub fn new(spent: f64, budget_amount: f64) -> Self {
        Self {
            spent,
            budget_amount,
            usage_pct: usage_percentage(spent, budget_amount),
        }
    }
}

fn over_budget(u: &BudgetUsage) -> bool {
    u.spent > u.budget_amount
}

fn critical(u: &BudgetUsage) -> bool {
    u.usage_pct >= 90.0
}

fn warning(u: &BudgetUsage) -> bool {
    u.usage_pct >= 75.0
}

pub const BUDGET_STATUS_RULES: RuleChain<BudgetUsage, BudgetStatus> = RuleChain {
    rules: &[
        Rule {
            label: BudgetStatus::OverBudget,
            when: over_budget,
        },
        Rule {
            label: BudgetStatus::Critical,
            when: critical,
        },
        Rule {
            label: BudgetStatus::Warning,
            when: warning,
        },
    ],
    fallback: BudgetStatus::Healthy,
};

/// Share of the budget used, 0 when the budget amount is 0
pub fn usage_percentage(spent: f64, budget_amount: f64) -> f64 {
    if budget_amount > 0.0 {
        spent / budget_amount * 100.0
    } else {
        0.0
    }
}

pub fn classify_budget(spent: f64, budget_amount: f64) -> BudgetStatus {
    BUDGET_STATUS_RULES.classify(&BudgetUsage::new(spent, budget_amount))
}

/// Evaluate every budget against its expenses inside the window
///
/// Budgets without expenses count as zero spent. Rows come back ordered by
/// usage, highest first; ties keep the input order.
pub fn evaluate_budgets(
    budgets: &[Budget],
    expenses: &[Expense],
    window: &ReportWindow,
) -> AdherenceReport {
    let mut spending: HashMap<i64, (f64, usize)> = HashMap::new();
    for expense in expenses.iter().filter(|e| window.contains(e.date)) {
        let entry = spending.entry(expense.budget_id).or_default();
        entry.0 += expense.amount;
        entry.1 += 1;
    }

    let mut rows: Vec<AdherenceRow> = budgets
        .iter()
        .map(|budget| {
            let (spent, expense_count) = spending.get(&budget.id).copied().unwrap_or_default();
            let usage = BudgetUsage::new(spent, budget.budget_amount);
            AdherenceRow {
                budget_id: budget.id,
                name: budget.name.clone(),
                category: budget.category.clone(),
                budget_amount: budget.budget_amount,
                spent,
                remaining: budget.budget_amount - spent,
                usage_pct: usage.usage_pct,
                status: BUDGET_STATUS_RULES.classify(&usage),
                expense_count,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.usage_pct
            .partial_cmp(&a.usage_pct)
            .unwrap_or(Ordering::Equal)
    });

    let total_budget: f64 = rows.iter().map(|r| r.budget_amount).sum();
    let total_spent: f64 = rows.iter().map(|r| r.spent).sum();

    AdherenceReport {
        overall_usage_pct: usage_percentage(total_spent, total_budget),
        rows,
        total_budget,
        total_spent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn budget(id: i64, name: &str, amount: f64) -> Budget {
        Budget {
            id,
            user_id: 1,
            name: name.to_string(),
            category: "General".to_string(),
            budget_amount: amount,
            created_date: d(2024, 1, 1),
        }
    }

    fn expense(id: i64, budget_id: i64, amount: f64, date: NaiveDate) -> Expense {
        Expense {
            id,
            budget_id,
            amount,
            description: None,
            date,
        }
    }

    #[test]
    fn test_status_tiers() {
        assert_eq!(classify_budget(120.0, 100.0), BudgetStatus::OverBudget);
        assert_eq!(classify_budget(100.0, 100.0), BudgetStatus::Critical);
        assert_eq!(classify_budget(90.0, 100.0), BudgetStatus::Critical);
        assert_eq!(classify_budget(75.0, 100.0), BudgetStatus::Warning);
        assert_eq!(classify_budget(74.9, 100.0), BudgetStatus::Healthy);
        assert_eq!(classify_budget(0.0, 100.0), BudgetStatus::Healthy);
    }

    #[test]
    fn test_status_is_monotonic_in_usage() {
        let mut last = 0;
        for spent in 0..=150 {
            let severity = classify_budget(spent as f64, 100.0).severity();
            assert!(severity >= last, "severity dropped at spent={}", spent);
            last = severity;
        }
    }

    #[test]
    fn test_zero_budget() {
        assert_eq!(usage_percentage(50.0, 0.0), 0.0);
        assert_eq!(classify_budget(0.0, 0.0), BudgetStatus::Healthy);
        // Any spending against a zero budget is overspending
        assert_eq!(classify_budget(50.0, 0.0), BudgetStatus::OverBudget);
    }

    #[test]
    fn test_evaluate_budgets() {
        let window = ReportWindow::new(d(2024, 1, 1), d(2024, 3, 31), d(2024, 3, 31));
        let budgets = vec![
            budget(1, "Groceries", 500.0),
            budget(2, "Fun", 100.0),
            budget(3, "Idle", 50.0),
        ];
        let expenses = vec![
            expense(1, 1, 200.0, d(2024, 1, 10)),
            expense(2, 1, 100.0, d(2024, 2, 10)),
            expense(3, 2, 95.0, d(2024, 2, 11)),
            // Outside the window
            expense(4, 2, 500.0, d(2023, 12, 31)),
        ];

        let report = evaluate_budgets(&budgets, &expenses, &window);

        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.rows[0].name, "Fun");
        assert_eq!(report.rows[0].status, BudgetStatus::Critical);
        assert_eq!(report.rows[0].expense_count, 1);
        assert_eq!(report.rows[1].name, "Groceries");
        assert_eq!(report.rows[1].spent, 300.0);
        assert_eq!(report.rows[1].remaining, 200.0);
        assert_eq!(report.rows[1].usage_pct, 60.0);
        assert_eq!(report.rows[2].name, "Idle");
        assert_eq!(report.rows[2].spent, 0.0);
        assert_eq!(report.rows[2].expense_count, 0);

        assert_eq!(report.total_budget, 650.0);
        assert_eq!(report.total_spent, 395.0);
        assert!((report.overall_usage_pct - 395.0 / 650.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_budgets() {
        let window = ReportWindow::last_months(12, d(2024, 6, 1));
        let report = evaluate_budgets(&[], &[], &window);
        assert!(report.rows.is_empty());
        assert_eq!(report.overall_usage_pct, 0.0);
    }
}
