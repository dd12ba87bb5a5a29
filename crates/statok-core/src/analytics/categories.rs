//! Spending distribution across budget categories

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::models::{Budget, Expense};
use crate::period::ReportWindow;

use super::types::{CategoryReport, CategoryRow};

#[derive(Default)]
struct CategoryTotals {
    budget_count: usize,
    total_budget: f64,
    count: usize,
    total: f64,
    min: f64,
    max: f64,
}

/// Group in-window expenses by their budget's category
///
/// Budget totals cover each budget in the category once, whether or not it
/// has expenses. Categories without expenses in the window are left out.
pub fn category_distribution(
    budgets: &[Budget],
    expenses: &[Expense],
    window: &ReportWindow,
) -> CategoryReport {
    let mut categories: BTreeMap<&str, CategoryTotals> = BTreeMap::new();
    let mut budget_category: HashMap<i64, &str> = HashMap::new();

    for budget in budgets {
        let totals = categories.entry(budget.category.as_str()).or_default();
        totals.budget_count += 1;
        totals.total_budget += budget.budget_amount;
        budget_category.insert(budget.id, budget.category.as_str());
    }

    for expense in expenses.iter().filter(|e| window.contains(e.date)) {
        let Some(category) = budget_category.get(&expense.budget_id) else {
            continue;
        };
        let Some(totals) = categories.get_mut(category) else {
            continue;
        };
        if totals.count == 0 {
            totals.min = expense.amount;
            totals.max = expense.amount;
        } else {
            totals.min = totals.min.min(expense.amount);
            totals.max = totals.max.max(expense.amount);
        }
        totals.count += 1;
        totals.total += expense.amount;
    }

    let total_spent: f64 = categories.values().map(|t| t.total).sum();

    let mut rows: Vec<CategoryRow> = categories
        .into_iter()
        .filter(|(_, t)| t.count > 0)
        .map(|(category, t)| CategoryRow {
            category: category.to_string(),
            budget_count: t.budget_count,
            transaction_count: t.count,
            total_spent: t.total,
            average_expense: t.total / t.count as f64,
            min_expense: t.min,
            max_expense: t.max,
            total_budget: t.total_budget,
            utilization_pct: if t.total_budget > 0.0 {
                t.total / t.total_budget * 100.0
            } else {
                0.0
            },
            percentage: if total_spent > 0.0 {
                t.total / total_spent * 100.0
            } else {
                0.0
            },
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_spent
            .partial_cmp(&a.total_spent)
            .unwrap_or(Ordering::Equal)
    });

    CategoryReport { rows, total_spent }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn budget(id: i64, category: &str, amount: f64) -> Budget {
        Budget {
            id,
            user_id: 1,
            name: format!("Budget {}", id),
            category: category.to_string(),
            budget_amount: amount,
            created_date: d(2024, 1, 1),
        }
    }

    fn expense(id: i64, budget_id: i64, amount: f64) -> Expense {
        Expense {
            id,
            budget_id,
            amount,
            description: None,
            date: d(2024, 2, id as u32),
        }
    }

    #[test]
    fn test_distribution() {
        let window = ReportWindow::new(d(2024, 1, 1), d(2024, 12, 31), d(2024, 12, 31));
        let budgets = vec![
            budget(1, "Food", 300.0),
            budget(2, "Food", 200.0),
            budget(3, "Travel", 1000.0),
            budget(4, "Unused", 50.0),
        ];
        let expenses = vec![
            expense(1, 1, 100.0),
            expense(2, 1, 50.0),
            expense(3, 2, 100.0),
            expense(4, 3, 750.0),
        ];

        let report = category_distribution(&budgets, &expenses, &window);

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.total_spent, 1000.0);

        let travel = &report.rows[0];
        assert_eq!(travel.category, "Travel");
        assert_eq!(travel.percentage, 75.0);
        assert_eq!(travel.utilization_pct, 75.0);

        let food = &report.rows[1];
        assert_eq!(food.category, "Food");
        assert_eq!(food.budget_count, 2);
        assert_eq!(food.transaction_count, 3);
        assert_eq!(food.total_budget, 500.0);
        assert_eq!(food.total_spent, 250.0);
        assert_eq!(food.min_expense, 50.0);
        assert_eq!(food.max_expense, 100.0);
        assert_eq!(food.utilization_pct, 50.0);

        let share_sum: f64 = report.rows.iter().map(|r| r.percentage).sum();
        assert!((share_sum - 100.0).abs() < 1e-9);
        assert_eq!(report.top().map(|r| r.category.as_str()), Some("Travel"));
    }

    #[test]
    fn test_window_excludes_everything() {
        let window = ReportWindow::new(d(2025, 1, 1), d(2025, 12, 31), d(2025, 12, 31));
        let budgets = vec![budget(1, "Food", 300.0)];
        let expenses = vec![expense(1, 1, 100.0)];

        let report = category_distribution(&budgets, &expenses, &window);
        assert!(report.rows.is_empty());
        assert_eq!(report.total_spent, 0.0);
        assert!(report.top().is_none());
    }
}
