//! Savings goal progress evaluation

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;

use crate::config::AnalyticsConfig;
use crate::models::{SavingsGoal, SavingsTransaction, TransactionType};

use super::aggregate::savings_flows;
use super::rules::{Rule, RuleChain};
use super::types::{GoalStatus, SavingsReport, SavingsRow};

/// A goal's standing, as seen by the status rules
pub struct GoalProgress {
    pub current_amount: f64,
    pub target_amount: f64,
    pub progress_pct: f64,
    pub days_remaining: Option<i64>,
    pub urgent_days: i64,
}

impl GoalProgress {
    pub fn new(goal: &SavingsGoal, today: NaiveDate, urgent_days: i64) -> Self {
        Self {
            current_amount: goal.current_amount,
            target_amount: goal.target_amount,
            progress_pct: progress_percentage(goal.current_amount, goal.target_amount),
            days_remaining: goal.deadline.map(|deadline| (deadline - today).num_days()),
            urgent_days,
        }
    }
}

fn completed(g: &GoalProgress) -> bool {
    g.current_amount >= g.target_amount
}

fn overdue(g: &GoalProgress) -> bool {
    g.days_remaining.is_some_and(|days| days < 0)
}

fn urgent(g: &GoalProgress) -> bool {
    g.days_remaining.is_some_and(|days| days <= g.urgent_days)
}

fn on_track(g: &GoalProgress) -> bool {
    g.progress_pct >= 75.0
}

fn moderate(g: &GoalProgress) -> bool {
    g.progress_pct >= 50.0
}

pub const GOAL_STATUS_RULES: RuleChain<GoalProgress, GoalStatus> = RuleChain {
    rules: &[
        Rule {
            label: GoalStatus::Completed,
            when: completed,
        },
        Rule {
            label: GoalStatus::Overdue,
            when: overdue,
        },
        Rule {
            label: GoalStatus::Urgent,
            when: urgent,
        },
        Rule {
            label: GoalStatus::OnTrack,
            when: on_track,
        },
        Rule {
            label: GoalStatus::Moderate,
            when: moderate,
        },
    ],
    fallback: GoalStatus::SlowProgress,
};

/// Share of the target reached, 0 when the target is 0
pub fn progress_percentage(current: f64, target: f64) -> f64 {
    if target > 0.0 {
        current / target * 100.0
    } else {
        0.0
    }
}

pub fn classify_goal(goal: &SavingsGoal, today: NaiveDate, urgent_days: i64) -> GoalStatus {
    GOAL_STATUS_RULES.classify(&GoalProgress::new(goal, today, urgent_days))
}

/// Average net monthly contribution over the most recent populated months
pub fn velocity(transactions: &[&SavingsTransaction], months: u32) -> f64 {
    let flows = savings_flows(transactions.iter().copied());
    let recent: Vec<f64> = flows
        .iter()
        .rev()
        .take(months as usize)
        .map(|flow| flow.net)
        .collect();

    if recent.is_empty() {
        0.0
    } else {
        recent.iter().sum::<f64>() / recent.len() as f64
    }
}

/// Whole months needed to close `remaining` at `velocity` per month
///
/// `None` without a positive velocity. A goal already met needs 0 months.
pub fn months_to_completion(remaining: f64, velocity: f64) -> Option<u32> {
    if velocity <= 0.0 {
        return None;
    }
    if remaining <= 0.0 {
        return Some(0);
    }
    Some((remaining / velocity).ceil() as u32)
}

/// Evaluate every goal's progress as of `today`
pub fn evaluate_goals(
    goals: &[SavingsGoal],
    transactions: &[SavingsTransaction],
    today: NaiveDate,
    config: &AnalyticsConfig,
) -> SavingsReport {
    let mut by_goal: HashMap<i64, Vec<&SavingsTransaction>> = HashMap::new();
    for tx in transactions {
        by_goal.entry(tx.goal_id).or_default().push(tx);
    }

    let mut rows: Vec<SavingsRow> = goals
        .iter()
        .map(|goal| {
            let txs = by_goal.get(&goal.id).map(Vec::as_slice).unwrap_or(&[]);
            let progress = GoalProgress::new(goal, today, config.urgent_days);
            let total_of = |kind: TransactionType| -> f64 {
                txs.iter()
                    .filter(|tx| tx.transaction_type == kind)
                    .map(|tx| tx.amount)
                    .sum()
            };
            let remaining = goal.target_amount - goal.current_amount;
            let velocity = velocity(txs, config.velocity_months);

            SavingsRow {
                goal_id: goal.id,
                name: goal.name.clone(),
                category: goal.category.clone(),
                target_amount: goal.target_amount,
                current_amount: goal.current_amount,
                remaining,
                progress_pct: progress.progress_pct,
                deadline: goal.deadline,
                days_remaining: progress.days_remaining,
                status: GOAL_STATUS_RULES.classify(&progress),
                transaction_count: txs.len(),
                total_deposits: total_of(TransactionType::Deposit),
                total_withdrawals: total_of(TransactionType::Withdrawal),
                velocity,
                months_to_completion: months_to_completion(remaining, velocity),
            }
        })
        .collect();

    // Ties on progress go by deadline, open-ended goals first
    rows.sort_by(|a, b| {
        b.progress_pct
            .partial_cmp(&a.progress_pct)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.deadline.cmp(&b.deadline))
    });

    let completed_count = rows
        .iter()
        .filter(|r| r.status == GoalStatus::Completed)
        .count();
    let total_count = rows.len();

    SavingsReport {
        completion_rate_pct: if total_count > 0 {
            completed_count as f64 / total_count as f64 * 100.0
        } else {
            0.0
        },
        rows,
        completed_count,
        total_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn goal(id: i64, target: f64, current: f64, deadline: Option<NaiveDate>) -> SavingsGoal {
        SavingsGoal {
            id,
            user_id: 1,
            name: format!("Goal {}", id),
            category: "Emergency".to_string(),
            target_amount: target,
            current_amount: current,
            deadline,
        }
    }

    fn tx(
        id: i64,
        goal_id: i64,
        amount: f64,
        kind: TransactionType,
        date: NaiveDate,
    ) -> SavingsTransaction {
        SavingsTransaction {
            id,
            goal_id,
            amount,
            transaction_type: kind,
            date,
        }
    }

    #[test]
    fn test_status_rules() {
        let today = d(2026, 6, 1);

        // Completed wins even when the deadline has passed
        let done = goal(1, 1000.0, 1000.0, Some(d(2026, 1, 1)));
        assert_eq!(classify_goal(&done, today, 30), GoalStatus::Completed);

        let late = goal(2, 1000.0, 900.0, Some(d(2026, 5, 31)));
        assert_eq!(classify_goal(&late, today, 30), GoalStatus::Overdue);

        let soon = goal(3, 1000.0, 100.0, Some(d(2026, 7, 1)));
        assert_eq!(classify_goal(&soon, today, 30), GoalStatus::Urgent);

        let due_today = goal(4, 1000.0, 100.0, Some(today));
        assert_eq!(classify_goal(&due_today, today, 30), GoalStatus::Urgent);

        assert_eq!(
            classify_goal(&goal(5, 1000.0, 800.0, None), today, 30),
            GoalStatus::OnTrack
        );
        assert_eq!(
            classify_goal(&goal(6, 1000.0, 500.0, Some(d(2027, 1, 1))), today, 30),
            GoalStatus::Moderate
        );
        assert_eq!(
            classify_goal(&goal(7, 1000.0, 10.0, None), today, 30),
            GoalStatus::SlowProgress
        );
    }

    #[test]
    fn test_velocity_uses_recent_months() {
        let txs = vec![
            tx(1, 1, 1000.0, TransactionType::Deposit, d(2026, 1, 5)),
            tx(2, 1, 100.0, TransactionType::Deposit, d(2026, 3, 5)),
            tx(3, 1, 300.0, TransactionType::Deposit, d(2026, 4, 5)),
            tx(4, 1, 50.0, TransactionType::Withdrawal, d(2026, 4, 20)),
            tx(5, 1, 200.0, TransactionType::Deposit, d(2026, 5, 5)),
        ];
        let refs: Vec<&SavingsTransaction> = txs.iter().collect();

        // Last three populated months: March 100, April 250, May 200
        let v = velocity(&refs, 3);
        assert!((v - 550.0 / 3.0).abs() < 1e-9);
        assert_eq!(velocity(&[], 3), 0.0);
    }

    #[test]
    fn test_months_to_completion() {
        assert_eq!(months_to_completion(1000.0, 300.0), Some(4));
        assert_eq!(months_to_completion(900.0, 300.0), Some(3));
        assert_eq!(months_to_completion(-50.0, 300.0), Some(0));
        assert_eq!(months_to_completion(1000.0, 0.0), None);
        assert_eq!(months_to_completion(1000.0, -20.0), None);
    }

    #[test]
    fn test_evaluate_goals_ordering_and_totals() {
        let today = d(2026, 6, 1);
        let goals = vec![
            goal(1, 1000.0, 500.0, None),
            goal(2, 1000.0, 500.0, Some(d(2027, 1, 1))),
            goal(3, 100.0, 100.0, None),
            goal(4, 0.0, 0.0, None),
            goal(5, 1000.0, 500.0, Some(d(2026, 12, 1))),
        ];
        let txs = vec![
            tx(1, 2, 600.0, TransactionType::Deposit, d(2026, 4, 1)),
            tx(2, 2, 100.0, TransactionType::Withdrawal, d(2026, 5, 1)),
        ];

        let report = evaluate_goals(&goals, &txs, today, &AnalyticsConfig::default());

        let ids: Vec<i64> = report.rows.iter().map(|r| r.goal_id).collect();
        // Equal progress: open-ended goals first, then the nearest deadline
        assert_eq!(ids, vec![3, 1, 5, 2, 4]);

        let with_txs = &report.rows[3];
        assert_eq!(with_txs.transaction_count, 2);
        assert_eq!(with_txs.total_deposits, 600.0);
        assert_eq!(with_txs.total_withdrawals, 100.0);
        assert_eq!(with_txs.velocity, 250.0);
        assert_eq!(with_txs.months_to_completion, Some(2));
        assert!(with_txs.days_remaining.is_some());

        let no_txs = &report.rows[1];
        assert_eq!(no_txs.velocity, 0.0);
        assert_eq!(no_txs.months_to_completion, None);
        assert_eq!(no_txs.days_remaining, None);

        // A zero target is trivially met
        assert_eq!(report.rows[4].progress_pct, 0.0);
        assert_eq!(report.rows[4].status, GoalStatus::Completed);

        assert_eq!(report.completed_count, 2);
        assert_eq!(report.total_count, 5);
        assert_eq!(report.completion_rate_pct, 40.0);
    }
}
