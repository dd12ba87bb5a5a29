//! Calendar-month aggregation
//!
//! Records are bucketed by `YYYY-MM`. Only months that contain at least one
//! record produce a bucket; gaps are not zero-filled.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{SavingsTransaction, TransactionType};

use super::types::{MonthTotal, MonthlyReport, MonthlyStats, SavingsFlow};

/// Bucket key for a date
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Percentage change from `previous` to `current`, 0 when `previous` is 0
pub fn growth_rate(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

#[derive(Default)]
struct Bucket {
    count: usize,
    total: f64,
    min: f64,
    max: f64,
}

impl Bucket {
    fn push(&mut self, amount: f64) {
        if self.count == 0 {
            self.min = amount;
            self.max = amount;
        } else {
            self.min = self.min.min(amount);
            self.max = self.max.max(amount);
        }
        self.count += 1;
        self.total += amount;
    }
}

/// Per-month statistics for (date, amount) records, oldest month first
///
/// Growth compares each bucket with the previous populated bucket, which
/// need not be the previous calendar month.
pub fn monthly_stats<I>(records: I) -> Vec<MonthlyStats>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let mut buckets: BTreeMap<String, Bucket> = BTreeMap::new();
    for (date, amount) in records {
        buckets.entry(month_key(date)).or_default().push(amount);
    }

    let mut previous: Option<f64> = None;
    buckets
        .into_iter()
        .map(|(month, bucket)| {
            let growth_pct = previous.map(|prev| growth_rate(bucket.total, prev));
            previous = Some(bucket.total);
            MonthlyStats {
                month,
                transaction_count: bucket.count,
                total: bucket.total,
                average: bucket.total / bucket.count as f64,
                min: bucket.min,
                max: bucket.max,
                growth_pct,
            }
        })
        .collect()
}

/// Monthly expenditure report for (date, amount) records
pub fn monthly_report<I>(records: I) -> MonthlyReport
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let months = monthly_stats(records);
    MonthlyReport {
        total_spent: months.iter().map(|m| m.total).sum(),
        transaction_count: months.iter().map(|m| m.transaction_count).sum(),
        months,
    }
}

/// Sum of amounts per month, oldest month first
pub fn monthly_totals<I>(records: I) -> Vec<MonthTotal>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for (date, amount) in records {
        *totals.entry(month_key(date)).or_default() += amount;
    }
    totals
        .into_iter()
        .map(|(month, value)| MonthTotal { month, value })
        .collect()
}

/// Deposits, withdrawals and net contribution per month, oldest month first
pub fn savings_flows<'a, I>(transactions: I) -> Vec<SavingsFlow>
where
    I: IntoIterator<Item = &'a SavingsTransaction>,
{
    let mut flows: BTreeMap<String, (f64, f64)> = BTreeMap::new();
    for tx in transactions {
        let entry = flows.entry(month_key(tx.date)).or_default();
        match tx.transaction_type {
            TransactionType::Deposit => entry.0 += tx.amount,
            TransactionType::Withdrawal => entry.1 += tx.amount,
        }
    }
    flows
        .into_iter()
        .map(|(month, (deposits, withdrawals))| SavingsFlow {
            month,
            deposits,
            withdrawals,
            net: deposits - withdrawals,
        })
        .collect()
}
