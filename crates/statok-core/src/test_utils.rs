//! Test utilities for statok-core
//!
//! [`RecordFixture`] builds an in-memory [`RecordSet`] for one user without a
//! database, so analytics can be tested against hand-picked records.

use chrono::NaiveDate;

use crate::analytics::RecordSet;
use crate::models::{Budget, Expense, SavingsGoal, SavingsTransaction, TransactionType};

/// Shorthand for a calendar date in tests
///
/// Panics on an invalid date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(|| {
        panic!("invalid fixture date {}-{}-{}", year, month, day);
    })
}

/// Builder for a user's records with sequential IDs
#[derive(Debug, Clone)]
pub struct RecordFixture {
    user_id: i64,
    records: RecordSet,
    next_id: i64,
}

impl RecordFixture {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            records: RecordSet::default(),
            next_id: 1,
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    fn take_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a budget and return its ID
    pub fn budget(&mut self, name: &str, category: &str, amount: f64) -> i64 {
        let id = self.take_id();
        self.records.budgets.push(Budget {
            id,
            user_id: self.user_id,
            name: name.to_string(),
            category: category.to_string(),
            budget_amount: amount,
            created_date: date(2024, 1, 1),
        });
        id
    }

    /// Add an expense against a budget
    pub fn expense(&mut self, budget_id: i64, amount: f64, on: NaiveDate) -> &mut Self {
        let id = self.take_id();
        self.records.expenses.push(Expense {
            id,
            budget_id,
            amount,
            description: None,
            date: on,
        });
        self
    }

    /// Add a savings goal and return its ID
    pub fn goal(
        &mut self,
        name: &str,
        target: f64,
        current: f64,
        deadline: Option<NaiveDate>,
    ) -> i64 {
        let id = self.take_id();
        self.records.goals.push(SavingsGoal {
            id,
            user_id: self.user_id,
            name: name.to_string(),
            category: "General".to_string(),
            target_amount: target,
            current_amount: current,
            deadline,
        });
        id
    }

    pub fn deposit(&mut self, goal_id: i64, amount: f64, on: NaiveDate) -> &mut Self {
        self.savings_transaction(goal_id, amount, TransactionType::Deposit, on)
    }

    pub fn withdraw(&mut self, goal_id: i64, amount: f64, on: NaiveDate) -> &mut Self {
        self.savings_transaction(goal_id, amount, TransactionType::Withdrawal, on)
    }

    fn savings_transaction(
        &mut self,
        goal_id: i64,
        amount: f64,
        transaction_type: TransactionType,
        on: NaiveDate,
    ) -> &mut Self {
        let id = self.take_id();
        self.records.savings_transactions.push(SavingsTransaction {
            id,
            goal_id,
            amount,
            transaction_type,
            date: on,
        });
        self
    }

    pub fn build(&self) -> RecordSet {
        self.records.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::RecordSource;

    #[test]
    fn test_fixture_scopes_records_to_user() {
        let mut fixture = RecordFixture::new(7);
        let food = fixture.budget("Groceries", "Food", 400.0);
        fixture
            .expense(food, 25.0, date(2026, 3, 2))
            .expense(food, 40.0, date(2026, 3, 9));
        let goal = fixture.goal("Trip", 1000.0, 150.0, None);
        fixture.deposit(goal, 200.0, date(2026, 2, 1)).withdraw(goal, 50.0, date(2026, 3, 1));

        let records = fixture.build();
        assert_eq!(records.budgets(7).unwrap().len(), 1);
        assert_eq!(
            records
                .expenses(7, date(2026, 3, 1), date(2026, 3, 31))
                .unwrap()
                .len(),
            2
        );
        assert_eq!(records.savings_transactions(7, None).unwrap().len(), 2);
        assert!(records.budgets(8).unwrap().is_empty());
    }
}
