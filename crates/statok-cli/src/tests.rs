//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use chrono::NaiveDate;
use statok_core::db::Database;
use statok_core::models::{NewBudget, NewExpense, TransactionType, User};
use statok_core::{AnalyticsConfig, AnalyticsEngine};

use crate::cli::{ReportArgs, ReportType};
use crate::commands::{self, truncate};

fn setup_test_db() -> (Database, User) {
    let db = Database::in_memory().unwrap();
    let user = db
        .create_user("maria", "maria@example.com", "correct horse")
        .unwrap();
    (db, user)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Create a budget with one expense per (amount, date) pair, returning the budget id
fn seed_budget(db: &Database, user: &User, name: &str, expenses: &[(f64, NaiveDate)]) -> i64 {
    let budget = db
        .create_budget(
            user.id,
            &NewBudget {
                name: name.to_string(),
                category: "Food".to_string(),
                budget_amount: 500.0,
            },
        )
        .unwrap();
    for (amount, on) in expenses {
        db.add_expense(
            user.id,
            budget.id,
            &NewExpense {
                amount: *amount,
                description: None,
                date: *on,
            },
        )
        .unwrap();
    }
    budget.id
}

// ========== Utility Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("Groceries", 20), "Groceries");
    assert_eq!(truncate("A very long budget name", 10), "A very ...");
    assert_eq!(truncate("Café au lait", 6), "Caf...");
}

#[test]
fn test_parse_date_arg() {
    assert_eq!(
        commands::parse_date_arg(Some("2026-03-01"), "date").unwrap(),
        date(2026, 3, 1)
    );
    assert!(commands::parse_date_arg(Some("03/01/2026"), "date").is_err());
    assert!(commands::parse_date_arg(None, "date").is_ok());
}

// ========== User Resolution Tests ==========

#[test]
fn test_resolve_user_single_user_is_default() {
    let (db, user) = setup_test_db();
    let resolved = commands::resolve_user(&db, None).unwrap();
    assert_eq!(resolved.id, user.id);
}

#[test]
fn test_resolve_user_requires_choice_with_several_users() {
    let (db, _) = setup_test_db();
    commands::cmd_users_add(&db, "sam", "sam@example.com", "another secret").unwrap();

    assert!(commands::resolve_user(&db, None).is_err());
    let sam = commands::resolve_user(&db, Some("sam")).unwrap();
    assert_eq!(sam.username, "sam");
    assert!(commands::resolve_user(&db, Some("nobody")).is_err());
}

#[test]
fn test_resolve_user_empty_database() {
    let db = Database::in_memory().unwrap();
    assert!(commands::resolve_user(&db, None).is_err());
}

#[test]
fn test_cmd_users_add_rejects_short_password() {
    let (db, _) = setup_test_db();
    assert!(commands::cmd_users_add(&db, "sam", "sam@example.com", "short").is_err());
    assert_eq!(db.list_users().unwrap().len(), 1);
}

// ========== Budget Command Tests ==========

#[test]
fn test_cmd_budgets_add_and_list() {
    let (db, user) = setup_test_db();
    commands::cmd_budgets_add(&db, &user, "Groceries", "Food", 400.0).unwrap();

    let budgets = db.list_budgets(user.id).unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].name, "Groceries");
    assert_eq!(budgets[0].budget_amount, 400.0);

    assert!(commands::cmd_budgets_list(&db, &user).is_ok());
}

#[test]
fn test_cmd_budgets_update_keeps_unspecified_fields() {
    let (db, user) = setup_test_db();
    commands::cmd_budgets_add(&db, &user, "Groceries", "Food", 400.0).unwrap();
    let id = db.list_budgets(user.id).unwrap()[0].id;

    commands::cmd_budgets_update(&db, &user, id, None, None, Some(450.0)).unwrap();

    let budget = db.get_budget(user.id, id).unwrap().unwrap();
    assert_eq!(budget.name, "Groceries");
    assert_eq!(budget.category, "Food");
    assert_eq!(budget.budget_amount, 450.0);
}

#[test]
fn test_cmd_budgets_update_missing() {
    let (db, user) = setup_test_db();
    assert!(commands::cmd_budgets_update(&db, &user, 999, Some("X"), None, None).is_err());
}

#[test]
fn test_cmd_budgets_delete() {
    let (db, user) = setup_test_db();
    let id = seed_budget(&db, &user, "Groceries", &[(12.0, date(2026, 1, 5))]);

    commands::cmd_budgets_delete(&db, &user, id).unwrap();
    assert!(db.list_budgets(user.id).unwrap().is_empty());
    assert!(db.list_all_expenses(user.id).unwrap().is_empty());
}

// ========== Expense Command Tests ==========

#[test]
fn test_cmd_expenses_add_list_delete() {
    let (db, user) = setup_test_db();
    let budget_id = seed_budget(&db, &user, "Groceries", &[]);

    commands::cmd_expenses_add(
        &db,
        &user,
        budget_id,
        42.5,
        Some("Market"),
        Some("2026-02-03"),
    )
    .unwrap();

    let expenses = db.list_expenses(user.id, budget_id).unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].date, date(2026, 2, 3));
    assert_eq!(expenses[0].description.as_deref(), Some("Market"));

    assert!(commands::cmd_expenses_list(&db, &user, None, 20).is_ok());
    assert!(commands::cmd_expenses_list(&db, &user, Some(budget_id), 20).is_ok());

    commands::cmd_expenses_delete(&db, &user, expenses[0].id).unwrap();
    assert!(db.list_expenses(user.id, budget_id).unwrap().is_empty());
}

#[test]
fn test_cmd_expenses_add_rejects_bad_input() {
    let (db, user) = setup_test_db();
    let budget_id = seed_budget(&db, &user, "Groceries", &[]);

    assert!(commands::cmd_expenses_add(&db, &user, budget_id, -5.0, None, None).is_err());
    assert!(commands::cmd_expenses_add(&db, &user, budget_id, 5.0, None, Some("soon")).is_err());
    assert!(commands::cmd_expenses_add(&db, &user, 999, 5.0, None, None).is_err());
}

// ========== Goal Command Tests ==========

#[test]
fn test_cmd_goals_deposit_and_withdraw() {
    let (db, user) = setup_test_db();
    commands::cmd_goals_add(&db, &user, "Holiday", 1200.0, "Travel", Some("2027-06-01")).unwrap();
    let goal = db.list_goals(user.id).unwrap().remove(0);
    assert_eq!(goal.deadline, Some(date(2027, 6, 1)));

    commands::cmd_goals_transaction(
        &db,
        &user,
        goal.id,
        300.0,
        TransactionType::Deposit,
        Some("2026-05-01"),
    )
    .unwrap();
    commands::cmd_goals_transaction(
        &db,
        &user,
        goal.id,
        100.0,
        TransactionType::Withdrawal,
        Some("2026-05-10"),
    )
    .unwrap();

    let goal = db.get_goal(user.id, goal.id).unwrap().unwrap();
    assert_eq!(goal.current_amount, 200.0);

    // More than is saved
    assert!(commands::cmd_goals_transaction(
        &db,
        &user,
        goal.id,
        500.0,
        TransactionType::Withdrawal,
        None
    )
    .is_err());

    assert!(commands::cmd_goals_list(&db, &user).is_ok());
}

#[test]
fn test_cmd_goals_add_invalid_deadline() {
    let (db, user) = setup_test_db();
    assert!(commands::cmd_goals_add(&db, &user, "Car", 5000.0, "General", Some("June")).is_err());
    assert!(db.list_goals(user.id).unwrap().is_empty());
}

#[test]
fn test_cmd_goals_delete() {
    let (db, user) = setup_test_db();
    commands::cmd_goals_add(&db, &user, "Car", 5000.0, "General", None).unwrap();
    let id = db.list_goals(user.id).unwrap()[0].id;

    commands::cmd_goals_delete(&db, &user, id).unwrap();
    assert!(db.list_goals(user.id).unwrap().is_empty());
}

// ========== Report Command Tests ==========

fn report_args(period: &str, json: bool) -> ReportArgs {
    ReportArgs {
        period: Some(period.to_string()),
        json,
        ..Default::default()
    }
}

#[test]
fn test_resolve_report_window_uses_default_period() {
    let today = date(2026, 10, 17);
    let window = commands::resolve_report_window(&ReportArgs::default(), 6, today).unwrap();
    assert_eq!(window.start, date(2026, 4, 17));
    assert_eq!(window.end, today);

    let args = ReportArgs {
        from: Some("2026-01-01".to_string()),
        to: Some("2026-03-31".to_string()),
        ..Default::default()
    };
    let window = commands::resolve_report_window(&args, 6, today).unwrap();
    assert_eq!(window.start, date(2026, 1, 1));
    assert_eq!(window.end, date(2026, 3, 31));

    assert!(commands::resolve_report_window(&report_args("fortnight", false), 6, today).is_err());
}

#[test]
fn test_cmd_report_every_type() {
    let (db, user) = setup_test_db();
    seed_budget(
        &db,
        &user,
        "Groceries",
        &[
            (120.0, date(2026, 7, 4)),
            (180.0, date(2026, 8, 9)),
            (240.0, date(2026, 9, 12)),
        ],
    );
    commands::cmd_goals_add(&db, &user, "Holiday", 1200.0, "Travel", None).unwrap();

    let engine = AnalyticsEngine::new(AnalyticsConfig::default());
    let today = date(2026, 10, 17);

    let reports = [
        ReportType::Monthly { args: report_args("6", false) },
        ReportType::Adherence { args: report_args("this-year", false) },
        ReportType::Savings { args: report_args("12", false) },
        ReportType::Categories { args: report_args("all", false) },
        ReportType::Forecast { args: report_args("6", false) },
        ReportType::Insights { args: report_args("6", false) },
        ReportType::All { args: report_args("6", false) },
        ReportType::All { args: report_args("6", true) },
    ];
    for report in &reports {
        commands::cmd_report(&db, &engine, &user, report, today).unwrap();
    }

    let audit = db.list_audit_log(&user.username, 50).unwrap();
    assert_eq!(audit.iter().filter(|e| e.action == "report").count(), reports.len());
}

#[test]
fn test_cmd_report_bad_period() {
    let (db, user) = setup_test_db();
    let engine = AnalyticsEngine::new(AnalyticsConfig::default());
    let report = ReportType::Monthly {
        args: report_args("0", false),
    };
    assert!(commands::cmd_report(&db, &engine, &user, &report, date(2026, 10, 17)).is_err());
}

// ========== Export/Import Command Tests ==========

#[test]
fn test_cmd_export_then_import_expenses() {
    let (db, user) = setup_test_db();
    let source = seed_budget(
        &db,
        &user,
        "Groceries",
        &[(12.5, date(2026, 1, 3)), (30.0, date(2026, 2, 14))],
    );
    let target = seed_budget(&db, &user, "Copy", &[]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("expenses.csv");

    commands::cmd_export_expenses(&db, &user, Some(&path), None, None, Some(source)).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 3);

    commands::cmd_import_expenses(&db, &user, &path, target).unwrap();
    let imported = db.list_expenses(user.id, target).unwrap();
    assert_eq!(imported.len(), 2);
    assert!(imported.iter().any(|e| e.amount == 30.0 && e.date == date(2026, 2, 14)));
}

#[test]
fn test_cmd_export_expenses_date_filter() {
    let (db, user) = setup_test_db();
    seed_budget(
        &db,
        &user,
        "Groceries",
        &[(12.5, date(2026, 1, 3)), (30.0, date(2026, 2, 14))],
    );

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("february.csv");
    commands::cmd_export_expenses(
        &db,
        &user,
        Some(&path),
        Some("2026-02-01"),
        Some("2026-02-28"),
        None,
    )
    .unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("2026-02-14"));

    assert!(commands::cmd_export_expenses(&db, &user, None, Some("Feb"), None, None).is_err());
}

#[test]
fn test_export_count_ignores_multiline_descriptions() {
    let (db, user) = setup_test_db();
    let source = seed_budget(&db, &user, "Groceries", &[]);
    db.add_expense(
        user.id,
        source,
        &NewExpense {
            amount: 18.0,
            description: Some("Market\nbread and eggs".to_string()),
            date: date(2026, 3, 7),
        },
    )
    .unwrap();

    let (csv, rows) = commands::transfer::render_expense_export(
        &db,
        &user,
        &statok_core::ExpenseExportOptions::default(),
    )
    .unwrap();
    assert_eq!(rows, 1);
    assert_eq!(csv.lines().count(), 3);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("multiline.csv");
    std::fs::write(&path, &csv).unwrap();
    let target = seed_budget(&db, &user, "Copy", &[]);
    commands::cmd_import_expenses(&db, &user, &path, target).unwrap();
    let imported = db.list_expenses(user.id, target).unwrap();
    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].amount, 18.0);
}

#[test]
fn test_cmd_import_missing_file() {
    let (db, user) = setup_test_db();
    let budget_id = seed_budget(&db, &user, "Groceries", &[]);
    let missing = std::path::Path::new("/nonexistent/expenses.csv");
    assert!(commands::cmd_import_expenses(&db, &user, missing, budget_id).is_err());
}
