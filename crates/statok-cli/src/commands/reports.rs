//! Report command implementations

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use statok_core::analytics::{
    format_money, AdherenceReport, CategoryReport, ForecastReport, Insight, InsightKind,
    MonthlyReport, SavingsReport,
};
use statok_core::db::Database;
use statok_core::models::User;
use statok_core::{resolve_period, AnalyticsEngine, ReportWindow};

use super::truncate;
use crate::cli::{ReportArgs, ReportType};

/// Resolve report arguments to a window, using the configured default period
pub fn resolve_report_window(
    args: &ReportArgs,
    default_period_months: u32,
    today: NaiveDate,
) -> Result<ReportWindow> {
    let default_period = default_period_months.to_string();
    let period = args.period.as_deref().unwrap_or(&default_period);

    Ok(resolve_period(
        period,
        args.from.as_deref(),
        args.to.as_deref(),
        today,
    )?)
}

fn emit<T: Serialize>(report: &T, json: bool, print: impl FnOnce(&T)) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{}", text);
    } else {
        print(report);
    }
    Ok(())
}

pub fn cmd_report(
    db: &Database,
    engine: &AnalyticsEngine,
    user: &User,
    report_type: &ReportType,
    today: NaiveDate,
) -> Result<()> {
    let args = report_type.args();
    let window = resolve_report_window(args, engine.config().default_period_months, today)?;

    let name = match report_type {
        ReportType::Monthly { .. } => {
            let report = engine.monthly(db, user.id, &window)?;
            emit(&report, args.json, |r| print_monthly(r, &window))?;
            "monthly"
        }
        ReportType::Adherence { .. } => {
            let report = engine.adherence(db, user.id, &window)?;
            emit(&report, args.json, |r| print_adherence(r, &window))?;
            "adherence"
        }
        ReportType::Savings { .. } => {
            let report = engine.savings(db, user.id, &window)?;
            emit(&report, args.json, print_savings)?;
            "savings"
        }
        ReportType::Categories { .. } => {
            let report = engine.categories(db, user.id, &window)?;
            emit(&report, args.json, |r| print_categories(r, &window))?;
            "categories"
        }
        ReportType::Forecast { .. } => {
            let report = engine.forecast(db, user.id, &window)?;
            emit(&report, args.json, print_forecast)?;
            "forecast"
        }
        ReportType::Insights { .. } => {
            let insights = engine.insights(db, user.id, &window)?;
            emit(&insights, args.json, |i| print_insights(i))?;
            "insights"
        }
        ReportType::All { .. } => {
            let report = engine.build_report(db, user.id, &window)?;
            emit(&report, args.json, |r| {
                print_monthly(&r.monthly, &window);
                print_adherence(&r.adherence, &window);
                print_savings(&r.savings);
                print_categories(&r.categories, &window);
                print_forecast(&r.forecast);
                print_insights(&r.insights);
            })?;
            "analytics"
        }
    };

    db.log_audit(
        &user.username,
        "report",
        Some(name),
        None,
        Some(&format!("from={}, to={}", window.start, window.end)),
    )?;

    Ok(())
}

fn print_monthly(report: &MonthlyReport, window: &ReportWindow) {
    println!();
    println!("📅 Monthly Expenditure");
    println!("   Period: {} to {}", window.start, window.end);
    println!("   ─────────────────────────────────────────────────────────────");

    if report.months.is_empty() {
        println!("   No expenses found in this period.");
        return;
    }

    println!(
        "   {:8} │ {:>5} │ {:>10} │ {:>9} │ {:>9} │ {:>9} │ {:>7}",
        "Month", "Count", "Total", "Average", "Min", "Max", "Growth"
    );
    println!("   ─────────┼───────┼────────────┼───────────┼───────────┼───────────┼────────");

    for m in &report.months {
        let growth = match m.growth_pct {
            Some(g) => format!("{:>+6.1}%", g),
            None => "-".to_string(),
        };
        println!(
            "   {:8} │ {:>5} │ {:>10.2} │ {:>9.2} │ {:>9.2} │ {:>9.2} │ {:>7}",
            m.month, m.transaction_count, m.total, m.average, m.min, m.max, growth
        );
    }

    println!();
    println!(
        "   Total: {} across {} expenses",
        format_money(report.total_spent),
        report.transaction_count
    );
}

fn print_adherence(report: &AdherenceReport, window: &ReportWindow) {
    println!();
    println!("💰 Budget Adherence");
    println!("   Period: {} to {}", window.start, window.end);
    println!("   ─────────────────────────────────────────────────────────────");

    if report.rows.is_empty() {
        println!("   No budgets yet.");
        return;
    }

    println!(
        "   {:20} │ {:>10} │ {:>10} │ {:>10} │ {:>6} │ Status",
        "Budget", "Budget", "Spent", "Remaining", "Used"
    );
    println!("   ─────────────────────┼────────────┼────────────┼────────────┼────────┼─────────────");

    for row in &report.rows {
        println!(
            "   {:20} │ {:>10.2} │ {:>10.2} │ {:>10.2} │ {:>5.1}% │ {}",
            truncate(&row.name, 20),
            row.budget_amount,
            row.spent,
            row.remaining,
            row.usage_pct,
            row.status
        );
    }

    println!();
    println!(
        "   Overall: {} of {} ({:.1}%)",
        format_money(report.total_spent),
        format_money(report.total_budget),
        report.overall_usage_pct
    );
}

fn print_savings(report: &SavingsReport) {
    println!();
    println!("🎯 Savings Goals");
    println!("   ─────────────────────────────────────────────────────────────");

    if report.rows.is_empty() {
        println!("   No savings goals yet.");
        return;
    }

    println!(
        "   {:20} │ {:>10} │ {:>10} │ {:>6} │ {:>9} │ {:>6} │ Status",
        "Goal", "Saved", "Target", "%", "Per month", "Months"
    );
    println!("   ─────────────────────┼────────────┼────────────┼────────┼───────────┼────────┼──────────────");

    for row in &report.rows {
        let months = row
            .months_to_completion
            .map(|m| m.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "   {:20} │ {:>10.2} │ {:>10.2} │ {:>5.1}% │ {:>9.2} │ {:>6} │ {}",
            truncate(&row.name, 20),
            row.current_amount,
            row.target_amount,
            row.progress_pct,
            row.velocity,
            months,
            row.status
        );
    }

    println!();
    println!(
        "   Completed: {} of {} ({:.1}%)",
        report.completed_count, report.total_count, report.completion_rate_pct
    );
}

fn print_categories(report: &CategoryReport, window: &ReportWindow) {
    println!();
    println!("🏷️  Spending by Category");
    println!("   Period: {} to {}", window.start, window.end);
    println!("   ─────────────────────────────────────────────────────────────");

    if report.rows.is_empty() {
        println!("   No budgets yet.");
        return;
    }

    println!(
        "   {:18} │ {:>10} │ {:>6} │ {:>5} │ {:>9} │ {:>6}",
        "Category", "Spent", "Share", "Count", "Average", "Used"
    );
    println!("   ───────────────────┼────────────┼────────┼───────┼───────────┼───────");

    for row in &report.rows {
        println!(
            "   {:18} │ {:>10.2} │ {:>5.1}% │ {:>5} │ {:>9.2} │ {:>5.1}%",
            truncate(&row.category, 18),
            row.total_spent,
            row.percentage,
            row.transaction_count,
            row.average_expense,
            row.utilization_pct
        );
    }

    println!();
    println!("   Total: {}", format_money(report.total_spent));
}

fn print_forecast(report: &ForecastReport) {
    println!();
    println!("🔮 Forecast");
    println!("   ─────────────────────────────────────────────────────────────");

    if report.months.is_empty() {
        println!("   Not enough history to forecast (need at least 2 months).");
        return;
    }

    println!(
        "   {:15} │ {:>10} │ {:>10} │ {:>10}",
        "Month", "Expenses", "Savings", "Net"
    );
    println!("   ────────────────┼────────────┼────────────┼───────────");

    for month in &report.months {
        println!(
            "   {:15} │ {:>10.2} │ {:>10.2} │ {:>10.2}",
            month.label, month.expense, month.savings, month.net
        );
    }

    println!();
    println!(
        "   Average month: {} spent, {} saved",
        format_money(report.average_monthly_expense),
        format_money(report.average_monthly_savings)
    );
    println!("   Confidence: {}", report.confidence.as_str());
}

fn print_insights(insights: &[Insight]) {
    println!();
    println!("💡 Insights");
    println!("   ─────────────────────────────────────────────────────────────");

    if insights.is_empty() {
        println!("   Nothing to report yet.");
        return;
    }

    for insight in insights {
        let icon = match insight.kind {
            InsightKind::Success => "✅",
            InsightKind::Warning => "⚠️ ",
            InsightKind::Danger => "🚨",
            InsightKind::Info => "ℹ️ ",
        };
        println!("   {} {}", icon, insight.title);
        println!("      {}", insight.message);
    }
}
