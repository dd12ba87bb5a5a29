//! Rule-based insight generation
//!
//! Each rule looks at the finished reports and emits at most one insight.
//! Rules run in a fixed order and the output keeps that order.

use super::types::{
    AdherenceReport, CategoryReport, ForecastReport, Insight, InsightKind, SavingsReport,
};

/// The reports insight rules draw on
pub struct InsightInputs<'a> {
    pub adherence: &'a AdherenceReport,
    pub savings: &'a SavingsReport,
    pub categories: &'a CategoryReport,
    pub forecast: &'a ForecastReport,
}

type InsightRule = fn(&InsightInputs<'_>) -> Option<Insight>;

const INSIGHT_RULES: &[InsightRule] = &[
    budget_adherence,
    savings_champion,
    top_category,
    forecast_outlook,
];

/// Evaluate every rule in order
pub fn generate_insights(inputs: &InsightInputs<'_>) -> Vec<Insight> {
    INSIGHT_RULES.iter().filter_map(|rule| rule(inputs)).collect()
}

fn budget_adherence(inputs: &InsightInputs<'_>) -> Option<Insight> {
    let overall = inputs.adherence.overall_usage_pct;
    let insight = if overall > 100.0 {
        Insight::new(
            InsightKind::Danger,
            "Budget Overspending Alert",
            format!(
                "You are spending {:.1}% over your total budget. Consider reducing expenses.",
                overall - 100.0
            ),
        )
    } else if overall > 90.0 {
        Insight::new(
            InsightKind::Warning,
            "Budget Usage High",
            format!(
                "You have used {:.1}% of your budget. Monitor your spending closely.",
                overall
            ),
        )
    } else {
        Insight::new(
            InsightKind::Success,
            "Budget On Track",
            format!(
                "Great job! You are at {:.1}% of your budget allocation.",
                overall
            ),
        )
    };
    Some(insight)
}

fn savings_champion(inputs: &InsightInputs<'_>) -> Option<Insight> {
    let savings = inputs.savings;
    if savings.total_count == 0 || savings.completion_rate_pct < 50.0 {
        return None;
    }
    Some(Insight::new(
        InsightKind::Success,
        "Savings Champion",
        format!(
            "You've completed {} out of {} savings goals ({:.0}%)!",
            savings.completed_count, savings.total_count, savings.completion_rate_pct
        ),
    ))
}

fn top_category(inputs: &InsightInputs<'_>) -> Option<Insight> {
    let top = inputs.categories.top()?;
    Some(Insight::new(
        InsightKind::Info,
        "Top Spending Category",
        format!(
            "{} accounts for {:.1}% of your spending ({}).",
            top.category,
            top.percentage,
            format_money(top.total_spent)
        ),
    ))
}

fn forecast_outlook(inputs: &InsightInputs<'_>) -> Option<Insight> {
    let expense = inputs.forecast.expense_forecast.first()?;
    let savings = inputs.forecast.savings_forecast.first()?;
    let net = savings - expense;
    let insight = if net > 0.0 {
        Insight::new(
            InsightKind::Success,
            "Positive Forecast",
            format!(
                "Based on trends, you could save {} next month!",
                format_money(net)
            ),
        )
    } else {
        Insight::new(
            InsightKind::Warning,
            "Forecast Alert",
            format!(
                "Projected expenses may exceed savings by {} next month.",
                format_money(net.abs())
            ),
        )
    };
    Some(insight)
}

/// Format an amount as `$1,234.56`
pub fn format_money(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, cents) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::types::CategoryRow;

    fn inputs_with<'a>(
        adherence: &'a AdherenceReport,
        savings: &'a SavingsReport,
        categories: &'a CategoryReport,
        forecast: &'a ForecastReport,
    ) -> InsightInputs<'a> {
        InsightInputs {
            adherence,
            savings,
            categories,
            forecast,
        }
    }

    fn adherence(overall: f64) -> AdherenceReport {
        AdherenceReport {
            overall_usage_pct: overall,
            ..Default::default()
        }
    }

    #[test]
    fn test_adherence_tiers() {
        let savings = SavingsReport::default();
        let categories = CategoryReport::default();
        let forecast = ForecastReport::default();

        let cases = [
            (110.0, InsightKind::Danger, "Budget Overspending Alert"),
            (95.0, InsightKind::Warning, "Budget Usage High"),
            (90.0, InsightKind::Success, "Budget On Track"),
            (0.0, InsightKind::Success, "Budget On Track"),
        ];
        for (overall, kind, title) in cases {
            let adherence = adherence(overall);
            let insights =
                generate_insights(&inputs_with(&adherence, &savings, &categories, &forecast));
            assert_eq!(insights.len(), 1);
            assert_eq!(insights[0].kind, kind);
            assert_eq!(insights[0].title, title);
        }
    }

    #[test]
    fn test_overspending_message() {
        let adherence = adherence(112.5);
        let savings = SavingsReport::default();
        let categories = CategoryReport::default();
        let forecast = ForecastReport::default();

        let insights =
            generate_insights(&inputs_with(&adherence, &savings, &categories, &forecast));
        assert!(insights[0].message.contains("12.5% over"));
    }

    #[test]
    fn test_all_rules_in_order() {
        let adherence = adherence(50.0);
        let savings = SavingsReport {
            rows: Vec::new(),
            completed_count: 1,
            total_count: 2,
            completion_rate_pct: 50.0,
        };
        let categories = CategoryReport {
            rows: vec![CategoryRow {
                category: "Housing".to_string(),
                budget_count: 1,
                transaction_count: 1,
                total_spent: 1500.0,
                average_expense: 1500.0,
                min_expense: 1500.0,
                max_expense: 1500.0,
                total_budget: 2000.0,
                utilization_pct: 75.0,
                percentage: 100.0,
            }],
            total_spent: 1500.0,
        };
        let forecast = ForecastReport {
            expense_forecast: vec![400.0],
            savings_forecast: vec![500.0],
            ..Default::default()
        };

        let insights =
            generate_insights(&inputs_with(&adherence, &savings, &categories, &forecast));
        let titles: Vec<&str> = insights.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Budget On Track",
                "Savings Champion",
                "Top Spending Category",
                "Positive Forecast"
            ]
        );
        assert!(insights[2].message.contains("$1,500.00"));
        assert!(insights[3].message.contains("$100.00"));
    }

    #[test]
    fn test_forecast_alert_needs_both_series() {
        let adherence = adherence(10.0);
        let savings = SavingsReport::default();
        let categories = CategoryReport::default();

        let only_expenses = ForecastReport {
            expense_forecast: vec![400.0],
            ..Default::default()
        };
        let insights =
            generate_insights(&inputs_with(&adherence, &savings, &categories, &only_expenses));
        assert_eq!(insights.len(), 1);

        let losing = ForecastReport {
            expense_forecast: vec![400.0],
            savings_forecast: vec![400.0],
            ..Default::default()
        };
        let insights = generate_insights(&inputs_with(&adherence, &savings, &categories, &losing));
        assert_eq!(insights.last().map(|i| i.title.as_str()), Some("Forecast Alert"));
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(999.5), "$999.50");
        assert_eq!(format_money(1234.567), "$1,234.57");
        assert_eq!(format_money(1234567.0), "$1,234,567.00");
        assert_eq!(format_money(-42.0), "-$42.00");
    }
}
