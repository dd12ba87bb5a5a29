//! Analytics handlers
//!
//! Report building reads through the synchronous SQLite pool, so it runs on
//! the blocking thread pool.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{AppError, AppState, AuthUser};
use statok_core::analytics::{
    AdherenceReport, AnalyticsReport, CategoryReport, ForecastReport, Insight, MonthlyReport,
    SavingsReport,
};
use statok_core::db::Database;
use statok_core::{resolve_period, AnalyticsEngine, ReportWindow};

/// Query parameters shared by every analytics endpoint
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    /// Months back from today (3, 6, 12) or a named preset (this-month, etc)
    pub period: Option<String>,
    /// Custom start date (YYYY-MM-DD)
    pub from: Option<String>,
    /// Custom end date (YYYY-MM-DD)
    pub to: Option<String>,
}

fn resolve_window(state: &AppState, params: &AnalyticsQuery) -> Result<ReportWindow, AppError> {
    let default_period = state.config.analytics.default_period_months.to_string();
    let period = params.period.as_deref().unwrap_or(&default_period);

    resolve_period(
        period,
        params.from.as_deref(),
        params.to.as_deref(),
        Utc::now().date_naive(),
    )
    .map_err(|e| AppError::bad_request(&e.to_string()))
}

/// Build a report off the async runtime and audit the access
async fn run_report<T, F>(
    state: Arc<AppState>,
    user: AuthUser,
    params: AnalyticsQuery,
    report: &'static str,
    build: F,
) -> Result<Json<T>, AppError>
where
    T: Send + 'static,
    F: FnOnce(&AnalyticsEngine, &Database, i64, &ReportWindow) -> statok_core::Result<T>
        + Send
        + 'static,
{
    let window = resolve_window(&state, &params)?;

    let task_state = state.clone();
    let user_id = user.id;
    let result = tokio::task::spawn_blocking(move || {
        build(&task_state.engine, &task_state.db, user_id, &window)
    })
    .await??;

    state.db.log_audit(
        &user.username,
        "report",
        Some(report),
        None,
        Some(&format!("from={}, to={}", window.start, window.end)),
    )?;

    Ok(Json(result))
}

/// GET /api/analytics - Every report for the period
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsReport>, AppError> {
    run_report(state, user, params, "analytics", |engine, db, user_id, window| {
        engine.build_report(db, user_id, window)
    })
    .await
}

/// GET /api/analytics/monthly - Monthly expenditure
pub async fn get_monthly_analytics(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<AnalyticsQuery>,
) -> Result<Json<MonthlyReport>, AppError> {
    run_report(state, user, params, "monthly", |engine, db, user_id, window| {
        engine.monthly(db, user_id, window)
    })
    .await
}

/// GET /api/analytics/adherence - Budget adherence
pub async fn get_adherence_analytics(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<AnalyticsQuery>,
) -> Result<Json<AdherenceReport>, AppError> {
    run_report(state, user, params, "adherence", |engine, db, user_id, window| {
        engine.adherence(db, user_id, window)
    })
    .await
}

/// GET /api/analytics/savings - Savings goal progress
pub async fn get_savings_analytics(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<AnalyticsQuery>,
) -> Result<Json<SavingsReport>, AppError> {
    run_report(state, user, params, "savings", |engine, db, user_id, window| {
        engine.savings(db, user_id, window)
    })
    .await
}

/// GET /api/analytics/categories - Category distribution
pub async fn get_category_analytics(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<AnalyticsQuery>,
) -> Result<Json<CategoryReport>, AppError> {
    run_report(state, user, params, "categories", |engine, db, user_id, window| {
        engine.categories(db, user_id, window)
    })
    .await
}

/// GET /api/analytics/forecast - Expense and savings forecast
pub async fn get_forecast_analytics(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<AnalyticsQuery>,
) -> Result<Json<ForecastReport>, AppError> {
    run_report(state, user, params, "forecast", |engine, db, user_id, window| {
        engine.forecast(db, user_id, window)
    })
    .await
}

/// GET /api/analytics/insights - Insight messages
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<AnalyticsQuery>,
) -> Result<Json<Vec<Insight>>, AppError> {
    run_report(state, user, params, "insights", |engine, db, user_id, window| {
        engine.insights(db, user_id, window)
    })
    .await
}
