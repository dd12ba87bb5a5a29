//! Dashboard handler

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::Serialize;

use crate::{AppError, AppState, AuthUser};
use statok_core::models::{BudgetWithSpent, SavingsGoal};

/// Dashboard summary
#[derive(Serialize)]
pub struct DashboardResponse {
    pub budgets: Vec<BudgetWithSpent>,
    pub goals: Vec<SavingsGoal>,
    pub total_budget: f64,
    pub total_spent: f64,
    pub total_saved: f64,
    pub total_target: f64,
}

/// GET /api/dashboard - Budgets with spending and savings goals
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DashboardResponse>, AppError> {
    let budgets = state.db.list_budgets_with_spent(user.id)?;
    let goals = state.db.list_goals(user.id)?;

    state
        .db
        .log_audit(&user.username, "view", Some("dashboard"), None, None)?;

    Ok(Json(DashboardResponse {
        total_budget: budgets.iter().map(|b| b.budget.budget_amount).sum(),
        total_spent: budgets.iter().map(|b| b.spent).sum(),
        total_saved: goals.iter().map(|g| g.current_amount).sum(),
        total_target: goals.iter().map(|g| g.target_amount).sum(),
        budgets,
        goals,
    }))
}
