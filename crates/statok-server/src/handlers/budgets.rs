//! Budget handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::{AppError, AppState, AuthUser, SuccessResponse};
use statok_core::models::{Budget, Expense, NewBudget, NewExpense};

/// GET /api/budgets - List the user's budgets
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Budget>>, AppError> {
    let budgets = state.db.list_budgets(user.id)?;

    // Audit log - read access
    state.db.log_audit(
        &user.username,
        "list",
        Some("budget"),
        None,
        Some(&format!("count={}", budgets.len())),
    )?;

    Ok(Json(budgets))
}

/// POST /api/budgets - Create a budget
pub async fn create_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<NewBudget>,
) -> Result<Json<Budget>, AppError> {
    let budget = state.db.create_budget(user.id, &req)?;

    state.db.log_audit(
        &user.username,
        "create",
        Some("budget"),
        Some(budget.id),
        Some(&format!("name={}, amount={:.2}", budget.name, budget.budget_amount)),
    )?;

    Ok(Json(budget))
}

/// GET /api/budgets/:id - Get a single budget
pub async fn get_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Budget>, AppError> {
    let budget = state
        .db
        .get_budget(user.id, id)?
        .ok_or_else(|| AppError::not_found(&format!("Budget {} not found", id)))?;

    state
        .db
        .log_audit(&user.username, "get", Some("budget"), Some(id), None)?;

    Ok(Json(budget))
}

/// PUT /api/budgets/:id - Update a budget's name, category and amount
pub async fn update_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<NewBudget>,
) -> Result<Json<Budget>, AppError> {
    let budget = state.db.update_budget(user.id, id, &req)?;

    state.db.log_audit(
        &user.username,
        "update",
        Some("budget"),
        Some(id),
        Some(&format!("name={}, amount={:.2}", budget.name, budget.budget_amount)),
    )?;

    Ok(Json(budget))
}

/// DELETE /api/budgets/:id - Delete a budget and its expenses
pub async fn delete_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_budget(user.id, id)?;

    state
        .db
        .log_audit(&user.username, "delete", Some("budget"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/budgets/:id/expenses - List a budget's expenses, newest first
pub async fn list_budget_expenses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Expense>>, AppError> {
    let expenses = state.db.list_expenses(user.id, id)?;

    state.db.log_audit(
        &user.username,
        "list",
        Some("expense"),
        None,
        Some(&format!("budget_id={}, count={}", id, expenses.len())),
    )?;

    Ok(Json(expenses))
}

/// POST /api/budgets/:id/expenses - Log an expense against a budget
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<NewExpense>,
) -> Result<Json<Expense>, AppError> {
    let expense = state.db.add_expense(user.id, id, &req)?;

    state.db.log_audit(
        &user.username,
        "create",
        Some("expense"),
        Some(expense.id),
        Some(&format!("budget_id={}, amount={:.2}", id, expense.amount)),
    )?;

    Ok(Json(expense))
}
