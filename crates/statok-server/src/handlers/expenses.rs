//! Expense handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::{AppError, AppState, AuthUser, SuccessResponse};
use statok_core::models::{Expense, NewExpense};

/// GET /api/expenses/:id - Get a single expense
pub async fn get_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Expense>, AppError> {
    let expense = state
        .db
        .get_expense(user.id, id)?
        .ok_or_else(|| AppError::not_found(&format!("Expense {} not found", id)))?;

    state
        .db
        .log_audit(&user.username, "get", Some("expense"), Some(id), None)?;

    Ok(Json(expense))
}

/// PUT /api/expenses/:id - Update an expense
pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<NewExpense>,
) -> Result<Json<Expense>, AppError> {
    let expense = state.db.update_expense(user.id, id, &req)?;

    state.db.log_audit(
        &user.username,
        "update",
        Some("expense"),
        Some(id),
        Some(&format!("amount={:.2}, date={}", expense.amount, expense.date)),
    )?;

    Ok(Json(expense))
}

/// DELETE /api/expenses/:id - Delete an expense
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_expense(user.id, id)?;

    state
        .db
        .log_audit(&user.username, "delete", Some("expense"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}
