//! Savings goal and savings transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::{AppError, AppState, AuthUser, SuccessResponse};
use statok_core::models::{NewSavingsGoal, NewSavingsTransaction, SavingsGoal, SavingsTransaction};

/// GET /api/goals - List the user's savings goals
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<SavingsGoal>>, AppError> {
    let goals = state.db.list_goals(user.id)?;

    state.db.log_audit(
        &user.username,
        "list",
        Some("savings_goal"),
        None,
        Some(&format!("count={}", goals.len())),
    )?;

    Ok(Json(goals))
}

/// POST /api/goals - Create a savings goal
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<NewSavingsGoal>,
) -> Result<Json<SavingsGoal>, AppError> {
    let goal = state.db.create_goal(user.id, &req)?;

    state.db.log_audit(
        &user.username,
        "create",
        Some("savings_goal"),
        Some(goal.id),
        Some(&format!("name={}, target={:.2}", goal.name, goal.target_amount)),
    )?;

    Ok(Json(goal))
}

/// GET /api/goals/:id - Get a single savings goal
pub async fn get_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<SavingsGoal>, AppError> {
    let goal = state
        .db
        .get_goal(user.id, id)?
        .ok_or_else(|| AppError::not_found(&format!("Savings goal {} not found", id)))?;

    state
        .db
        .log_audit(&user.username, "get", Some("savings_goal"), Some(id), None)?;

    Ok(Json(goal))
}

/// PUT /api/goals/:id - Update a goal's details
///
/// The saved amount is not editable here; it follows the goal's transactions.
pub async fn update_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<NewSavingsGoal>,
) -> Result<Json<SavingsGoal>, AppError> {
    let goal = state.db.update_goal(user.id, id, &req)?;

    state.db.log_audit(
        &user.username,
        "update",
        Some("savings_goal"),
        Some(id),
        Some(&format!("name={}, target={:.2}", goal.name, goal.target_amount)),
    )?;

    Ok(Json(goal))
}

/// DELETE /api/goals/:id - Delete a goal and its transactions
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_goal(user.id, id)?;

    state
        .db
        .log_audit(&user.username, "delete", Some("savings_goal"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/goals/:id/transactions - List a goal's transactions, newest first
pub async fn list_goal_transactions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<SavingsTransaction>>, AppError> {
    let transactions = state.db.list_savings_transactions(user.id, id)?;

    state.db.log_audit(
        &user.username,
        "list",
        Some("savings_transaction"),
        None,
        Some(&format!("goal_id={}, count={}", id, transactions.len())),
    )?;

    Ok(Json(transactions))
}

/// POST /api/goals/:id/transactions - Record a deposit or withdrawal
pub async fn create_goal_transaction(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<NewSavingsTransaction>,
) -> Result<Json<SavingsTransaction>, AppError> {
    let transaction = state.db.add_savings_transaction(user.id, id, &req)?;

    state.db.log_audit(
        &user.username,
        "create",
        Some("savings_transaction"),
        Some(transaction.id),
        Some(&format!(
            "goal_id={}, type={}, amount={:.2}",
            id, transaction.transaction_type, transaction.amount
        )),
    )?;

    Ok(Json(transaction))
}

/// DELETE /api/savings-transactions/:id - Delete a transaction and reverse it
pub async fn delete_savings_transaction(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_savings_transaction(user.id, id)?;

    state.db.log_audit(
        &user.username,
        "delete",
        Some("savings_transaction"),
        Some(id),
        None,
    )?;

    Ok(Json(SuccessResponse { success: true }))
}
