//! Authentication-related handlers

use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{bearer_token, AppError, AppState, AuthUser, SuccessResponse};
use statok_core::models::User;

/// Request body for registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email
    #[serde(alias = "email")]
    pub username: String,
    pub password: String,
}

/// Response for register and login
#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

fn start_session(state: &AppState, user: User) -> Result<Json<SessionResponse>, AppError> {
    let session = state.db.create_session(user.id, state.config.session_ttl())?;

    Ok(Json(SessionResponse {
        token: session.token,
        expires_at: session.expires_at,
        user,
    }))
}

/// POST /api/auth/register - Create an account and log in
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let user = state
        .db
        .create_user(&req.username, &req.email, &req.password)?;

    state.db.log_audit(
        &user.username,
        "register",
        Some("user"),
        Some(user.id),
        None,
    )?;

    start_session(&state, user)
}

/// POST /api/auth/login - Exchange credentials for a session token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let user = match state.db.authenticate_user(&req.username, &req.password) {
        Ok(user) => user,
        Err(e) => {
            warn!(login = %req.username, "Failed login attempt");
            return Err(e.into());
        }
    };

    info!(user = %user.username, "User logged in");
    state
        .db
        .log_audit(&user.username, "login", Some("session"), None, None)?;

    start_session(&state, user)
}

/// POST /api/auth/logout - End the current session
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
) -> Result<Json<SuccessResponse>, AppError> {
    let removed = match bearer_token(&headers) {
        Some(token) => state.db.delete_session(token)?,
        None => false,
    };

    state
        .db
        .log_audit(&user.username, "logout", Some("session"), None, None)?;

    Ok(Json(SuccessResponse { success: removed }))
}

/// GET /api/me - The currently authenticated user
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<User>, AppError> {
    let user = state
        .db
        .get_user(user.id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(user))
}
