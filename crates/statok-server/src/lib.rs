//! Statok Web Server
//!
//! Axum-based REST API for the Statok personal finance application.
//!
//! Security features:
//! - Session authentication with bearer tokens (only a digest is stored)
//! - Every record is scoped to the authenticated user
//! - Restrictive CORS policy and security headers
//! - Audit logging for all API access (reads and writes)
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{debug, error, info, warn};

use statok_core::db::Database;
use statok_core::{AnalyticsConfig, AnalyticsEngine};

mod handlers;

/// Maximum page size for list endpoints
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Default session lifetime: one week
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;

const ALLOWED_ORIGINS_ENV: &str = "STATOK_ALLOWED_ORIGINS";
const SESSION_TTL_ENV: &str = "STATOK_SESSION_TTL_HOURS";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// How long a login stays valid
    pub session_ttl_hours: i64,
    /// Analytics settings shared by every report endpoint
    pub analytics: AnalyticsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            analytics: AnalyticsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Build a config from `STATOK_ALLOWED_ORIGINS` (comma-separated) and
    /// `STATOK_SESSION_TTL_HOURS`, falling back to defaults
    pub fn from_env(analytics: AnalyticsConfig) -> Self {
        let allowed_origins = std::env::var(ALLOWED_ORIGINS_ENV)
            .map(|v| parse_origins(&v))
            .unwrap_or_default();

        let session_ttl_hours = match std::env::var(SESSION_TTL_ENV) {
            Ok(value) => match value.trim().parse::<i64>() {
                Ok(hours) if hours > 0 => hours,
                _ => {
                    warn!(value = %value, "Ignoring invalid {}", SESSION_TTL_ENV);
                    DEFAULT_SESSION_TTL_HOURS
                }
            },
            Err(_) => DEFAULT_SESSION_TTL_HOURS,
        };

        Self {
            allowed_origins,
            session_ttl_hours,
            analytics,
        }
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    pub engine: AnalyticsEngine,
}

/// The user a request was authenticated as, set by the auth middleware
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
}

/// Extract the bearer token from an Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authentication middleware - resolves the bearer token to a session user
///
/// On success the [`AuthUser`] is inserted as a request extension for the
/// handlers. Missing, unknown and expired tokens all get the same 401.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let user = match bearer_token(request.headers()) {
        Some(token) => state.db.resolve_session(token),
        None => Ok(None),
    };

    match user {
        Ok(Some(user)) => {
            debug!(user = %user.username, path = %request.uri().path(), "Authenticated via session");
            request.extensions_mut().insert(AuthUser {
                id: user.id,
                username: user.username,
            });
            next.run(request).await
        }
        Ok(None) => {
            warn!(path = %request.uri().path(), "Unauthorized request - no valid session");
            AppError::unauthorized("Authentication required").into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        db,
        engine: AnalyticsEngine::new(config.analytics.clone()),
        config: config.clone(),
    });

    let public_routes = Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login));

    let protected_routes = Router::new()
        // Auth
        .route("/auth/logout", post(handlers::logout))
        .route("/me", get(handlers::get_me))
        // Dashboard
        .route("/dashboard", get(handlers::get_dashboard))
        // Budgets
        .route(
            "/budgets",
            get(handlers::list_budgets).post(handlers::create_budget),
        )
        .route(
            "/budgets/:id",
            get(handlers::get_budget)
                .put(handlers::update_budget)
                .delete(handlers::delete_budget),
        )
        .route(
            "/budgets/:id/expenses",
            get(handlers::list_budget_expenses).post(handlers::create_expense),
        )
        // Expenses
        .route(
            "/expenses/:id",
            get(handlers::get_expense)
                .put(handlers::update_expense)
                .delete(handlers::delete_expense),
        )
        // Savings goals
        .route("/goals", get(handlers::list_goals).post(handlers::create_goal))
        .route(
            "/goals/:id",
            get(handlers::get_goal)
                .put(handlers::update_goal)
                .delete(handlers::delete_goal),
        )
        .route(
            "/goals/:id/transactions",
            get(handlers::list_goal_transactions).post(handlers::create_goal_transaction),
        )
        .route(
            "/savings-transactions/:id",
            delete(handlers::delete_savings_transaction),
        )
        // Analytics
        .route("/analytics", get(handlers::get_analytics))
        .route("/analytics/monthly", get(handlers::get_monthly_analytics))
        .route("/analytics/adherence", get(handlers::get_adherence_analytics))
        .route("/analytics/savings", get(handlers::get_savings_analytics))
        .route(
            "/analytics/categories",
            get(handlers::get_category_analytics),
        )
        .route("/analytics/forecast", get(handlers::get_forecast_analytics))
        .route("/analytics/insights", get(handlers::get_insights))
        // Audit log
        .route("/audit", get(handlers::list_audit_log))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = public_routes.merge(protected_routes);

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        // Allow specified origins
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    // Security headers
    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; font-src 'self'; connect-src 'self'; frame-ancestors 'none'"
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    // Drop sessions that expired while the server was down
    match db.purge_expired_sessions() {
        Ok(count) if count > 0 => info!("Purged {} expired session(s)", count),
        Ok(_) => {}
        Err(e) => warn!("Failed to purge expired sessions: {}", e),
    }

    if config.allowed_origins.is_empty() {
        info!("CORS: same-origin only (set {} to allow others)", ALLOWED_ORIGINS_ENV);
    }

    info!(database = %db.path(), "Opened database");

    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

/// Status for core errors that describe a client mistake
fn client_status(err: &statok_core::Error) -> Option<StatusCode> {
    use statok_core::Error;

    match err {
        Error::NotFound(_) => Some(StatusCode::NOT_FOUND),
        Error::InvalidData(_) | Error::Csv(_) => Some(StatusCode::BAD_REQUEST),
        Error::Auth(_) => Some(StatusCode::UNAUTHORIZED),
        Error::Conflict(_) => Some(StatusCode::CONFLICT),
        _ => None,
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        if let Some(status) = err
            .downcast_ref::<statok_core::Error>()
            .and_then(client_status)
        {
            return Self {
                status,
                message: err.to_string(),
                internal: None,
            };
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
