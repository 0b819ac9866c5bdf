pub mod auth;
pub mod authz;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use authz::{AccessGate, Directory};
use middleware::jwt_auth_middleware;

/// Explicitly constructed data-access context, passed into every component.
/// Both ports are usually the same backing store (`db::PgStore` in
/// production, `authz::MemoryStore` in tests).
#[derive(Clone)]
pub struct AppState {
    pub gate: AccessGate,
    pub directory: Arc<dyn Directory>,
}

pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/auth/whoami", get(handlers::auth::whoami))
        .route(
            "/api/regionals",
            get(handlers::regionals::list).post(handlers::regionals::create),
        )
        .route("/api/regionals/:id", get(handlers::regionals::get))
        .route(
            "/api/centers",
            get(handlers::centers::list).post(handlers::centers::create),
        )
        .route("/api/centers/:id", get(handlers::centers::get))
        .route("/api/users", get(handlers::users::list))
        .route("/api/users/:id", get(handlers::users::get))
        .route("/api/roles", get(handlers::roles::list))
        .route("/api/document-types", get(handlers::document_types::list))
        .route_layer(axum_middleware::from_fn(jwt_auth_middleware));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes (token acquisition)
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        // Protected API
        .merge(protected)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Centra API",
            "version": version,
            "description": "RBAC administrative API for regionals, centers, users and document types",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/login, /auth/refresh (public - token acquisition)",
                "whoami": "/api/auth/whoami (protected)",
                "regionals": "/api/regionals[/:id] (protected, scoped)",
                "centers": "/api/centers[/:id] (protected, scoped)",
                "users": "/api/users[/:id] (protected, scoped)",
                "roles": "/api/roles (protected)",
                "document_types": "/api/document-types (protected)",
            }
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.directory.ping().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
