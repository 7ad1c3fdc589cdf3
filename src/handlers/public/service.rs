// handlers/public/service.rs - GET / and GET /health

use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::AppState;

pub async fn root_get() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Employee Directory API",
            "version": version,
            "description": "Employee directory with role-hierarchy authorization",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "login": "POST /auth/login (public - token acquisition)",
                "employees": "/employees[/:id] (protected)",
            }
        }
    }))
}

/// Storage ping; 503 when the repository cannot be reached.
pub async fn health_get(State(state): State<AppState>) -> Response {
    match state.repository.health_check().await {
        Ok(_) => Json(json!({
            "success": true,
            "data": {
                "status": "ok",
                "timestamp": chrono::Utc::now(),
                "database": "ok"
            }
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            ApiError::service_unavailable("database unavailable").into_response()
        }
    }
}
