// handlers/public/auth/login.rs - POST /auth/login handler

use axum::extract::{rejection::JsonRejection, Json, State};
use std::collections::HashMap;

use crate::api::format::{LoginRequest, LoginResponse};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

/**
 * POST /auth/login - Authenticate an employee and receive a JWT
 *
 * Input: `{ "email": "string", "password": "string" }`
 *
 * Output: `{ "success": true, "data": { "token", "expiresIn", "employee" } }`
 *
 * 400 when either field is blank, 401 for any credential mismatch.
 */
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(body) = payload?;

    let mut field_errors = HashMap::new();
    if body.email.trim().is_empty() {
        field_errors.insert("email".to_string(), "email is required.".to_string());
    }
    if body.password.is_empty() {
        field_errors.insert("password".to_string(), "password is required.".to_string());
    }
    if !field_errors.is_empty() {
        return Err(ApiError::validation_error("Email and password are required", Some(field_errors)));
    }

    let (token, employee) = state.auth.login(&body.email, &body.password).await?;

    Ok(ApiResponse::success(LoginResponse {
        token,
        expires_in: state.config.security.jwt_expiry_hours * 3600,
        employee: employee.into(),
    }))
}
