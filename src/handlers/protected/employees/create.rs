// handlers/protected/employees/create.rs - POST /employees handler

use axum::extract::{rejection::JsonRejection, Extension, Json, State};

use crate::api::format::{CreateEmployeeRequest, EmployeeDto};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::AppState;

/**
 * POST /employees - Create an employee
 *
 * 201 with the stored record; 400 on a rule violation, 403 when the caller's
 * role ranks below the requested role.
 */
pub async fn employee_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> ApiResult<EmployeeDto> {
    let Json(body) = payload?;
    let (draft, password) = body.into_parts();

    let created = state.employees.create(&user, draft, &password).await?;
    Ok(ApiResponse::created(created.into()))
}
