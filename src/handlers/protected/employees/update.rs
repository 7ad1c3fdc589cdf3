// handlers/protected/employees/update.rs - PUT /employees/:id handler

use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    Extension, Json, Path, State,
};
use uuid::Uuid;

use crate::api::format::{EmployeeDto, UpdateEmployeeRequest};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::AppState;

/**
 * PUT /employees/:id - Replace an employee's fields and phone set
 *
 * Body matches create minus `password`, plus an optional `version`.
 * 404 unknown id, 403 rank check, 400 rule violation, 409 stale version.
 */
pub async fn employee_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateEmployeeRequest>, JsonRejection>,
) -> ApiResult<EmployeeDto> {
    let Path(id) = id?;
    let Json(body) = payload?;
    let (draft, version) = body.into_parts();

    let updated = state.employees.update(&user, id, draft, version).await?;
    Ok(ApiResponse::success(updated.into()))
}
