// handlers/protected/employees/show.rs - GET /employees/:id handler

use axum::extract::{rejection::PathRejection, Path, State};
use uuid::Uuid;

use crate::api::format::EmployeeDto;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

pub async fn employee_show(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<EmployeeDto> {
    let Path(id) = id?;
    let employee = state.employees.get(id).await?;
    Ok(ApiResponse::success(employee.into()))
}
