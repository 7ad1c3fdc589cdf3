// handlers/protected/employees/list.rs - GET /employees handler

use axum::extract::{rejection::QueryRejection, Query, State};

use crate::api::format::{EmployeeDto, ListQuery};
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

/// `?q=` filters by first name, last name, email or document number.
pub async fn employee_list(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Vec<EmployeeDto>> {
    let Query(query) = query?;
    let employees = state.employees.list(query.q.as_deref()).await?;
    Ok(ApiResponse::success(employees.into_iter().map(EmployeeDto::from).collect()))
}
