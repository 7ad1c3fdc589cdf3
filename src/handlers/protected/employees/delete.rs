// handlers/protected/employees/delete.rs - DELETE /employees/:id handler

use axum::extract::{
    rejection::{PathRejection, QueryRejection},
    Extension, Path, Query, State,
};
use uuid::Uuid;

use crate::api::format::DeleteQuery;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::AppState;

/// 204 on success; 409 when the record changed, vanished, or still manages someone.
pub async fn employee_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<DeleteQuery>, QueryRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    let Query(query) = query?;

    state.employees.delete(&user, id, query.version).await?;
    Ok(ApiResponse::no_content())
}
