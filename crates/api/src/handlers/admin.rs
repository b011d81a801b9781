//! Admin-only user management.

use axum::extract::{Path, State};
use axum::Json;
use helpdesk_core::error::CoreError;
use helpdesk_db::models::user::{UpdateUserRole, User};
use helpdesk_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/users
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<User>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}

/// PUT /api/v1/admin/users/{id}/role
pub async fn update_user_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateUserRole>,
) -> AppResult<Json<DataResponse<User>>> {
    let user = UserRepo::update_role(&state.pool, &id, input.role)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(user_id = %user.id, role = %user.role, by = %admin.user_id, "User role changed");
    Ok(Json(DataResponse { data: user }))
}
