//! Route definitions for the `/admin` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET    /users                -> list_users
/// PUT    /users/{id}/role      -> update_user_role
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/{id}/role", put(admin::update_user_role))
}
