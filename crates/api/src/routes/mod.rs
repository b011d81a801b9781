pub mod admin;
pub mod health;
pub mod tickets;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /users/register                       identity-provider signup (public)
/// /users/login                          exchange user id for a token (public)
///
/// /admin/users                          list users (admin)
/// /admin/users/{id}/role                change role (admin)
///
/// /tickets                              intake (auth), list (staff)
/// /tickets/requester/{user_id}          tickets by requester (self or staff)
/// /tickets/{id}                         get (owner or staff), delete (admin)
/// /tickets/{id}/assign                  assign / unassign (staff)
/// /tickets/{id}/status                  status transition (staff)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/admin", admin::router())
        .nest("/tickets", tickets::router())
}
