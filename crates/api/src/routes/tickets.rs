//! Route definitions for the `/tickets` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::tickets;
use crate::state::AppState;

/// ```text
/// POST   /                       -> create_ticket
/// GET    /                       -> list_tickets (staff)
/// GET    /requester/{user_id}    -> list_requester_tickets
/// GET    /{id}                   -> get_ticket
/// DELETE /{id}                   -> delete_ticket (admin)
/// PUT    /{id}/assign            -> assign_ticket (staff)
/// PUT    /{id}/status            -> update_ticket_status (staff)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(tickets::create_ticket).get(tickets::list_tickets),
        )
        .route(
            "/requester/{user_id}",
            get(tickets::list_requester_tickets),
        )
        .route(
            "/{id}",
            get(tickets::get_ticket).delete(tickets::delete_ticket),
        )
        .route("/{id}/assign", put(tickets::assign_ticket))
        .route("/{id}/status", put(tickets::update_ticket_status))
}
