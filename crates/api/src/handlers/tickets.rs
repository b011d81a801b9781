//! Handlers for the `/tickets` resource.
//!
//! Creation runs the intake pipeline. Triage (listing everything,
//! assignment, status changes) is restricted to staff; deletion to admins.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use helpdesk_core::error::CoreError;
use helpdesk_core::search::{clamp_limit, clamp_offset};
use helpdesk_core::ticket::{validate_transition, TicketDraft};
use helpdesk_core::types::DbId;
use helpdesk_db::models::ticket::{AssignTicket, Ticket, TicketListParams, UpdateTicketStatus};
use helpdesk_db::repositories::{TicketRepo, UserRepo};
use helpdesk_events::{PlatformEvent, EVENT_TICKET_CREATED};
use helpdesk_pipeline::IntakePipeline;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireAuth, RequireStaff};
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

async fn find_ticket(state: &AppState, id: DbId) -> AppResult<Ticket> {
    TicketRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Ticket",
                id: id.to_string(),
            })
        })
}

// ---------------------------------------------------------------------------
// POST /tickets
// ---------------------------------------------------------------------------

/// Run ticket intake for a draft.
///
/// A blank `requester_id` defaults to the caller. Non-staff callers may only
/// file tickets for themselves.
pub async fn create_ticket(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Json(mut draft): Json<TicketDraft>,
) -> AppResult<impl IntoResponse> {
    if draft.requester_id.trim().is_empty() {
        draft.requester_id = auth.user_id.clone();
    }
    if !auth.can_access(&draft.requester_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only file tickets for yourself".into(),
        )));
    }

    let ticket = IntakePipeline::new(state.generator.as_deref(), &state.pool, &state.pool)
        .with_options(state.intake_options)
        .run(&draft)
        .await?;

    state.event_bus.publish(
        PlatformEvent::new(EVENT_TICKET_CREATED)
            .with_source("ticket", ticket.id)
            .with_actor(auth.user_id.clone())
            .with_payload(serde_json::json!({ "priority": ticket.priority })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: ticket })))
}

// ---------------------------------------------------------------------------
// GET /tickets
// ---------------------------------------------------------------------------

/// List all tickets, newest first, with optional priority/status filters.
pub async fn list_tickets(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<TicketListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
    let offset = clamp_offset(params.offset);

    let tickets =
        TicketRepo::list_filtered(&state.pool, params.priority, params.status, limit, offset)
            .await?;

    Ok(Json(DataResponse { data: tickets }))
}

// ---------------------------------------------------------------------------
// GET /tickets/requester/{user_id}
// ---------------------------------------------------------------------------

/// Tickets filed by one user. Users may list their own; staff anyone's.
pub async fn list_requester_tickets(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    if !auth.can_access(&user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only view your own tickets".into(),
        )));
    }

    let tickets = TicketRepo::list_by_creator(&state.pool, &user_id).await?;
    Ok(Json(DataResponse { data: tickets }))
}

// ---------------------------------------------------------------------------
// GET /tickets/{id}
// ---------------------------------------------------------------------------

pub async fn get_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let ticket = find_ticket(&state, id).await?;

    if !auth.can_access(&ticket.created_by) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only view your own tickets".into(),
        )));
    }

    Ok(Json(DataResponse { data: ticket }))
}

// ---------------------------------------------------------------------------
// PUT /tickets/{id}/assign
// ---------------------------------------------------------------------------

/// Assign a ticket to a user, or unassign it with `null`.
pub async fn assign_ticket(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AssignTicket>,
) -> AppResult<impl IntoResponse> {
    if let Some(assignee) = input.assignee_id.as_deref() {
        if !UserRepo::exists(&state.pool, assignee).await? {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "User",
                id: assignee.to_string(),
            }));
        }
    }

    let ticket = TicketRepo::assign(&state.pool, id, input.assignee_id.as_deref())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Ticket",
                id: id.to_string(),
            })
        })?;

    tracing::info!(
        ticket_id = id,
        assignee_id = ?ticket.assigned_to,
        by = %staff.user_id,
        "Ticket assignment changed",
    );

    Ok(Json(DataResponse { data: ticket }))
}

// ---------------------------------------------------------------------------
// PUT /tickets/{id}/status
// ---------------------------------------------------------------------------

pub async fn update_ticket_status(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTicketStatus>,
) -> AppResult<impl IntoResponse> {
    let current = find_ticket(&state, id).await?;
    validate_transition(current.status, input.status)?;

    let ticket = TicketRepo::update_status(&state.pool, id, input.status)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Ticket",
                id: id.to_string(),
            })
        })?;

    tracing::info!(
        ticket_id = id,
        from = %current.status,
        to = %ticket.status,
        by = %staff.user_id,
        "Ticket status updated",
    );

    Ok(Json(DataResponse { data: ticket }))
}

// ---------------------------------------------------------------------------
// DELETE /tickets/{id}
// ---------------------------------------------------------------------------

pub async fn delete_ticket(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !TicketRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id: id.to_string(),
        }));
    }

    tracing::info!(ticket_id = id, by = %admin.user_id, "Ticket deleted");
    Ok(StatusCode::NO_CONTENT)
}
