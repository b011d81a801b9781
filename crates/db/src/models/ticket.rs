//! Ticket entity model and DTOs.

use helpdesk_core::ticket::{Priority, TicketStatus};
use helpdesk_core::types::{Date, DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tickets` table.
///
/// `priority` and `status` are decoded into closed enums; a row holding any
/// other value fails to load instead of leaking a free-form string.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Ticket {
    pub id: DbId,
    pub title: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    #[sqlx(try_from = "String")]
    pub status: TicketStatus,
    pub created_by: UserId,
    pub assigned_to: Option<UserId>,
    pub deadline: Option<Date>,
    pub related_skills: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fully assembled ticket ready for insertion.
///
/// Built only by the intake pipeline; every column except `id` and
/// `updated_at` is supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTicket {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TicketStatus,
    pub created_by: UserId,
    pub assigned_to: Option<UserId>,
    pub deadline: Option<Date>,
    pub related_skills: Vec<String>,
    pub created_at: Timestamp,
}

/// DTO for assigning (or unassigning, with `null`) a ticket.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignTicket {
    pub assignee_id: Option<UserId>,
}

/// DTO for moving a ticket to a new status.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTicketStatus {
    pub status: TicketStatus,
}

/// Query parameters for listing tickets.
#[derive(Debug, Default, Deserialize)]
pub struct TicketListParams {
    pub priority: Option<Priority>,
    pub status: Option<TicketStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
