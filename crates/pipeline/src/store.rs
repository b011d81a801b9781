//! Storage seams used by the intake pipeline.
//!
//! The pipeline needs exactly two things from storage: "does this user
//! exist?" and "insert this ticket". Both are traits so tests can run the
//! pipeline against an in-memory store; [`sqlx::PgPool`] implements both.

use async_trait::async_trait;
use helpdesk_db::models::ticket::{CreateTicket, Ticket};
use helpdesk_db::repositories::{TicketRepo, UserRepo};
use sqlx::PgPool;

/// Read-only user existence check.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn user_exists(&self, user_id: &str) -> Result<bool, sqlx::Error>;
}

/// Atomic insert of one fully assembled ticket.
#[async_trait]
pub trait TicketSink: Send + Sync {
    async fn insert_ticket(&self, ticket: &CreateTicket) -> Result<Ticket, sqlx::Error>;
}

#[async_trait]
impl UserDirectory for PgPool {
    async fn user_exists(&self, user_id: &str) -> Result<bool, sqlx::Error> {
        UserRepo::exists(self, user_id).await
    }
}

#[async_trait]
impl TicketSink for PgPool {
    async fn insert_ticket(&self, ticket: &CreateTicket) -> Result<Ticket, sqlx::Error> {
        TicketRepo::create(self, ticket).await
    }
}
