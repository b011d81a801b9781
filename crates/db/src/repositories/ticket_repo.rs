//! Repository for the `tickets` table.

use helpdesk_core::ticket::{Priority, TicketStatus};
use helpdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::ticket::{CreateTicket, Ticket};

/// Column list for `tickets` queries.
const COLUMNS: &str = "\
    id, title, description, priority, status, created_by, assigned_to, \
    deadline, related_skills, created_at, updated_at";

/// Provides CRUD operations for tickets.
pub struct TicketRepo;

impl TicketRepo {
    /// Insert a fully assembled ticket in a single statement, returning the
    /// stored row with its generated id.
    pub async fn create(pool: &PgPool, input: &CreateTicket) -> Result<Ticket, sqlx::Error> {
        let query = format!(
            "INSERT INTO tickets \
                (title, description, priority, status, created_by, assigned_to, \
                 deadline, related_skills, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.priority.as_str())
            .bind(input.status.as_str())
            .bind(&input.created_by)
            .bind(&input.assigned_to)
            .bind(input.deadline)
            .bind(&input.related_skills)
            .bind(input.created_at)
            .fetch_one(pool)
            .await
    }

    /// Find a ticket by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE id = $1");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List tickets with optional priority and status filters, newest first.
    pub async fn list_filtered(
        pool: &PgPool,
        priority: Option<Priority>,
        status: Option<TicketStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Ticket>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if priority.is_some() {
            conditions.push(format!("priority = ${param_idx}"));
            param_idx += 1;
        }
        if status.is_some() {
            conditions.push(format!("status = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM tickets {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut q = sqlx::query_as::<_, Ticket>(&query);

        if let Some(p) = priority {
            q = q.bind(p.as_str());
        }
        if let Some(s) = status {
            q = q.bind(s.as_str());
        }
        q = q.bind(limit).bind(offset);

        q.fetch_all(pool).await
    }

    /// All tickets filed by a given user, newest first.
    pub async fn list_by_creator(pool: &PgPool, user_id: &str) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets WHERE created_by = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Set or clear the assignee. Returns the updated row if found.
    pub async fn assign(
        pool: &PgPool,
        id: DbId,
        assignee_id: Option<&str>,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("UPDATE tickets SET assigned_to = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(assignee_id)
            .fetch_optional(pool)
            .await
    }

    /// Update the status of a ticket. Returns the updated row if found.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: TicketStatus,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("UPDATE tickets SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a ticket. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
