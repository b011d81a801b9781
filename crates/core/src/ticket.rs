//! Ticket priority and status enumerations, status transitions, and the
//! user-submitted draft that feeds the intake pipeline.
//!
//! String forms must match the `CHECK` constraints in
//! `20260301000002_create_tickets_table.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Date, UserId};

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

pub const PRIORITY_LOW: &str = "low";
pub const PRIORITY_MEDIUM: &str = "medium";
pub const PRIORITY_HIGH: &str = "high";

/// Urgency assigned to a ticket by the priority classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => PRIORITY_LOW,
            Priority::Medium => PRIORITY_MEDIUM,
            Priority::High => PRIORITY_HIGH,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match. `"High"` and `" high"` are rejected.
impl FromStr for Priority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PRIORITY_LOW => Ok(Priority::Low),
            PRIORITY_MEDIUM => Ok(Priority::Medium),
            PRIORITY_HIGH => Ok(Priority::High),
            other => Err(CoreError::Validation(format!(
                "Invalid priority '{other}'. Must be one of: low, medium, high"
            ))),
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_TODO: &str = "to-do";
pub const STATUS_IN_PROGRESS: &str = "in-progress";
pub const STATUS_DONE: &str = "done";

/// Triage state of a ticket. Every new ticket starts as [`TicketStatus::ToDo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TicketStatus {
    #[default]
    #[serde(rename = "to-do")]
    ToDo,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 3] = [
        TicketStatus::ToDo,
        TicketStatus::InProgress,
        TicketStatus::Done,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::ToDo => STATUS_TODO,
            TicketStatus::InProgress => STATUS_IN_PROGRESS,
            TicketStatus::Done => STATUS_DONE,
        }
    }

    /// Statuses this one may move to.
    ///
    /// - `to-do`       -> `in-progress`, `done`
    /// - `in-progress` -> `done`, `to-do`
    /// - `done`        -> `to-do` (re-open)
    pub fn valid_transitions(self) -> &'static [TicketStatus] {
        match self {
            TicketStatus::ToDo => &[TicketStatus::InProgress, TicketStatus::Done],
            TicketStatus::InProgress => &[TicketStatus::Done, TicketStatus::ToDo],
            TicketStatus::Done => &[TicketStatus::ToDo],
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_TODO => Ok(TicketStatus::ToDo),
            STATUS_IN_PROGRESS => Ok(TicketStatus::InProgress),
            STATUS_DONE => Ok(TicketStatus::Done),
            other => Err(CoreError::Validation(format!(
                "Invalid ticket status '{other}'. Must be one of: to-do, in-progress, done"
            ))),
        }
    }
}

impl TryFrom<String> for TicketStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Validate that a status transition from `current` to `next` is allowed.
pub fn validate_transition(current: TicketStatus, next: TicketStatus) -> Result<(), CoreError> {
    let allowed = current.valid_transitions();
    if allowed.contains(&next) {
        Ok(())
    } else {
        let names: Vec<&str> = allowed.iter().map(|s| s.as_str()).collect();
        Err(CoreError::Validation(format!(
            "Cannot transition ticket from '{current}' to '{next}'. Allowed transitions: {names:?}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

/// User-submitted, unvalidated ticket input.
///
/// Absent text fields deserialize as empty so that [`missing_field`]
/// reports them by name instead of failing at the JSON layer.
///
/// [`missing_field`]: TicketDraft::missing_field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TicketDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub deadline: Option<Date>,
    #[serde(default)]
    pub requester_id: UserId,
}

impl TicketDraft {
    /// Name of the first required field that is blank, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.title.trim().is_empty() {
            Some("title")
        } else if self.description.trim().is_empty() {
            Some("description")
        } else if self.requester_id.trim().is_empty() {
            Some("requester_id")
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
