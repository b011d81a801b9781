//! Ticket-intake pipeline.
//!
//! Turns a [`TicketDraft`](helpdesk_core::ticket::TicketDraft) into a stored
//! [`Ticket`](helpdesk_db::models::ticket::Ticket) by validating it, asking
//! the model to polish the description and classify priority, and persisting
//! the assembled record. See [`IntakePipeline`].

pub mod error;
pub mod intake;
pub mod store;

pub use error::{IntakeError, IntakeFailure, IntakeStage};
pub use intake::{assemble_ticket, validate_draft, IntakeOptions, IntakePipeline};
pub use store::{TicketSink, UserDirectory};
