//! Helpdesk domain core.
//!
//! Pure domain logic shared by every other crate: identifier and timestamp
//! aliases, closed enumerations for ticket priority, ticket status and user
//! role, draft validation, the two model prompt templates, and the parser
//! that turns untrusted model output into typed outcomes. Nothing in here
//! performs I/O.

pub mod error;
pub mod model_output;
pub mod prompt;
pub mod roles;
pub mod search;
pub mod ticket;
pub mod types;
