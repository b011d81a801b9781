//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod ticket_repo;
pub mod user_repo;

pub use ticket_repo::TicketRepo;
pub use user_repo::UserRepo;
