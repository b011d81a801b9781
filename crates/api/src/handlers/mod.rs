pub mod admin;
pub mod tickets;
pub mod users;
