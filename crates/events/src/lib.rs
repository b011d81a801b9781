//! Helpdesk event bus and outbound notifications.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`] -- the domain event envelope.
//! - [`delivery`] -- outbound channels (SMTP email).
//! - [`WelcomeMailer`] -- background service that greets new users.

pub mod bus;
pub mod delivery;
pub mod welcome;

pub use bus::{EventBus, PlatformEvent, EVENT_TICKET_CREATED, EVENT_USER_SIGNUP};
pub use delivery::email::{EmailConfig, EmailDelivery, EmailError};
pub use delivery::Mailer;
pub use welcome::WelcomeMailer;
