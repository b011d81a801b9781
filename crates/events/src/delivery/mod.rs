//! Outbound delivery channels.

use async_trait::async_trait;

pub mod email;

use email::EmailError;

/// Something that can deliver a plain-text message to one address.
///
/// [`email::EmailDelivery`] is the SMTP implementation; tests substitute a
/// recording mailer.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError>;
}
