//! Welcome email service.
//!
//! [`WelcomeMailer`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! and sends a greeting to every newly registered user. It runs as a
//! long-lived background task and exits when the bus sender is dropped.

use std::sync::Arc;
use std::time::Duration;

use helpdesk_db::repositories::UserRepo;
use helpdesk_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::{PlatformEvent, EVENT_USER_SIGNUP};
use crate::delivery::Mailer;

pub const WELCOME_SUBJECT: &str = "Welcome to the app";
pub const WELCOME_BODY: &str = "Hi,\n\nThanks for signing up. We're glad to have you onboard!";

/// Retries after the first failed send.
const MAX_RETRIES: u32 = 2;

const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(5);

/// Outcome of handling one signup event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WelcomeOutcome {
    Sent { attempts: u32 },
    Failed { attempts: u32 },
    /// Unknown user, no email on file, or no mailer configured.
    Skipped,
}

pub struct WelcomeMailer {
    pool: DbPool,
    mailer: Option<Arc<dyn Mailer>>,
    retry_backoff: Duration,
}

impl WelcomeMailer {
    pub fn new(pool: DbPool, mailer: Option<Arc<dyn Mailer>>) -> Self {
        Self {
            pool,
            mailer,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Run the mailer loop until the bus is closed.
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        if self.mailer.is_none() {
            tracing::info!("SMTP not configured, welcome emails disabled");
        }

        loop {
            match receiver.recv().await {
                Ok(event) if event.event_type == EVENT_USER_SIGNUP => {
                    self.handle_signup(&event).await;
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Welcome mailer lagged, some signups were missed");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, welcome mailer shutting down");
                    break;
                }
            }
        }
    }

    /// Look up the new user and send the welcome email, retrying on failure.
    pub async fn handle_signup(&self, event: &PlatformEvent) -> WelcomeOutcome {
        let Some(mailer) = &self.mailer else {
            return WelcomeOutcome::Skipped;
        };
        let Some(user_id) = event.source_entity_id.as_deref() else {
            tracing::warn!("Signup event without a user id");
            return WelcomeOutcome::Skipped;
        };

        let user = match UserRepo::find_by_id(&self.pool, user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::warn!(user_id, "Signup event for unknown user");
                return WelcomeOutcome::Skipped;
            }
            Err(e) => {
                tracing::error!(user_id, error = %e, "Failed to load user for welcome email");
                return WelcomeOutcome::Failed { attempts: 0 };
            }
        };
        if user.email.trim().is_empty() {
            return WelcomeOutcome::Skipped;
        }

        let mut attempts = 0;
        loop {
            attempts += 1;
            match mailer.send(&user.email, WELCOME_SUBJECT, WELCOME_BODY).await {
                Ok(()) => {
                    tracing::info!(user_id, attempts, "Welcome email sent");
                    return WelcomeOutcome::Sent { attempts };
                }
                Err(e) if attempts <= MAX_RETRIES => {
                    tracing::warn!(user_id, attempts, error = %e, "Welcome email failed, retrying");
                    tokio::time::sleep(self.retry_backoff).await;
                }
                Err(e) => {
                    tracing::error!(user_id, attempts, error = %e, "Welcome email failed");
                    return WelcomeOutcome::Failed { attempts };
                }
            }
        }
    }
}
