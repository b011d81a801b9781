//! Intake orchestration.
//!
//! One [`IntakePipeline::run`] call walks the stages
//! `Validating → PolishRequested → PolishParsed → PriorityRequested →
//! PriorityParsed → Persisting → Done` strictly in order. The first failure
//! ends the run with an [`IntakeFailure`] naming the stage; nothing is
//! retried and nothing is written unless every earlier stage succeeded.

use std::time::Duration;

use helpdesk_core::model_output::{
    parse_polish_outcome, parse_priority_outcome, PolishOutcome, PriorityOutcome,
};
use helpdesk_core::prompt::{build_polish_prompt, build_priority_prompt};
use helpdesk_core::ticket::{TicketDraft, TicketStatus};
use helpdesk_core::types::Timestamp;
use helpdesk_db::models::ticket::{CreateTicket, Ticket};
use helpdesk_llm::TextGenerator;

use crate::error::{IntakeError, IntakeFailure, IntakeStage};
use crate::store::{TicketSink, UserDirectory};

/// Default upper bound on one model call.
const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Tunables for an intake run.
#[derive(Debug, Clone, Copy)]
pub struct IntakeOptions {
    /// Each model call that takes longer fails with `GenerationUnavailable`.
    pub generation_timeout: Duration,
}

impl Default for IntakeOptions {
    fn default() -> Self {
        Self {
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }
}

/// The intake pipeline with its collaborators injected.
///
/// `generator` is `None` when the generation service is not configured; the
/// run then fails validation before any other work.
pub struct IntakePipeline<'a> {
    generator: Option<&'a dyn TextGenerator>,
    users: &'a dyn UserDirectory,
    tickets: &'a dyn TicketSink,
    options: IntakeOptions,
}

impl<'a> IntakePipeline<'a> {
    pub fn new(
        generator: Option<&'a dyn TextGenerator>,
        users: &'a dyn UserDirectory,
        tickets: &'a dyn TicketSink,
    ) -> Self {
        Self {
            generator,
            users,
            tickets,
            options: IntakeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: IntakeOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the whole intake for one draft.
    pub async fn run(&self, draft: &TicketDraft) -> Result<Ticket, IntakeFailure> {
        let mut stage = IntakeStage::Validating;

        match self.drive(draft, &mut stage).await {
            Ok(ticket) => {
                tracing::info!(
                    ticket_id = ticket.id,
                    requester_id = %ticket.created_by,
                    priority = %ticket.priority,
                    skills = ticket.related_skills.len(),
                    "Ticket intake complete",
                );
                Ok(ticket)
            }
            Err(error) => {
                let failure = IntakeFailure { stage, error };
                failure.log();
                Err(failure)
            }
        }
    }

    async fn drive(
        &self,
        draft: &TicketDraft,
        stage: &mut IntakeStage,
    ) -> Result<Ticket, IntakeError> {
        validate_draft(draft, self.generator.is_some(), self.users).await?;
        let generator = self.generator.ok_or(IntakeError::ConfigurationMissing)?;

        enter(stage, IntakeStage::PolishRequested);
        let prompt = build_polish_prompt(&draft.title, &draft.description);
        let raw = self.call_model(generator, &prompt).await?;

        enter(stage, IntakeStage::PolishParsed);
        tracing::debug!(raw = %raw, "Polish response text");
        let polish = parse_polish_outcome(&raw)?;

        enter(stage, IntakeStage::PriorityRequested);
        let prompt = build_priority_prompt(&draft.title, &polish.polished_description);
        let raw = self.call_model(generator, &prompt).await?;

        enter(stage, IntakeStage::PriorityParsed);
        tracing::debug!(raw = %raw, "Priority response text");
        let priority = parse_priority_outcome(&raw)?;

        enter(stage, IntakeStage::Persisting);
        let record = assemble_ticket(draft, polish, priority, chrono::Utc::now());
        let ticket = self
            .tickets
            .insert_ticket(&record)
            .await
            .map_err(IntakeError::PersistenceError)?;

        enter(stage, IntakeStage::Done);
        Ok(ticket)
    }

    /// One bounded model call. Transport errors and timeouts are both
    /// `GenerationUnavailable`.
    async fn call_model(
        &self,
        generator: &dyn TextGenerator,
        prompt: &str,
    ) -> Result<String, IntakeError> {
        let timeout = self.options.generation_timeout;
        match tokio::time::timeout(timeout, generator.generate(prompt)).await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(IntakeError::GenerationUnavailable(e.to_string())),
            Err(_) => Err(IntakeError::GenerationUnavailable(format!(
                "no response within {}ms",
                timeout.as_millis()
            ))),
        }
    }
}

fn enter(stage: &mut IntakeStage, next: IntakeStage) {
    tracing::debug!(from = %stage, to = %next, "Intake stage transition");
    *stage = next;
}

/// Check that intake can start: the generation service is configured, the
/// required fields are present, and the requester exists.
///
/// Performs one read-only user lookup and nothing else.
pub async fn validate_draft(
    draft: &TicketDraft,
    generation_configured: bool,
    users: &dyn UserDirectory,
) -> Result<(), IntakeError> {
    if !generation_configured {
        return Err(IntakeError::ConfigurationMissing);
    }

    if let Some(field) = draft.missing_field() {
        return Err(IntakeError::MissingField(field));
    }

    let exists = users
        .user_exists(&draft.requester_id)
        .await
        .map_err(IntakeError::PersistenceError)?;
    if !exists {
        return Err(IntakeError::RequesterNotFound(draft.requester_id.clone()));
    }

    Ok(())
}

/// Merge the draft and both model outcomes into an insertable record.
///
/// New tickets are always `to-do` and unassigned.
pub fn assemble_ticket(
    draft: &TicketDraft,
    polish: PolishOutcome,
    priority: PriorityOutcome,
    created_at: Timestamp,
) -> CreateTicket {
    CreateTicket {
        title: draft.title.clone(),
        description: polish.polished_description,
        priority: priority.priority,
        status: TicketStatus::default(),
        created_by: draft.requester_id.clone(),
        assigned_to: None,
        deadline: draft.deadline,
        related_skills: polish.skills,
        created_at,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
