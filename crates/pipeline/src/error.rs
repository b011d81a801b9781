//! Intake stages and failure taxonomy.

use std::fmt;

use helpdesk_core::model_output::ModelOutputError;
use helpdesk_core::types::UserId;

/// Stages of one intake run, in the only order they can occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeStage {
    Validating,
    PolishRequested,
    PolishParsed,
    PriorityRequested,
    PriorityParsed,
    Persisting,
    Done,
}

impl IntakeStage {
    pub fn as_str(self) -> &'static str {
        match self {
            IntakeStage::Validating => "validating",
            IntakeStage::PolishRequested => "polish_requested",
            IntakeStage::PolishParsed => "polish_parsed",
            IntakeStage::PriorityRequested => "priority_requested",
            IntakeStage::PriorityParsed => "priority_parsed",
            IntakeStage::Persisting => "persisting",
            IntakeStage::Done => "done",
        }
    }
}

impl fmt::Display for IntakeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an intake run stopped.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    /// No API credential for the text-generation service.
    #[error("Text generation service is not configured")]
    ConfigurationMissing,

    /// A required draft field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The draft's requester is not a known user.
    #[error("Requester {0} not found")]
    RequesterNotFound(UserId),

    /// The model call failed or timed out.
    #[error("Text generation service unavailable: {0}")]
    GenerationUnavailable(String),

    /// The model's text could not be parsed into the expected shape.
    #[error("Malformed model output: {0}")]
    MalformedModelOutput(String),

    /// The model answered with a priority outside `low | medium | high`.
    #[error("Invalid priority determined by model: {0:?}")]
    InvalidPriorityValue(String),

    /// The user or ticket store failed.
    #[error("Persistence error: {0}")]
    PersistenceError(#[source] sqlx::Error),
}

impl From<ModelOutputError> for IntakeError {
    fn from(err: ModelOutputError) -> Self {
        match err {
            ModelOutputError::Malformed(reason) => IntakeError::MalformedModelOutput(reason),
            ModelOutputError::InvalidPriority(value) => IntakeError::InvalidPriorityValue(value),
        }
    }
}

/// A failed intake run: the stage the pipeline was trying to reach and the
/// error that stopped it.
#[derive(Debug, thiserror::Error)]
#[error("Ticket intake failed at {stage}: {error}")]
pub struct IntakeFailure {
    pub stage: IntakeStage,
    #[source]
    pub error: IntakeError,
}

impl IntakeFailure {
    /// Caller-side problems (bad draft, unknown requester, model ignored the
    /// priority constraint) log at `warn`; service faults log at `error`.
    pub(crate) fn log(&self) {
        match &self.error {
            IntakeError::MissingField(_)
            | IntakeError::RequesterNotFound(_)
            | IntakeError::InvalidPriorityValue(_) => {
                tracing::warn!(stage = %self.stage, error = %self.error, "Ticket intake rejected");
            }
            IntakeError::ConfigurationMissing
            | IntakeError::GenerationUnavailable(_)
            | IntakeError::MalformedModelOutput(_)
            | IntakeError::PersistenceError(_) => {
                tracing::error!(stage = %self.stage, error = %self.error, "Ticket intake failed");
            }
        }
    }
}
