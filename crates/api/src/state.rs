use std::sync::Arc;

use helpdesk_events::EventBus;
use helpdesk_llm::TextGenerator;
use helpdesk_pipeline::IntakeOptions;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub pool: helpdesk_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Text-generation client; `None` when `GEMINI_API_KEY` is not set.
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub intake_options: IntakeOptions,
    pub event_bus: Arc<EventBus>,
}
