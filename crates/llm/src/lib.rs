//! Text-generation client adapter.
//!
//! The intake pipeline only ever sees [`TextGenerator`]: a prompt goes in,
//! raw model text comes out. [`GeminiClient`] talks to the Gemini REST API;
//! [`ScriptedGenerator`] replays canned responses for tests.

pub mod client;
pub mod config;
pub mod gemini;
pub mod stub;

pub use client::{GenerationError, GenerationRequest, TextGenerator};
pub use config::GenerationConfig;
pub use gemini::GeminiClient;
pub use stub::ScriptedGenerator;
