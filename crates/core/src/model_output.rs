//! Structured-output parsing for text-generation responses.
//!
//! Model output is untrusted: it may be wrapped in a fenced code block, may
//! not be JSON at all, or may be JSON of the wrong shape. The functions here
//! turn raw text into [`PolishOutcome`] / [`PriorityOutcome`] or a
//! [`ModelOutputError`] that says which of two things went wrong:
//!
//! - [`ModelOutputError::Malformed`] -- the text is not a JSON object of the
//!   expected shape (the model broke the format).
//! - [`ModelOutputError::InvalidPriority`] -- the JSON is well-formed but the
//!   `priority` value is outside `low | medium | high` (the model broke the
//!   constraint).
//!
//! A missing or `null` `skills` key yields an empty list; a bad `priority`
//! is always rejected.

use serde::Deserialize;

use crate::ticket::Priority;

/// Opening and closing marker of a fenced code block.
const FENCE: &str = "```";

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Parsed result of the polish call. `polished_description` is never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolishOutcome {
    pub polished_description: String,
    pub skills: Vec<String>,
}

/// Parsed result of the priority call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityOutcome {
    pub priority: Priority,
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelOutputError {
    /// Not JSON, not an object, or missing/mistyped required keys.
    #[error("Malformed model output: {0}")]
    Malformed(String),

    /// Well-formed JSON whose `priority` is not one of `low`, `medium`, `high`.
    #[error("Invalid priority value from model: {0:?}")]
    InvalidPriority(String),
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PolishPayload {
    description: String,
    #[serde(default)]
    skills: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Remove a surrounding fenced code block, if present, and trim whitespace.
///
/// Accepts a leading fence with or without a language hint (```` ```json ````)
/// and a trailing fence. Text without fences is only trimmed.
pub fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix(FENCE) {
        text = match rest.split_once('\n') {
            Some((first_line, remainder)) if is_language_hint(first_line) => remainder,
            Some(_) => rest,
            None => rest.trim_start_matches(is_hint_char),
        };
    }

    if let Some(rest) = text.trim_end().strip_suffix(FENCE) {
        text = rest;
    }

    text.trim()
}

fn is_hint_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn is_language_hint(line: &str) -> bool {
    line.trim().chars().all(is_hint_char)
}

/// Strip fences and strictly parse the remainder as a JSON object.
pub fn parse_json_block(raw: &str) -> Result<serde_json::Value, ModelOutputError> {
    let text = strip_code_fence(raw);
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| ModelOutputError::Malformed(format!("invalid JSON: {e}")))?;

    if !value.is_object() {
        return Err(ModelOutputError::Malformed(
            "expected a JSON object".to_string(),
        ));
    }
    Ok(value)
}

/// Parse the polish call's output into a [`PolishOutcome`].
pub fn parse_polish_outcome(raw: &str) -> Result<PolishOutcome, ModelOutputError> {
    let value = parse_json_block(raw)?;
    let payload: PolishPayload = serde_json::from_value(value)
        .map_err(|e| ModelOutputError::Malformed(format!("unexpected polish shape: {e}")))?;

    let polished_description = payload.description.trim().to_string();
    if polished_description.is_empty() {
        return Err(ModelOutputError::Malformed(
            "polished description is empty".to_string(),
        ));
    }

    Ok(PolishOutcome {
        polished_description,
        skills: payload.skills.unwrap_or_default(),
    })
}

/// Parse the priority call's output into a [`PriorityOutcome`].
///
/// A non-object reply or a missing `priority` key is
/// [`ModelOutputError::Malformed`]. Any present value other than the exact
/// strings `low`, `medium` or `high` (including numbers and `null`) is
/// [`ModelOutputError::InvalidPriority`].
pub fn parse_priority_outcome(raw: &str) -> Result<PriorityOutcome, ModelOutputError> {
    let value = parse_json_block(raw)?;
    let Some(field) = value.get("priority") else {
        return Err(ModelOutputError::Malformed("missing priority key".to_string()));
    };

    let priority = match field {
        serde_json::Value::String(text) => text
            .parse::<Priority>()
            .map_err(|_| ModelOutputError::InvalidPriority(text.clone()))?,
        other => return Err(ModelOutputError::InvalidPriority(other.to_string())),
    };

    Ok(PriorityOutcome { priority })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
