//! Prompt templates for the two model calls made during ticket intake.
//!
//! Both builders are pure string construction: the same inputs always yield
//! the same prompt, which keeps stubbed generator tests deterministic.

/// Prompt asking the model to rewrite a ticket description and list the
/// skills needed to resolve it.
///
/// The model is told to answer with a JSON object of the form
/// `{"description": "...", "skills": ["...", ...]}`.
pub fn build_polish_prompt(title: &str, description: &str) -> String {
    format!(
        "Polish this support ticket description to make it clear, concise, and professional, \
and make it more explainable. Mention the tech stack needed as well.\n\
Title: {title}\n\
Description: {description}\n\
\n\
Return the result as a valid JSON object with the following format:\n\
{{\n  \"description\": \"The polished description here\",\n  \"skills\": [\"skill1\", \"skill2\", \"etc.\"]\n}}"
    )
}

/// Prompt asking the model to classify a ticket's urgency.
///
/// The model is told to answer with `{"priority": "low" | "medium" | "high"}`.
pub fn build_priority_prompt(title: &str, polished_description: &str) -> String {
    format!(
        "Determine the priority of this support ticket as low, medium, or high based on its \
title and description.\n\
Title: {title}\n\
Description: {polished_description}\n\
\n\
Return the result as a valid JSON object with the following format:\n\
{{\n  \"priority\": \"low\" or \"medium\" or \"high\"\n}}"
    )
}
