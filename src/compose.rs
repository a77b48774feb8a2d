//! Rendering of the user-visible task message for a delegated agent.

use crate::directory::TeamDirectory;
use crate::types::delegation::DelegationInput;

/// Substituted for `{{context}}` when the caller supplied no context.
pub const NO_CONTEXT_FALLBACK: &str = "No additional context provided.";

/// Render the task message for a delegation. Deterministic, no side effects.
///
/// A `DelegationRule` template configured for the (head agent, target agent)
/// pair wins when present; otherwise the two-section fallback applies.
pub fn compose_task_message(
    input: &DelegationInput,
    directory: &TeamDirectory,
    head_agent_slug: &str,
) -> String {
    if let Some(rule) = directory.delegation_rule(head_agent_slug, &input.agent_slug) {
        if let Some(template) = &rule.context_template {
            let context = input.context.as_deref().unwrap_or(NO_CONTEXT_FALLBACK);
            return template
                .replace("{{task}}", &input.task)
                .replace("{{context}}", context);
        }
    }
    compose_fallback(&input.task, input.context.as_deref())
}

/// Plain context-plus-task rendering. The channel path posts this shape
/// verbatim, never the template form.
pub fn compose_fallback(task: &str, context: Option<&str>) -> String {
    match context {
        Some(context) => format!("## Context from conversation:\n{context}\n\n## Task:\n{task}"),
        None => task.to_string(),
    }
}
