use serde::{Deserialize, Serialize};

/// Scope attached to a tool grant at invocation time.
///
/// Tools are workspace- and user-scoped when the delegation runs, not when
/// the agent is defined.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolScope {
    pub workspace_id: String,
    pub user_id: String,
}

/// One capability handed to the delegated session: a tool identifier and the
/// scope it is authorized for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolGrant {
    pub tool: String,
    pub scope: ToolScope,
}

/// Hard caps for a delegated sub-session.
///
/// Sub-sessions run with materially lower caps than a top-level
/// conversation: a delegation is a bounded sub-call, not a full dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorLimits {
    pub max_turns: u32,
    pub max_thinking_tokens: u32,
}

impl Default for ExecutorLimits {
    fn default() -> Self {
        Self {
            max_turns: 10,
            max_thinking_tokens: 4096,
        }
    }
}

/// One bounded request handed to the execution engine.
#[derive(Clone)]
pub struct QueryRequest {
    /// Concrete model identifier (already resolved from a symbolic tier).
    pub model: String,
    pub system_prompt: String,
    /// The initial user-visible task message.
    pub message: String,
    pub max_turns: u32,
    pub max_thinking_tokens: u32,
    /// Tools the engine must refuse regardless of grants.
    pub disallowed_tools: Vec<String>,
    /// Scoped capabilities for the session; empty means no tool access.
    pub grants: Vec<ToolGrant>,
}

impl std::fmt::Debug for QueryRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryRequest")
            .field("model", &self.model)
            .field(
                "system_prompt",
                &truncated(&self.system_prompt),
            )
            .field("message", &truncated(&self.message))
            .field("max_turns", &self.max_turns)
            .field("max_thinking_tokens", &self.max_thinking_tokens)
            .field("disallowed_tools", &self.disallowed_tools)
            .field("grants_count", &self.grants.len())
            .finish()
    }
}

fn truncated(text: &str) -> String {
    if text.len() > 50 {
        let mut end = 50;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &text[..end])
    } else {
        text.to_string()
    }
}
