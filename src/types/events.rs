use serde_json::Value;

use super::delegation::TokenUsage;

/// A typed event from the execution engine's stream.
///
/// The engine emits newline-delimited JSON objects with a top-level `type`
/// field; each variant corresponds to one of these event types.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum AgentEvent {
    /// Interim assistant output: a text fragment plus any usage reported
    /// alongside it.
    Assistant(AssistantEvent),

    /// Terminal event closing the stream for this delegation.
    Result(ResultEvent),

    /// Engine lifecycle notice (init acknowledgment and similar).
    System { subtype: String, data: Value },

    /// An unknown event type we don't recognize but preserve.
    Unknown { event_type: String, raw: Value },
}

#[derive(Debug, Clone)]
pub struct AssistantEvent {
    /// Concatenated text blocks of this fragment; may be empty when the
    /// fragment carried only tool activity.
    pub text: String,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone)]
pub struct ResultEvent {
    pub is_error: bool,
    pub error: Option<String>,
    /// Authoritative usage figure for the whole sub-session, when reported.
    pub usage: Option<TokenUsage>,
    pub num_turns: Option<u32>,
}

impl AgentEvent {
    /// Returns true if this event ends the stream.
    pub fn is_result(&self) -> bool {
        matches!(self, AgentEvent::Result(_))
    }
}
