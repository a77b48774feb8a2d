use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::delegation::TokenUsage;
use crate::types::events::{AgentEvent, AssistantEvent, ResultEvent};

/// Parse a raw JSON value from the engine stream into a typed event.
///
/// Each `type` has a different structure:
/// - `"assistant"`: nested `"message"` object with content blocks and usage
/// - `"result"`: top-level fields (no message wrapper), terminal
/// - `"system"`: has a `"subtype"` field
/// - Others: preserved as Unknown
pub fn parse_event(raw: Value) -> Result<AgentEvent> {
    let event_type = raw
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::EventParse {
            reason: "missing 'type' field".into(),
        })?;

    match event_type {
        "assistant" => Ok(parse_assistant(&raw)),
        "result" => Ok(parse_result(&raw)),
        "system" => Ok(parse_system(raw)),
        other => Ok(AgentEvent::Unknown {
            event_type: other.to_string(),
            raw,
        }),
    }
}

fn parse_assistant(raw: &Value) -> AgentEvent {
    // The assistant body is in the "message" field.
    let message = raw.get("message").unwrap_or(raw);

    let mut text = String::new();
    if let Some(blocks) = message.get("content").and_then(|c| c.as_array()) {
        for block in blocks {
            if block.get("type").and_then(|t| t.as_str()) == Some("text") {
                if let Some(fragment) = block.get("text").and_then(|t| t.as_str()) {
                    text.push_str(fragment);
                }
            }
        }
    }

    AgentEvent::Assistant(AssistantEvent {
        text,
        usage: parse_usage(message),
    })
}

fn parse_result(raw: &Value) -> AgentEvent {
    AgentEvent::Result(ResultEvent {
        is_error: raw
            .get("is_error")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        error: raw
            .get("error")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        usage: parse_usage(raw),
        num_turns: raw
            .get("num_turns")
            .and_then(|v| v.as_u64())
            .map(|n| n as u32),
    })
}

fn parse_system(raw: Value) -> AgentEvent {
    let subtype = raw
        .get("subtype")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string();

    AgentEvent::System { subtype, data: raw }
}

fn parse_usage(value: &Value) -> Option<TokenUsage> {
    let usage = value.get("usage")?;
    Some(TokenUsage {
        input_tokens: usage
            .get("input_tokens")
            .and_then(|v| v.as_u64())
            .unwrap_or(0),
        output_tokens: usage
            .get("output_tokens")
            .and_then(|v| v.as_u64())
            .unwrap_or(0),
    })
}
