use serde::{Deserialize, Serialize};

/// One delegation request. Constructed by the head agent's tool call,
/// consumed once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegationInput {
    pub agent_slug: String,
    pub task: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Token usage reported back to the dispatcher.
///
/// Serialized camelCase: the dispatcher hands the figures back as part of a
/// JSON tool result.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Outcome of one delegation attempt.
///
/// Produced exactly once per input and never partially filled: either a
/// successful response with usage, or a failure with an error string and an
/// empty response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DelegationResult {
    pub success: bool,
    pub agent_name: String,
    pub agent_slug: String,
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl DelegationResult {
    pub fn succeeded(
        agent_name: impl Into<String>,
        agent_slug: impl Into<String>,
        response: impl Into<String>,
        usage: Option<TokenUsage>,
    ) -> Self {
        Self {
            success: true,
            agent_name: agent_name.into(),
            agent_slug: agent_slug.into(),
            response: response.into(),
            error: None,
            usage,
        }
    }

    pub fn failed(
        agent_name: impl Into<String>,
        agent_slug: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            agent_name: agent_name.into(),
            agent_slug: agent_slug.into(),
            response: String::new(),
            error: Some(error.into()),
            usage: None,
        }
    }
}

/// Outcome shape of the channel-mediated path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelResult {
    pub success: bool,
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChannelResult {
    pub fn succeeded(response: impl Into<String>) -> Self {
        Self {
            success: true,
            response: response.into(),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            response: String::new(),
            error: Some(error.into()),
        }
    }
}

impl From<DelegationResult> for ChannelResult {
    fn from(result: DelegationResult) -> Self {
        Self {
            success: result.success,
            response: result.response,
            error: result.error,
        }
    }
}
