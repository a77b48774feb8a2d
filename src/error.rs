/// All errors that can occur inside the delegation engine.
///
/// Nothing here escapes to the dispatcher: the executors convert every error
/// into a failure-shaped result value at their boundary. The `Display` text
/// of the boundary variants is exactly what lands in that result's `error`
/// field.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Agent \"{slug}\" not found or is disabled")]
    AgentNotFound { slug: String },

    #[error("Head agent profile not found")]
    ProfileNotFound { slug: String },

    #[error("Specialist response timeout")]
    ResponseTimeout,

    #[error("engine error: {0}")]
    Engine(String),

    #[error("failed to parse engine event: {reason}")]
    EventParse { reason: String },

    #[error("broker error: {0}")]
    Broker(String),

    #[error("response subscription dropped")]
    SubscriptionClosed,

    #[error("JSON decode error: {0}")]
    JsonDecode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
