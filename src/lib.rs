pub mod broker;
pub mod channel;
pub mod compose;
pub mod directory;
pub mod engine;
pub mod error;
pub(crate) mod event_parser;
pub mod executor;
pub mod model;
pub mod prompt;
pub mod types;

// Re-export key types at crate root for ergonomic use.
pub use error::{Error, Result};
pub use types::{
    AgentConfig, AgentEvent, ChannelResult, DelegationInput, DelegationResult, DelegationRule,
    ExecutorLimits, KnowledgeEntry, QueryRequest, Rule, RuleKind, SessionContext, Skill,
    TeamConfig, TokenUsage, ToolGrant, ToolScope,
};

// Re-export the primary APIs.
pub use channel::ChannelExecutor;
pub use directory::TeamDirectory;
pub use executor::{InlineExecutor, DELEGATION_TOOL, ORCHESTRATION_TOOL};
pub use model::resolve_model;

// Re-export the substrate seams.
pub use broker::{ChannelBroker, MemoryBroker, MessageStatus};
pub use engine::{EventReceiver, QueryEngine};

// Re-export composition helpers used by dispatchers that render previews.
pub use compose::{compose_fallback, compose_task_message};
pub use prompt::assemble_system_prompt;
