pub mod agents;
pub mod delegation;
pub mod events;
pub mod options;
pub mod session;

// Re-exports for convenience.
pub use agents::{AgentConfig, DelegationRule, KnowledgeEntry, Rule, RuleKind, Skill, TeamConfig};
pub use delegation::{ChannelResult, DelegationInput, DelegationResult, TokenUsage};
pub use events::{AgentEvent, AssistantEvent, ResultEvent};
pub use options::{ExecutorLimits, QueryRequest, ToolGrant, ToolScope};
pub use session::SessionContext;
