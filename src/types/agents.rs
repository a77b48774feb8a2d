use serde::{Deserialize, Serialize};

/// A directive injected into an agent's system prompt to constrain its
/// behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rule {
    #[serde(rename = "type")]
    pub kind: RuleKind,
    pub content: String,
    /// Higher priority rules are rendered first.
    #[serde(default)]
    pub priority: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Always,
    Never,
    When,
}

impl RuleKind {
    /// Tag rendered in front of the rule's content.
    pub fn tag(&self) -> &'static str {
        match self {
            RuleKind::Always => "ALWAYS",
            RuleKind::Never => "NEVER",
            RuleKind::When => "WHEN",
        }
    }
}

/// A knowledge snippet attached to an agent or shared across the team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeEntry {
    pub category: String,
    pub name: String,
    pub content: String,
}

/// A reusable skill description surfaced in the agent's prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Skill {
    pub name: String,
    pub content: String,
}

/// Configuration of a single agent within a workspace team.
///
/// Owned by the team configuration; read-only from the delegation engine's
/// perspective and immutable for the duration of one delegation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub system_prompt: String,

    /// Symbolic tier ("sonnet", "opus", "haiku") or an already-qualified
    /// model identifier.
    pub model: String,

    /// Ordered allow-list of tool names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Rule>,

    /// Knowledge snippets private to this agent.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mind: Vec<KnowledgeEntry>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<Skill>,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Per-pair template override for the delegated task message.
///
/// Looked up by (head agent, target agent); only used to select a
/// message-rendering template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegationRule {
    pub source_agent_slug: String,
    pub target_agent_slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_template: Option<String>,
}

/// Snapshot of a workspace team's agent configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamConfig {
    #[serde(default)]
    pub agents: Vec<AgentConfig>,

    /// Team-level knowledge shared by every agent.
    #[serde(default)]
    pub knowledge: Vec<KnowledgeEntry>,

    #[serde(default)]
    pub delegation_rules: Vec<DelegationRule>,
}
