//! Lookup of enabled agents within a team configuration snapshot.

use crate::types::agents::{AgentConfig, DelegationRule, KnowledgeEntry, TeamConfig};

/// Read-only view over a workspace team's agent roster.
///
/// The snapshot is immutable for the duration of one delegation; lookups
/// have no side effects. A slug that matches no enabled agent simply
/// resolves to `None` so callers can produce a structured failure instead
/// of an exception.
#[derive(Debug, Clone)]
pub struct TeamDirectory {
    team: TeamConfig,
}

impl TeamDirectory {
    pub fn new(team: TeamConfig) -> Self {
        Self { team }
    }

    /// Find an enabled agent by slug. Disabled agents are invisible.
    pub fn find_agent(&self, slug: &str) -> Option<&AgentConfig> {
        self.team
            .agents
            .iter()
            .find(|agent| agent.enabled && agent.slug == slug)
    }

    pub fn has_agent(&self, slug: &str) -> bool {
        self.find_agent(slug).is_some()
    }

    /// Slugs of all enabled agents.
    pub fn agent_slugs(&self) -> Vec<&str> {
        self.team
            .agents
            .iter()
            .filter(|agent| agent.enabled)
            .map(|agent| agent.slug.as_str())
            .collect()
    }

    /// Template-selection rule for a (head agent, target agent) pair.
    pub fn delegation_rule(&self, source_slug: &str, target_slug: &str) -> Option<&DelegationRule> {
        self.team.delegation_rules.iter().find(|rule| {
            rule.source_agent_slug == source_slug && rule.target_agent_slug == target_slug
        })
    }

    /// Team-level knowledge shared by every agent.
    pub fn team_knowledge(&self) -> &[KnowledgeEntry] {
        &self.team.knowledge
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_team() -> TeamConfig {
        TeamConfig {
            agents: vec![
                AgentConfig {
                    id: "a1".into(),
                    slug: "copywriter".into(),
                    name: "Copywriter".into(),
                    system_prompt: "You write copy.".into(),
                    model: "sonnet".into(),
                    tools: vec![],
                    rules: vec![],
                    mind: vec![],
                    skills: vec![],
                    enabled: true,
                },
                AgentConfig {
                    id: "a2".into(),
                    slug: "analyst".into(),
                    name: "Analyst".into(),
                    system_prompt: "You analyze.".into(),
                    model: "opus".into(),
                    tools: vec![],
                    rules: vec![],
                    mind: vec![],
                    skills: vec![],
                    enabled: false,
                },
            ],
            knowledge: vec![],
            delegation_rules: vec![DelegationRule {
                source_agent_slug: "lead".into(),
                target_agent_slug: "copywriter".into(),
                context_template: Some("Task: {{task}}".into()),
            }],
        }
    }

    #[test]
    fn finds_enabled_agent() {
        let directory = TeamDirectory::new(fixture_team());
        let agent = directory.find_agent("copywriter").unwrap();
        assert_eq!(agent.name, "Copywriter");
        assert!(directory.has_agent("copywriter"));
    }

    #[test]
    fn disabled_agent_is_invisible() {
        let directory = TeamDirectory::new(fixture_team());
        assert!(directory.find_agent("analyst").is_none());
        assert!(!directory.has_agent("analyst"));
    }

    #[test]
    fn absent_slug_resolves_to_none() {
        let directory = TeamDirectory::new(fixture_team());
        assert!(directory.find_agent("ghost").is_none());
    }

    #[test]
    fn agent_slugs_skip_disabled() {
        let directory = TeamDirectory::new(fixture_team());
        assert_eq!(directory.agent_slugs(), vec!["copywriter"]);
    }

    #[test]
    fn delegation_rule_matches_exact_pair() {
        let directory = TeamDirectory::new(fixture_team());
        assert!(directory.delegation_rule("lead", "copywriter").is_some());
        assert!(directory.delegation_rule("lead", "analyst").is_none());
        assert!(directory.delegation_rule("copywriter", "lead").is_none());
    }
}
