//! System-prompt assembly for delegated agents.
//!
//! The assembled prompt concatenates, in fixed order: the agent's base
//! prompt, its rules, combined agent- and team-level knowledge, skill
//! descriptions, and the delegation trailer. Pure string construction:
//! identical inputs produce byte-identical output.

use crate::types::agents::{AgentConfig, KnowledgeEntry, Rule};

pub fn assemble_system_prompt(
    agent: &AgentConfig,
    team_knowledge: &[KnowledgeEntry],
    workspace_id: &str,
) -> String {
    let mut prompt = String::new();
    prompt.push_str(&agent.system_prompt);

    if !agent.rules.is_empty() {
        prompt.push_str("\n\n## Rules\n");
        for rule in rules_by_priority(&agent.rules) {
            prompt.push_str(&format!("[{}] {}\n", rule.kind.tag(), rule.content));
        }
    }

    if !agent.mind.is_empty() || !team_knowledge.is_empty() {
        prompt.push_str("\n\n## Knowledge\n");
        for entry in agent.mind.iter().chain(team_knowledge.iter()) {
            prompt.push_str(&format!(
                "### {}: {}\n{}\n",
                entry.category, entry.name, entry.content
            ));
        }
    }

    if !agent.skills.is_empty() {
        prompt.push_str("\n\n## Skills\n");
        for skill in &agent.skills {
            prompt.push_str(&format!("### {}\n{}\n", skill.name, skill.content));
        }
    }

    prompt.push_str(&delegation_trailer(workspace_id));
    prompt
}

/// Rules sorted by descending priority, stable for equal priorities.
fn rules_by_priority(rules: &[Rule]) -> Vec<&Rule> {
    let mut ordered: Vec<&Rule> = rules.iter().collect();
    ordered.sort_by_key(|rule| std::cmp::Reverse(rule.priority));
    ordered
}

/// Fixed trailer telling the agent it is answering a delegated task.
///
/// The tool-input requirement is load-bearing: tools are workspace-scoped
/// and cannot infer the workspace on their own.
fn delegation_trailer(workspace_id: &str) -> String {
    format!(
        "\n\n## Delegated task\n\
        You are completing a single delegated task for workspace \"{workspace_id}\". \
        Reply with the task outcome only; the requesting agent relays it onward.\n\
        Every tool invocation MUST include \"workspace_id\": \"{workspace_id}\" in its input.\n"
    )
}
