//! Inline delegation: a bounded, non-recursive single-turn agent invocation
//! run within the caller's process, with its streamed output aggregated
//! into one result.

use std::sync::Arc;

use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;

use crate::compose::compose_task_message;
use crate::directory::TeamDirectory;
use crate::engine::{EventReceiver, QueryEngine};
use crate::error::{Error, Result};
use crate::event_parser::parse_event;
use crate::model::resolve_model;
use crate::prompt::assemble_system_prompt;
use crate::types::agents::AgentConfig;
use crate::types::delegation::{DelegationInput, DelegationResult, TokenUsage};
use crate::types::events::AgentEvent;
use crate::types::options::{ExecutorLimits, QueryRequest, ToolGrant, ToolScope};
use crate::types::session::SessionContext;

/// Tool that triggers delegation. Never available to a delegated session.
pub const DELEGATION_TOOL: &str = "delegate_to_agent";

/// Top-level task-orchestration tool, likewise excluded from sub-sessions.
pub const ORCHESTRATION_TOOL: &str = "orchestrate_team_tasks";

/// Tools a delegated session must never see, regardless of the target
/// agent's own tool list. Keeping the delegation trigger here is what
/// prevents unbounded delegation chains.
fn disallowed_tools() -> Vec<String> {
    vec![DELEGATION_TOOL.to_string(), ORCHESTRATION_TOOL.to_string()]
}

/// Runs delegations by invoking the execution engine in-process.
///
/// `execute` never returns an error: every failure is converted into a
/// failure-shaped [`DelegationResult`] at this boundary. The delegated
/// sub-session's transcript is not persisted anywhere.
pub struct InlineExecutor {
    directory: Arc<TeamDirectory>,
    engine: Arc<dyn QueryEngine>,
    limits: ExecutorLimits,
}

impl InlineExecutor {
    pub fn new(directory: Arc<TeamDirectory>, engine: Arc<dyn QueryEngine>) -> Self {
        Self {
            directory,
            engine,
            limits: ExecutorLimits::default(),
        }
    }

    /// Override the sub-session caps. Injected once by the caller, never
    /// read from the process environment.
    pub fn with_limits(mut self, limits: ExecutorLimits) -> Self {
        self.limits = limits;
        self
    }

    pub async fn execute(&self, input: &DelegationInput, ctx: &SessionContext) -> DelegationResult {
        let agent = match self.directory.find_agent(&input.agent_slug) {
            Some(agent) => agent,
            None => {
                // No engine call is made for an unresolvable slug.
                let error = Error::AgentNotFound {
                    slug: input.agent_slug.clone(),
                };
                return DelegationResult::failed("", &input.agent_slug, error.to_string());
            }
        };

        tracing::debug!(
            agent = %agent.slug,
            conversation = %ctx.conversation_id,
            "starting inline delegation"
        );

        match self.run(agent, input, ctx).await {
            Ok((response, usage)) => {
                DelegationResult::succeeded(&agent.name, &agent.slug, response, usage)
            }
            Err(e) => {
                tracing::debug!(agent = %agent.slug, error = %e, "inline delegation failed");
                DelegationResult::failed(&agent.name, &agent.slug, e.to_string())
            }
        }
    }

    async fn run(
        &self,
        agent: &AgentConfig,
        input: &DelegationInput,
        ctx: &SessionContext,
    ) -> Result<(String, Option<TokenUsage>)> {
        let system_prompt =
            assemble_system_prompt(agent, self.directory.team_knowledge(), &ctx.workspace_id);
        let message = compose_task_message(input, &self.directory, &ctx.head_agent_slug);

        let request = QueryRequest {
            model: resolve_model(&agent.model),
            system_prompt,
            message,
            max_turns: self.limits.max_turns,
            max_thinking_tokens: self.limits.max_thinking_tokens,
            disallowed_tools: disallowed_tools(),
            grants: scoped_grants(agent, ctx),
        };

        let rx = self.engine.query(request).await?;
        drain_stream(rx).await
    }
}

/// Workspace- and user-scoped capabilities for the agent's allow-listed
/// tools. Scoping happens at invocation time, not at agent-definition time.
/// Delegation-capable tools are filtered out even if the agent lists them.
fn scoped_grants(agent: &AgentConfig, ctx: &SessionContext) -> Vec<ToolGrant> {
    let scope = ToolScope {
        workspace_id: ctx.workspace_id.clone(),
        user_id: ctx.user_id.clone(),
    };
    agent
        .tools
        .iter()
        .filter(|tool| tool.as_str() != DELEGATION_TOOL && tool.as_str() != ORCHESTRATION_TOOL)
        .map(|tool| ToolGrant {
            tool: tool.clone(),
            scope: scope.clone(),
        })
        .collect()
}

/// Drain the event stream into the final response text and usage.
async fn drain_stream(rx: EventReceiver) -> Result<(String, Option<TokenUsage>)> {
    let mut stream = ReceiverStream::new(rx);
    let mut response = String::new();
    let mut tally = UsageTally::default();

    while let Some(event) = stream.next().await {
        match parse_event(event?)? {
            AgentEvent::Assistant(assistant) => {
                response.push_str(&assistant.text);
                tally.record_interim(assistant.usage);
            }
            AgentEvent::Result(result) => {
                tally.record_terminal(result.usage);
                if result.is_error {
                    let reason = result
                        .error
                        .unwrap_or_else(|| "delegated session failed".into());
                    return Err(Error::Engine(reason));
                }
                return Ok((response, tally.into_usage()));
            }
            AgentEvent::System { .. } | AgentEvent::Unknown { .. } => {}
        }
    }

    Err(Error::Engine("stream ended without a terminal result".into()))
}

/// Usage policy: the terminal result figure is authoritative and overwrites;
/// interim assistant usage is summed only as a fallback for engines whose
/// terminal event carries no usage.
#[derive(Default)]
struct UsageTally {
    interim: Option<TokenUsage>,
    terminal: Option<TokenUsage>,
}

impl UsageTally {
    fn record_interim(&mut self, usage: Option<TokenUsage>) {
        if let Some(usage) = usage {
            let total = self.interim.get_or_insert(TokenUsage::default());
            total.input_tokens += usage.input_tokens;
            total.output_tokens += usage.output_tokens;
        }
    }

    fn record_terminal(&mut self, usage: Option<TokenUsage>) {
        if usage.is_some() {
            self.terminal = usage;
        }
    }

    fn into_usage(self) -> Option<TokenUsage> {
        self.terminal.or(self.interim)
    }
}
