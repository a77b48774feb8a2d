//! Channel-mediated delegation: post a correlated request onto the target
//! agent's channel and await the out-of-process responder, falling back to
//! inline execution when the agent has no channel.
//!
//! Per attempt: channel lookup, sender-profile lookup, subscribe, post,
//! await with a hard deadline. Every missing prerequisite fails closed:
//! a missing channel degrades to the inline path, a missing profile is a
//! terminal failure with nothing posted.

use std::sync::Arc;
use std::time::Duration;

use crate::broker::{ChannelBroker, MessagePost, MessageStatus};
use crate::compose::compose_fallback;
use crate::error::Error;
use crate::executor::InlineExecutor;
use crate::types::delegation::{ChannelResult, DelegationInput};
use crate::types::session::SessionContext;

const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(60);

/// Runs delegations over a persisted channel, correlated by request id.
///
/// The responder is a separate, externally-triggered process; the only
/// contract with it is: post a uniquely-identified request, then wait for a
/// correlated reply or declare timeout. A late reply after the deadline is
/// the broker's to drop.
pub struct ChannelExecutor {
    broker: Arc<dyn ChannelBroker>,
    inline: InlineExecutor,
    response_timeout: Duration,
}

impl ChannelExecutor {
    pub fn new(broker: Arc<dyn ChannelBroker>, inline: InlineExecutor) -> Self {
        Self {
            broker,
            inline,
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
        }
    }

    /// Override the response deadline. Injected once by the caller, never
    /// read from the process environment.
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Run one delegation attempt. Never returns an error value; every
    /// outcome is a [`ChannelResult`].
    pub async fn execute(&self, input: &DelegationInput, ctx: &SessionContext) -> ChannelResult {
        let channel = match self
            .broker
            .agent_channel(&ctx.workspace_id, &input.agent_slug)
            .await
        {
            Ok(Some(channel)) => channel,
            Ok(None) => {
                tracing::debug!(
                    agent = %input.agent_slug,
                    "no channel for agent, falling back to inline delegation"
                );
                return self.inline.execute(input, ctx).await.into();
            }
            Err(e) => return ChannelResult::failed(e.to_string()),
        };

        let profile = match self
            .broker
            .agent_profile(&ctx.workspace_id, &ctx.head_agent_slug)
            .await
        {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                let error = Error::ProfileNotFound {
                    slug: ctx.head_agent_slug.clone(),
                };
                return ChannelResult::failed(error.to_string());
            }
            Err(e) => return ChannelResult::failed(e.to_string()),
        };

        let request_id = generate_request_id();
        let body = compose_fallback(&input.task, input.context.as_deref());

        // Subscribe before posting so a fast responder cannot win a race
        // against the subscription.
        let waiter = match self
            .broker
            .subscribe_response(&channel.id, &request_id)
            .await
        {
            Ok(waiter) => waiter,
            Err(e) => return ChannelResult::failed(e.to_string()),
        };

        let post = MessagePost {
            channel_id: channel.id.clone(),
            sender_id: profile.id.clone(),
            body,
            request_id: request_id.clone(),
        };
        if let Err(e) = self.broker.post(post).await {
            return ChannelResult::failed(e.to_string());
        }

        tracing::debug!(
            agent = %input.agent_slug,
            channel = %channel.id,
            request_id = %request_id,
            "posted delegation request"
        );

        match tokio::time::timeout(self.response_timeout, waiter.wait()).await {
            Ok(Ok(response)) => ChannelResult::succeeded(response.content),
            Ok(Err(e)) => ChannelResult::failed(e.to_string()),
            Err(_) => {
                // Compensating write; its own failure is logged, not
                // surfaced further up.
                if let Err(e) = self
                    .broker
                    .update_status(&request_id, MessageStatus::Timeout)
                    .await
                {
                    tracing::warn!(
                        request_id = %request_id,
                        "failed to mark timed-out request: {e}"
                    );
                }
                ChannelResult::failed(Error::ResponseTimeout.to_string())
            }
        }
    }
}

/// Fresh unique token correlating a posted request with its response.
/// Correctness of the channel path rests on its uniqueness.
fn generate_request_id() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    let suffix: u64 = rng.random();
    format!("req_{suffix:016x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    use crate::broker::{
        ChannelHandle, DeliveryReceipt, MemoryBroker, ProfileHandle, ResponseWaiter,
    };
    use crate::directory::TeamDirectory;
    use crate::engine::testing::MockEngine;
    use crate::error::Result;
    use crate::types::agents::{AgentConfig, TeamConfig};

    fn fixture_directory() -> Arc<TeamDirectory> {
        Arc::new(TeamDirectory::new(TeamConfig {
            agents: vec![AgentConfig {
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
            }],
            knowledge: vec![],
            delegation_rules: vec![],
        }))
    }

    fn ctx() -> SessionContext {
        SessionContext {
            workspace_id: "ws_1".into(),
            user_id: "user_1".into(),
            conversation_id: "conv_1".into(),
            head_agent_slug: "lead".into(),
        }
    }

    fn input(context: Option<&str>) -> DelegationInput {
        DelegationInput {
            agent_slug: "copywriter".into(),
            task: "Write launch copy".into(),
            context: context.map(str::to_string),
        }
    }

    fn inline_executor(engine: Arc<MockEngine>) -> InlineExecutor {
        InlineExecutor::new(fixture_directory(), engine)
    }

    /// Broker decorator that counts status updates.
    struct RecordingBroker {
        inner: Arc<MemoryBroker>,
        status_updates: StdMutex<Vec<(String, MessageStatus)>>,
    }

    impl RecordingBroker {
        fn new(inner: Arc<MemoryBroker>) -> Self {
            Self {
                inner,
                status_updates: StdMutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChannelBroker for RecordingBroker {
        async fn agent_channel(
            &self,
            workspace_id: &str,
            agent_slug: &str,
        ) -> Result<Option<ChannelHandle>> {
            self.inner.agent_channel(workspace_id, agent_slug).await
        }

        async fn agent_profile(
            &self,
            workspace_id: &str,
            agent_slug: &str,
        ) -> Result<Option<ProfileHandle>> {
            self.inner.agent_profile(workspace_id, agent_slug).await
        }

        async fn subscribe_response(
            &self,
            channel_id: &str,
            request_id: &str,
        ) -> Result<ResponseWaiter> {
            self.inner.subscribe_response(channel_id, request_id).await
        }

        async fn post(&self, post: MessagePost) -> Result<DeliveryReceipt> {
            self.inner.post(post).await
        }

        async fn update_status(&self, request_id: &str, status: MessageStatus) -> Result<()> {
            self.status_updates
                .lock()
                .unwrap()
                .push((request_id.to_string(), status));
            self.inner.update_status(request_id, status).await
        }
    }

    #[tokio::test]
    async fn missing_channel_falls_back_to_inline() {
        let broker = Arc::new(MemoryBroker::new());
        let engine = Arc::new(MockEngine::text_session("Here is your answer.", 50, 20));
        let executor = ChannelExecutor::new(broker, inline_executor(engine.clone()));

        let result = executor.execute(&input(None), &ctx()).await;

        // Indistinguishable in shape from a direct inline result.
        let reference_engine = Arc::new(MockEngine::text_session("Here is your answer.", 50, 20));
        let inline_result = inline_executor(reference_engine)
            .execute(&input(None), &ctx())
            .await;
        assert_eq!(result, ChannelResult::from(inline_result));
        assert!(result.success);
        assert_eq!(result.response, "Here is your answer.");
        assert_eq!(engine.call_count(), 1);
    }

    #[tokio::test]
    async fn missing_profile_fails_without_posting() {
        let broker = Arc::new(MemoryBroker::new());
        broker.register_channel("ws_1", "copywriter", "copy-desk").await;
        let engine = Arc::new(MockEngine::text_session("unused", 1, 1));
        let executor = ChannelExecutor::new(broker.clone(), inline_executor(engine.clone()));

        let result = executor.execute(&input(None), &ctx()).await;

        assert_eq!(
            result,
            ChannelResult::failed("Head agent profile not found")
        );
        assert!(broker.pending_requests().await.is_empty());
        assert_eq!(engine.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn response_before_deadline_succeeds() {
        let broker = Arc::new(MemoryBroker::new());
        broker.register_channel("ws_1", "copywriter", "copy-desk").await;
        broker.register_profile("ws_1", "lead").await;
        let engine = Arc::new(MockEngine::text_session("unused", 1, 1));
        let executor = ChannelExecutor::new(broker.clone(), inline_executor(engine.clone()));

        // Simulated out-of-process responder: picks up the posted request
        // and answers it.
        let responder_broker = broker.clone();
        let responder = tokio::spawn(async move {
            loop {
                if let Some(request_id) = responder_broker.pending_requests().await.pop() {
                    responder_broker.respond(&request_id, "Posted answer.").await;
                    break;
                }
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        });

        let result = executor.execute(&input(Some("Launch email")), &ctx()).await;
        responder.await.unwrap();

        assert_eq!(result, ChannelResult::succeeded("Posted answer."));
        assert_eq!(engine.call_count(), 0);

        let request_id = broker
            .pending_requests()
            .await
            .first()
            .cloned();
        assert!(request_id.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn posted_body_uses_fallback_composition() {
        let broker = Arc::new(MemoryBroker::new());
        broker.register_channel("ws_1", "copywriter", "copy-desk").await;
        broker.register_profile("ws_1", "lead").await;
        let engine = Arc::new(MockEngine::text_session("unused", 1, 1));
        let executor = ChannelExecutor::new(broker.clone(), inline_executor(engine))
            .with_response_timeout(Duration::from_millis(50));

        executor.execute(&input(Some("Launch email")), &ctx()).await;

        let request_id = broker.message_ids().await.pop().unwrap();
        let message = broker.message(&request_id).await.unwrap();
        assert_eq!(
            message.body,
            "## Context from conversation:\nLaunch email\n\n## Task:\nWrite launch copy"
        );
        assert_eq!(message.sender_id, "profile:ws_1:lead");
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_marks_message_and_fails_with_fixed_error() {
        let memory = Arc::new(MemoryBroker::new());
        memory.register_channel("ws_1", "copywriter", "copy-desk").await;
        memory.register_profile("ws_1", "lead").await;
        let broker = Arc::new(RecordingBroker::new(memory.clone()));
        let engine = Arc::new(MockEngine::text_session("unused", 1, 1));
        let executor = ChannelExecutor::new(broker.clone(), inline_executor(engine));

        let result = executor.execute(&input(None), &ctx()).await;

        assert_eq!(result, ChannelResult::failed("Specialist response timeout"));

        let updates = broker.status_updates.lock().unwrap().clone();
        assert_eq!(updates.len(), 1);
        let (request_id, status) = &updates[0];
        assert_eq!(*status, MessageStatus::Timeout);
        assert_eq!(
            memory.message(request_id).await.unwrap().status,
            MessageStatus::Timeout
        );
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_after_timeout_is_dropped() {
        let broker = Arc::new(MemoryBroker::new());
        broker.register_channel("ws_1", "copywriter", "copy-desk").await;
        broker.register_profile("ws_1", "lead").await;
        let engine = Arc::new(MockEngine::text_session("unused", 1, 1));
        let executor = ChannelExecutor::new(broker.clone(), inline_executor(engine));

        let result = executor.execute(&input(None), &ctx()).await;
        assert!(!result.success);

        // The responder shows up after the requester already returned.
        let request_id = broker
            .message_ids()
            .await
            .pop()
            .unwrap();
        assert_eq!(
            broker.respond(&request_id, "too late").await,
            crate::broker::Delivery::Late
        );
        assert_eq!(
            broker.message(&request_id).await.unwrap().status,
            MessageStatus::Timeout
        );
    }

    #[tokio::test]
    async fn request_ids_are_fresh_per_attempt() {
        let first = generate_request_id();
        let second = generate_request_id();
        assert!(first.starts_with("req_"));
        assert_ne!(first, second);
    }
}
