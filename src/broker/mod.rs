//! Substrate for channel-mediated delegation.
//!
//! A channel is a named, persisted communication stream used as an
//! observable transport for inter-agent requests. The broker is the only
//! shared mutable state in the engine; per request identifier it is written
//! by at most two parties, the poster and the responder, correlated by that
//! identifier.

pub mod memory;

pub use memory::{Delivery, MemoryBroker, StoredMessage};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::error::{Error, Result};

/// A named communication channel bound to one agent within a workspace.
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    pub id: String,
    pub name: String,
}

/// Channel identity ("profile") of an agent within a workspace.
#[derive(Debug, Clone)]
pub struct ProfileHandle {
    pub id: String,
    pub agent_slug: String,
}

/// One correlated request posted to a channel.
#[derive(Debug, Clone)]
pub struct MessagePost {
    pub channel_id: String,
    pub sender_id: String,
    pub body: String,
    pub request_id: String,
}

/// Handle returned by a successful publish.
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    pub message_id: String,
}

/// A response correlated to a posted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelResponse {
    pub content: String,
}

/// Lifecycle of a posted channel message. Records are mutated by the
/// responder or the timeout handler, never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Pending,
    Delivered,
    Timeout,
}

/// Pending subscription for a correlated response.
///
/// Obtained before the request is posted so a fast responder cannot race
/// the subscriber.
pub struct ResponseWaiter {
    rx: oneshot::Receiver<ChannelResponse>,
}

impl ResponseWaiter {
    pub fn new(rx: oneshot::Receiver<ChannelResponse>) -> Self {
        Self { rx }
    }

    /// Resolve to the correlated response, or an error if the broker drops
    /// the subscription.
    pub async fn wait(self) -> Result<ChannelResponse> {
        self.rx.await.map_err(|_| Error::SubscriptionClosed)
    }
}

/// Message substrate used by the channel executor.
#[async_trait]
pub trait ChannelBroker: Send + Sync {
    /// Channel bound to the given agent within the workspace, if any.
    async fn agent_channel(
        &self,
        workspace_id: &str,
        agent_slug: &str,
    ) -> Result<Option<ChannelHandle>>;

    /// Channel identity of the given agent within the workspace, if any.
    async fn agent_profile(
        &self,
        workspace_id: &str,
        agent_slug: &str,
    ) -> Result<Option<ProfileHandle>>;

    /// Register interest in the response correlated to `request_id`.
    async fn subscribe_response(&self, channel_id: &str, request_id: &str)
        -> Result<ResponseWaiter>;

    /// Publish a request. Returns a delivery handle; the eventual responder
    /// sends no acknowledgment at this point.
    async fn post(&self, post: MessagePost) -> Result<DeliveryReceipt>;

    /// Update the stored status of a posted request.
    async fn update_status(&self, request_id: &str, status: MessageStatus) -> Result<()>;
}
