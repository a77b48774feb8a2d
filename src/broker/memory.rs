//! In-process broker, usable as the substrate in tests and single-node
//! deployments. Out-of-process responders are modelled by calling
//! [`MemoryBroker::respond`] from another task.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{oneshot, Mutex};

use super::{
    ChannelBroker, ChannelHandle, ChannelResponse, DeliveryReceipt, MessagePost, MessageStatus,
    ProfileHandle, ResponseWaiter,
};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
struct ChannelRecord {
    id: String,
    name: String,
    workspace_id: String,
    agent_slug: String,
}

#[derive(Debug, Clone)]
struct ProfileRecord {
    id: String,
    workspace_id: String,
    agent_slug: String,
}

/// Stored record for one posted request.
#[derive(Debug, Clone)]
pub struct StoredMessage {
    pub channel_id: String,
    pub sender_id: String,
    pub body: String,
    pub status: MessageStatus,
}

/// Outcome of [`MemoryBroker::respond`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The subscriber received the response.
    Delivered,
    /// The subscriber was gone, usually because the requester already
    /// declared timeout. The response is dropped and the stored status is
    /// left untouched.
    Late,
}

#[derive(Default)]
pub struct MemoryBroker {
    channels: Mutex<Vec<ChannelRecord>>,
    profiles: Mutex<Vec<ProfileRecord>>,
    messages: Mutex<HashMap<String, StoredMessage>>,
    pending: Mutex<HashMap<String, oneshot::Sender<ChannelResponse>>>,
}

impl MemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel for an agent within a workspace.
    pub async fn register_channel(
        &self,
        workspace_id: &str,
        agent_slug: &str,
        name: &str,
    ) -> ChannelHandle {
        let record = ChannelRecord {
            id: format!("chan:{workspace_id}:{agent_slug}"),
            name: name.to_string(),
            workspace_id: workspace_id.to_string(),
            agent_slug: agent_slug.to_string(),
        };
        let handle = ChannelHandle {
            id: record.id.clone(),
            name: record.name.clone(),
        };
        self.channels.lock().await.push(record);
        handle
    }

    /// Register a channel identity for an agent within a workspace.
    pub async fn register_profile(&self, workspace_id: &str, agent_slug: &str) -> ProfileHandle {
        let record = ProfileRecord {
            id: format!("profile:{workspace_id}:{agent_slug}"),
            workspace_id: workspace_id.to_string(),
            agent_slug: agent_slug.to_string(),
        };
        let handle = ProfileHandle {
            id: record.id.clone(),
            agent_slug: record.agent_slug.clone(),
        };
        self.profiles.lock().await.push(record);
        handle
    }

    /// Responder entry point: deliver the response for a posted request.
    ///
    /// A response arriving after the requester gave up is dropped, the
    /// stored status stays as the timeout handler left it, and the caller
    /// learns about it through [`Delivery::Late`].
    pub async fn respond(&self, request_id: &str, content: &str) -> Delivery {
        let sender = self.pending.lock().await.remove(request_id);
        let Some(sender) = sender else {
            tracing::warn!(request_id, "response for unknown or expired request dropped");
            return Delivery::Late;
        };

        let response = ChannelResponse {
            content: content.to_string(),
        };
        if sender.send(response).is_err() {
            tracing::warn!(request_id, "late response dropped, requester already gone");
            return Delivery::Late;
        }

        if let Some(message) = self.messages.lock().await.get_mut(request_id) {
            message.status = MessageStatus::Delivered;
        }
        Delivery::Delivered
    }

    /// Stored message for a request id, for responders and inspection.
    pub async fn message(&self, request_id: &str) -> Option<StoredMessage> {
        self.messages.lock().await.get(request_id).cloned()
    }

    /// Request ids of every stored message, regardless of status.
    pub async fn message_ids(&self) -> Vec<String> {
        self.messages.lock().await.keys().cloned().collect()
    }

    /// Request ids of messages still awaiting a response.
    pub async fn pending_requests(&self) -> Vec<String> {
        self.messages
            .lock()
            .await
            .iter()
            .filter(|(_, message)| message.status == MessageStatus::Pending)
            .map(|(request_id, _)| request_id.clone())
            .collect()
    }
}

#[async_trait]
impl ChannelBroker for MemoryBroker {
    async fn agent_channel(
        &self,
        workspace_id: &str,
        agent_slug: &str,
    ) -> Result<Option<ChannelHandle>> {
        let channels = self.channels.lock().await;
        Ok(channels
            .iter()
            .find(|record| record.workspace_id == workspace_id && record.agent_slug == agent_slug)
            .map(|record| ChannelHandle {
                id: record.id.clone(),
                name: record.name.clone(),
            }))
    }

    async fn agent_profile(
        &self,
        workspace_id: &str,
        agent_slug: &str,
    ) -> Result<Option<ProfileHandle>> {
        let profiles = self.profiles.lock().await;
        Ok(profiles
            .iter()
            .find(|record| record.workspace_id == workspace_id && record.agent_slug == agent_slug)
            .map(|record| ProfileHandle {
                id: record.id.clone(),
                agent_slug: record.agent_slug.clone(),
            }))
    }

    async fn subscribe_response(
        &self,
        _channel_id: &str,
        request_id: &str,
    ) -> Result<ResponseWaiter> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(request_id.to_string(), tx);
        Ok(ResponseWaiter::new(rx))
    }

    async fn post(&self, post: MessagePost) -> Result<DeliveryReceipt> {
        let known = self
            .channels
            .lock()
            .await
            .iter()
            .any(|record| record.id == post.channel_id);
        if !known {
            return Err(Error::Broker(format!(
                "unknown channel {}",
                post.channel_id
            )));
        }

        let message_id = format!("msg:{}", post.request_id);
        self.messages.lock().await.insert(
            post.request_id,
            StoredMessage {
                channel_id: post.channel_id,
                sender_id: post.sender_id,
                body: post.body,
                status: MessageStatus::Pending,
            },
        );
        Ok(DeliveryReceipt { message_id })
    }

    async fn update_status(&self, request_id: &str, status: MessageStatus) -> Result<()> {
        match self.messages.lock().await.get_mut(request_id) {
            Some(message) => {
                message.status = status;
                Ok(())
            }
            None => Err(Error::Broker(format!("unknown request {request_id}"))),
        }
    }
}
