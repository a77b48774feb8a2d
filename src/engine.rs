//! Seam to the LLM execution engine.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::types::options::QueryRequest;

/// Receiver of raw engine events for one delegated session.
///
/// The engine emits newline-delimited-JSON-shaped objects with a top-level
/// `type` field; the stream ends at the terminal `result` event or on error.
pub type EventReceiver = mpsc::Receiver<Result<Value>>;

/// Executes one bounded agent session against the underlying LLM service.
///
/// Implementations are external collaborators (hosted APIs, local
/// runtimes). The delegation engine invokes `query` at most once per
/// delegation.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    async fn query(&self, request: QueryRequest) -> Result<EventReceiver>;
}
