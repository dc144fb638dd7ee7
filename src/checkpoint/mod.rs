//! Conversation checkpoints keyed by thread id.
//!
//! Every agent step is saved so a thread can be continued later: by another
//! `call_agent`, or by `resume_agent` when a tool interrupted the run.

mod memory;
mod sqlite;

pub use memory::InMemoryCheckpointStore;
pub use sqlite::SqliteCheckpointStore;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::llm::{ChatMessage, ToolCall, Usage};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Checkpoint backend error: {0}")]
    Backend(String),

    #[error("Checkpoint serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// Where a thread stands after its last step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadStatus {
    /// Loop in progress (or the process died mid-run).
    Running,
    /// Suspended on a tool waiting for an external decision.
    Interrupted,
    /// The model produced a final answer.
    Completed,
    /// The last run ended with an error; the thread can be called again.
    Failed,
}

/// A tool call suspended mid-turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingToolCall {
    /// The call that raised the interrupt.
    pub tool_call: ToolCall,
    /// Payload handed to the approver.
    pub interrupt: Value,
    /// Calls from the same assistant turn that still need to run.
    #[serde(default)]
    pub remaining: Vec<ToolCall>,
}

/// Saved state of one conversation thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub thread_id: String,
    /// Name of the agent that owns the thread.
    pub agent: String,
    pub messages: Vec<ChatMessage>,
    pub status: ThreadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<PendingToolCall>,
    /// Model calls made over the thread's lifetime.
    #[serde(default)]
    pub iterations: usize,
    /// Tokens reported by the model over the thread's lifetime.
    #[serde(default)]
    pub usage: Usage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Checkpoint {
    pub fn new(thread_id: impl Into<String>, agent: impl Into<String>) -> Self {
        let now = now_string();
        Self {
            thread_id: thread_id.into(),
            agent: agent.into(),
            messages: Vec::new(),
            status: ThreadStatus::Running,
            pending: None,
            iterations: 0,
            usage: Usage::default(),
            error: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = now_string();
    }
}

pub(crate) fn now_string() -> String {
    Utc::now().to_rfc3339()
}

/// Persistence for checkpoints.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Whether checkpoints survive a process restart.
    fn is_persistent(&self) -> bool;

    async fn get(&self, thread_id: &str) -> Result<Option<Checkpoint>, StoreError>;

    /// Insert or replace the checkpoint for `checkpoint.thread_id`.
    async fn put(&self, checkpoint: &Checkpoint) -> Result<(), StoreError>;

    /// Replace the checkpoint only while the stored copy still has
    /// `expected_status` and was last written at `expected_updated_at`.
    /// Returns whether the write happened.
    async fn put_if_unchanged(
        &self,
        checkpoint: &Checkpoint,
        expected_status: ThreadStatus,
        expected_updated_at: &str,
    ) -> Result<bool, StoreError>;

    /// Returns whether a checkpoint existed.
    async fn delete(&self, thread_id: &str) -> Result<bool, StoreError>;

    /// Most recently updated first.
    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Checkpoint>, StoreError>;
}
