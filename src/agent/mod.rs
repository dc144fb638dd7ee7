//! Agent module - the tool-calling loop with checkpointed, resumable threads.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Load the thread checkpoint (or start one with the system prompt)
//! 2. Call the LLM with the history and available tools
//! 3. Execute requested tool calls and feed the results back
//! 4. Stop on a final answer, on a tool interrupt, or at the iteration cap
//!
//! An interrupted thread is continued with [`Agent::resume`], which supplies
//! the external decision as the suspended tool call's result.

mod agent_loop;
mod prompt;

pub use agent_loop::Agent;
pub use prompt::build_system_prompt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::checkpoint::{Checkpoint, StoreError, ThreadStatus};
use crate::llm::{ChatMessage, LlmError, Role, Usage};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Thread {0} not found")]
    ThreadNotFound(String),

    #[error("Thread {0} has no interrupted tool call to resume")]
    NothingToResume(String),

    #[error("Thread {0} is waiting for a decision; resume it instead")]
    ThreadInterrupted(String),

    #[error("Thread {thread_id} belongs to agent '{owner}'")]
    WrongAgent { thread_id: String, owner: String },

    #[error("Max iterations ({0}) reached without completion")]
    MaxIterations(usize),

    #[error("LLM returned empty response")]
    EmptyResponse,

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Session configuration: which conversation thread a call belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub thread_id: String,
}

impl RunConfig {
    /// A fresh thread.
    pub fn new() -> Self {
        Self {
            thread_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn with_thread_id(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Action surfaced to the caller while a thread is suspended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interrupt {
    pub tool_call_id: String,
    pub tool: String,
    pub value: Value,
}

/// Thread state returned by both entry points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub thread_id: String,
    pub agent: String,
    pub status: ThreadStatus,
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interrupt: Option<Interrupt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_response: Option<String>,
    /// Tokens used by the thread so far.
    #[serde(default)]
    pub usage: Usage,
}

impl AgentState {
    pub fn from_checkpoint(checkpoint: &Checkpoint) -> Self {
        let interrupt = checkpoint.pending.as_ref().map(|p| Interrupt {
            tool_call_id: p.tool_call.id.clone(),
            tool: p.tool_call.function.name.clone(),
            value: p.interrupt.clone(),
        });

        let final_response = if checkpoint.status == ThreadStatus::Completed {
            checkpoint
                .messages
                .iter()
                .rev()
                .find(|m| m.role == Role::Assistant && m.tool_calls.is_none())
                .and_then(|m| m.content.clone())
        } else {
            None
        };

        Self {
            thread_id: checkpoint.thread_id.clone(),
            agent: checkpoint.agent.clone(),
            status: checkpoint.status,
            messages: checkpoint.messages.clone(),
            interrupt,
            final_response,
            usage: checkpoint.usage,
        }
    }

    pub fn is_interrupted(&self) -> bool {
        self.status == ThreadStatus::Interrupted
    }
}
