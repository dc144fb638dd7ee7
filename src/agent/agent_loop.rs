//! Core agent loop implementation.

use std::sync::Arc;

use serde_json::Value;

use crate::checkpoint::{Checkpoint, CheckpointStore, PendingToolCall, ThreadStatus};
use crate::config::Config;
use crate::llm::{ChatMessage, LlmClient, ToolCall};
use crate::tools::{ToolOutcome, ToolRegistry};

use super::prompt::build_system_prompt;
use super::{AgentError, AgentState, RunConfig};

/// A tool-calling agent bound to one system prompt and tool set.
pub struct Agent {
    name: String,
    model: String,
    max_iterations: usize,
    system_prompt: String,
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    store: Arc<dyn CheckpointStore>,
}

impl Agent {
    /// Create a new agent. `instructions` become the system prompt, followed
    /// by the list of registered tools.
    pub fn new(
        name: impl Into<String>,
        instructions: &str,
        config: &Config,
        llm: Arc<dyn LlmClient>,
        tools: ToolRegistry,
        store: Arc<dyn CheckpointStore>,
    ) -> Self {
        let system_prompt = build_system_prompt(instructions, &tools);
        Self {
            name: name.into(),
            model: config.llm.model.clone(),
            max_iterations: config.max_iterations,
            system_prompt,
            llm,
            tools,
            store,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Append a user message to the thread and run until the model answers,
    /// a tool interrupts, or the iteration cap is hit.
    #[tracing::instrument(
        name = "call_agent",
        skip(self, message, run),
        fields(agent = %self.name, thread_id = %run.thread_id)
    )]
    pub async fn invoke(&self, message: &str, run: &RunConfig) -> Result<AgentState, AgentError> {
        let mut checkpoint = match self.store.get(&run.thread_id).await? {
            Some(existing) => {
                self.check_owner(&existing)?;
                if existing.status == ThreadStatus::Interrupted {
                    return Err(AgentError::ThreadInterrupted(run.thread_id.clone()));
                }
                existing
            }
            None => {
                tracing::info!("Starting new thread");
                let mut fresh = Checkpoint::new(&run.thread_id, &self.name);
                fresh
                    .messages
                    .push(ChatMessage::system(self.system_prompt.clone()));
                fresh
            }
        };

        checkpoint.messages.push(ChatMessage::user(message));
        checkpoint.status = ThreadStatus::Running;
        checkpoint.error = None;
        self.save(&mut checkpoint).await?;

        self.drive(checkpoint, Vec::new()).await
    }

    /// Continue an interrupted thread, using `decision` as the result of the
    /// suspended tool call.
    #[tracing::instrument(
        name = "resume_agent",
        skip(self, decision, run),
        fields(agent = %self.name, thread_id = %run.thread_id)
    )]
    pub async fn resume(&self, decision: Value, run: &RunConfig) -> Result<AgentState, AgentError> {
        tracing::info!(decision = %decision, "Resuming with human decision");

        let mut checkpoint = self
            .store
            .get(&run.thread_id)
            .await?
            .ok_or_else(|| AgentError::ThreadNotFound(run.thread_id.clone()))?;
        self.check_owner(&checkpoint)?;

        let pending = match (checkpoint.status, checkpoint.pending.take()) {
            (ThreadStatus::Interrupted, Some(pending)) => pending,
            _ => return Err(AgentError::NothingToResume(run.thread_id.clone())),
        };

        // Claim the suspended call so a concurrent resume of the same thread
        // cannot run it a second time.
        let read_at = checkpoint.updated_at.clone();
        checkpoint.status = ThreadStatus::Running;
        checkpoint.touch();
        if !self
            .store
            .put_if_unchanged(&checkpoint, ThreadStatus::Interrupted, &read_at)
            .await?
        {
            tracing::warn!("Thread was resumed concurrently");
            return Err(AgentError::NothingToResume(run.thread_id.clone()));
        }

        let call = &pending.tool_call;
        let result = match self
            .tools
            .resume(&call.function.name, parse_arguments(call), decision)
            .await
        {
            Ok(output) => output,
            Err(e) => format!("Error: {}", e),
        };
        tracing::debug!(
            tool = %call.function.name,
            result = %truncate_for_log(&result, 500),
            "Suspended tool completed"
        );

        checkpoint
            .messages
            .push(ChatMessage::tool(call.id.clone(), result));
        self.save(&mut checkpoint).await?;

        let state = self.drive(checkpoint, pending.remaining).await;
        tracing::info!("Resume completed");
        state
    }

    /// Run queued tool calls, then the model loop.
    async fn drive(
        &self,
        mut checkpoint: Checkpoint,
        queued: Vec<ToolCall>,
    ) -> Result<AgentState, AgentError> {
        if let Some(interrupted) = self.run_tool_calls(&mut checkpoint, queued).await? {
            return Ok(interrupted);
        }

        let tool_schemas = self.tools.get_tool_schemas();

        for iteration in 0..self.max_iterations {
            tracing::debug!("Agent iteration {}", iteration + 1);
            checkpoint.iterations += 1;

            let response = match self
                .llm
                .chat_completion(&self.model, &checkpoint.messages, Some(&tool_schemas))
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(retryable = e.is_retryable(), "LLM call failed: {}", e);
                    let err = AgentError::from(e);
                    self.fail(&mut checkpoint, &err).await;
                    return Err(err);
                }
            };

            tracing::debug!(
                finish_reason = response.finish_reason.as_deref().unwrap_or("unknown"),
                prompt_tokens = ?response.usage.map(|u| u.prompt_tokens),
                completion_tokens = ?response.usage.map(|u| u.completion_tokens),
                "LLM responded"
            );
            if let Some(usage) = &response.usage {
                checkpoint.usage.add(usage);
            }

            if let Some(tool_calls) = response.tool_calls.filter(|calls| !calls.is_empty()) {
                checkpoint.messages.push(ChatMessage::assistant(
                    response.content,
                    Some(tool_calls.clone()),
                ));

                if let Some(interrupted) = self.run_tool_calls(&mut checkpoint, tool_calls).await? {
                    return Ok(interrupted);
                }
                continue;
            }

            // No tool calls - this is the final response
            if let Some(content) = response.content {
                tracing::info!(
                    response = %truncate_for_log(&content, 200),
                    "Agent finished"
                );
                checkpoint
                    .messages
                    .push(ChatMessage::assistant(Some(content), None));
                checkpoint.status = ThreadStatus::Completed;
                self.save(&mut checkpoint).await?;
                return Ok(AgentState::from_checkpoint(&checkpoint));
            }

            let err = AgentError::EmptyResponse;
            self.fail(&mut checkpoint, &err).await;
            return Err(err);
        }

        let err = AgentError::MaxIterations(self.max_iterations);
        self.fail(&mut checkpoint, &err).await;
        Err(err)
    }

    /// Execute tool calls in order. Returns the interrupted state if one of
    /// them suspends; the calls after it are kept for the resume.
    async fn run_tool_calls(
        &self,
        checkpoint: &mut Checkpoint,
        calls: Vec<ToolCall>,
    ) -> Result<Option<AgentState>, AgentError> {
        let mut calls = calls.into_iter();
        while let Some(call) = calls.next() {
            tracing::info!(
                tool = %call.function.name,
                args = %truncate_for_log(&call.function.arguments, 500),
                "Calling tool"
            );

            match self
                .tools
                .execute(&call.function.name, parse_arguments(&call))
                .await
            {
                Ok(ToolOutcome::Output(output)) => {
                    tracing::debug!(
                        tool = %call.function.name,
                        result = %truncate_for_log(&output, 1000),
                        "Tool returned"
                    );
                    checkpoint.messages.push(ChatMessage::tool(call.id, output));
                }
                Ok(ToolOutcome::Interrupt(payload)) => {
                    tracing::info!(tool = %call.function.name, "Tool interrupted, awaiting decision");
                    checkpoint.status = ThreadStatus::Interrupted;
                    checkpoint.pending = Some(PendingToolCall {
                        tool_call: call,
                        interrupt: payload,
                        remaining: calls.by_ref().collect(),
                    });
                    self.save(checkpoint).await?;
                    return Ok(Some(AgentState::from_checkpoint(checkpoint)));
                }
                Err(e) => {
                    tracing::warn!(tool = %call.function.name, "Tool failed: {}", e);
                    checkpoint
                        .messages
                        .push(ChatMessage::tool(call.id, format!("Error: {}", e)));
                }
            }
            self.save(checkpoint).await?;
        }
        Ok(None)
    }

    fn check_owner(&self, checkpoint: &Checkpoint) -> Result<(), AgentError> {
        if checkpoint.agent != self.name {
            return Err(AgentError::WrongAgent {
                thread_id: checkpoint.thread_id.clone(),
                owner: checkpoint.agent.clone(),
            });
        }
        Ok(())
    }

    async fn save(&self, checkpoint: &mut Checkpoint) -> Result<(), AgentError> {
        checkpoint.touch();
        self.store.put(checkpoint).await?;
        Ok(())
    }

    /// Record a failed run. The run's own error is what the caller sees, so a
    /// store failure here is only logged.
    async fn fail(&self, checkpoint: &mut Checkpoint, err: &AgentError) {
        tracing::error!("Agent run failed: {}", err);
        checkpoint.status = ThreadStatus::Failed;
        checkpoint.error = Some(err.to_string());
        if let Err(e) = self.save(checkpoint).await {
            tracing::warn!("Failed to checkpoint failed run: {}", e);
        }
    }
}

fn parse_arguments(tool_call: &ToolCall) -> Value {
    serde_json::from_str(&tool_call.function.arguments).unwrap_or(Value::Null)
}

/// Truncate a string for logging purposes.
fn truncate_for_log(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((idx, _)) => format!("{}... [truncated]", &s[..idx]),
    }
}
