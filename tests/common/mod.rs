#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use claims_intake::config::Config;
use claims_intake::llm::{ChatMessage, ChatResponse, LlmClient, LlmError, ToolCall, ToolSchema};
use serde_json::Value;

/// LLM double that replays a fixed list of turns and records every request.
#[derive(Clone, Default)]
pub struct ScriptedLlm {
    turns: Arc<Mutex<VecDeque<ChatResponse>>>,
    requests: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl ScriptedLlm {
    pub fn new(turns: Vec<ChatResponse>) -> Self {
        Self {
            turns: Arc::new(Mutex::new(turns.into())),
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.turns.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn chat_completion(
        &self,
        _model: &str,
        messages: &[ChatMessage],
        _tools: Option<&[ToolSchema]>,
    ) -> Result<ChatResponse, LlmError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.turns
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| LlmError::InvalidResponse("script exhausted".to_string()))
    }
}

pub fn calls(calls: Vec<(&str, &str, Value)>) -> ChatResponse {
    ChatResponse {
        content: None,
        tool_calls: Some(
            calls
                .into_iter()
                .map(|(id, name, args)| ToolCall::new(id, name, &args))
                .collect(),
        ),
        finish_reason: Some("tool_calls".to_string()),
        usage: None,
    }
}

pub fn call(id: &str, name: &str, args: Value) -> ChatResponse {
    calls(vec![(id, name, args)])
}

pub fn answer(text: &str) -> ChatResponse {
    ChatResponse {
        content: Some(text.to_string()),
        tool_calls: None,
        finish_reason: Some("stop".to_string()),
        usage: None,
    }
}

pub fn config() -> Config {
    Config::new("sk-test", "gpt-5-nano")
}

/// Content of the tool message answering `tool_call_id`.
pub fn tool_result<'a>(messages: &'a [ChatMessage], tool_call_id: &str) -> Option<&'a str> {
    messages
        .iter()
        .find(|m| m.tool_call_id.as_deref() == Some(tool_call_id))
        .and_then(|m| m.content.as_deref())
}
