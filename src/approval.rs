//! Human approval for side-effecting tool calls.
//!
//! A tool that needs sign-off does not perform its action. It returns a
//! [`PendingAction`] as an interrupt, the agent checkpoints the thread and
//! hands the action to the caller, and a later resume supplies the decision
//! that stands in for the suspended call's result.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle of a proposed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalState {
    Proposed,
    Approved,
    Rejected,
}

/// An email awaiting approval. Serialized form is the interrupt payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    pub action: String,
    pub email: String,
    pub subject: String,
    pub body: String,
}

impl PendingAction {
    pub fn send_email(
        email: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            action: "send_email".to_string(),
            email: email.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Apply a decision, producing the final action and its state.
    ///
    /// Approval may replace subject and body; the recipient is never edited.
    pub fn decide(self, decision: &ApprovalDecision) -> (ApprovalState, PendingAction) {
        if !decision.approved {
            return (ApprovalState::Rejected, self);
        }
        let action = PendingAction {
            subject: decision.subject.clone().unwrap_or(self.subject),
            body: decision.body.clone().unwrap_or(self.body),
            ..self
        };
        (ApprovalState::Approved, action)
    }
}

/// Decision supplied by the approver on resume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalDecision {
    #[serde(default)]
    pub approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ApprovalDecision {
    pub fn approve() -> Self {
        Self {
            approved: true,
            ..Self::default()
        }
    }

    pub fn reject() -> Self {
        Self::default()
    }

    /// Interpret an arbitrary resume payload.
    ///
    /// Only an object whose `approved` field is truthy approves: `true`, a
    /// non-zero number, or a non-empty string, array or object. Any other
    /// payload, strings included, is a rejection.
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(map) = value else {
            return Self::reject();
        };
        if !map.get("approved").is_some_and(is_truthy) {
            return Self::reject();
        }
        Self {
            approved: true,
            subject: map.get("subject").and_then(Value::as_str).map(str::to_string),
            body: map.get("body").and_then(Value::as_str).map(str::to_string),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
