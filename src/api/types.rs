//! API request and response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request to send a message to an agent.
#[derive(Debug, Clone, Deserialize)]
pub struct InvokeRequest {
    /// Raw email text (FNOL intake) or FNOL/policy details (claim setup)
    pub message: String,

    /// Thread to continue. A new thread is started when omitted.
    pub thread_id: Option<String>,
}

/// Request to resume an interrupted thread.
#[derive(Debug, Clone, Deserialize)]
pub struct ResumeRequest {
    /// Decision payload, e.g. `{"approved": true, "subject": "..."}`
    #[serde(default)]
    pub decision: Value,

    /// Thread that was interrupted
    pub thread_id: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,

    /// Whether checkpoints survive a restart
    pub persistent_checkpoints: bool,
}
