//! Raw email to FNOL.

use std::sync::Arc;

use serde_json::Value;

use crate::agent::{Agent, AgentError, AgentState, RunConfig};
use crate::checkpoint::CheckpointStore;
use crate::config::Config;
use crate::llm::LlmClient;
use crate::tools::fnol_tools;

pub const FNOL_INTAKE_INSTRUCTIONS: &str = r#"
You are a claims intake assistant for a P&C insurer.

You receive RAW email text from insureds or agents about a new loss.
Your job:

1. Carefully extract all FNOL fields:
   - insured_name
   - policy_number (if mentioned; otherwise leave null)
   - loss_date and time
   - location of loss
   - loss_cause
   - brief_loss_description
   - contact_info (phone, email)
2. Call the `create_fnol` tool EXACTLY ONCE with a structured JSON payload.
3. Do NOT ask the user any questions; this is a backend process.
Return only what the tool returns as the final answer.
"#;

/// Agent that turns inbound loss emails into FNOL records.
pub struct FnolIntakeAgent {
    agent: Agent,
}

impl FnolIntakeAgent {
    pub const NAME: &'static str = "fnol_intake";

    pub fn new(config: &Config, llm: Arc<dyn LlmClient>, store: Arc<dyn CheckpointStore>) -> Self {
        Self {
            agent: Agent::new(
                Self::NAME,
                FNOL_INTAKE_INSTRUCTIONS,
                config,
                llm,
                fnol_tools(),
                store,
            ),
        }
    }

    /// Submit raw email text on a thread.
    pub async fn call_agent(&self, msg: &str, run: &RunConfig) -> Result<AgentState, AgentError> {
        self.agent.invoke(msg, run).await
    }

    /// Continue an interrupted thread with an external decision.
    pub async fn resume_agent(
        &self,
        decision: Value,
        run: &RunConfig,
    ) -> Result<AgentState, AgentError> {
        self.agent.resume(decision, run).await
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }
}
