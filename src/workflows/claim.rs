//! FNOL and policy to an opened claim, with an approved notification email.

use std::sync::Arc;

use serde_json::Value;

use crate::agent::{Agent, AgentError, AgentState, RunConfig};
use crate::checkpoint::CheckpointStore;
use crate::config::Config;
use crate::llm::LlmClient;
use crate::tools::claim_tools;

pub const CLAIM_SETUP_INSTRUCTIONS: &str = r#"
You are a claim setup assistant.

Inputs you will be given (in the user message):
- FNOL NUMBER
- Policy Number
- Brief description of the loss

Your tasks:

1. Call `get_fnol_details_from_fnol_number` to retrieve FNOL details.
2. Call `get_policy_details` to retrieve policy & coverage info.
3. Call `get_previous_claims_by_policy_number` to retrieve previous claims for the policy.
4. Based on policy info and loss description, decide reasonable:
   - line_of_business
   - loss_party
   - initial_reserves (rough)
   - claim_type / cause_of_loss
5. Call `create_claim` with:
   - fnol_id
   - policy (as returned by get_policy_details)
   - structured claim metadata you inferred
6. Call `send_email` to send an email to the insured with the claim details.

Use tools; do NOT fabricate IDs.
Return only the final tool output (claim_id) as the answer.
"#;

/// Agent that opens a claim and notifies the insured.
///
/// The notification email is held for approval: `call_agent` returns an
/// interrupted state carrying the proposed email, and `resume_agent` with
/// the approver's decision finishes the run.
pub struct ClaimSetupAgent {
    agent: Agent,
}

impl ClaimSetupAgent {
    pub const NAME: &'static str = "claim_setup";

    pub fn new(config: &Config, llm: Arc<dyn LlmClient>, store: Arc<dyn CheckpointStore>) -> Self {
        Self {
            agent: Agent::new(
                Self::NAME,
                CLAIM_SETUP_INSTRUCTIONS,
                config,
                llm,
                claim_tools(),
                store,
            ),
        }
    }

    pub async fn call_agent(&self, msg: &str, run: &RunConfig) -> Result<AgentState, AgentError> {
        self.agent.invoke(msg, run).await
    }

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
