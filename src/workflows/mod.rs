//! The two claims workflows and their shared wiring.

mod claim;
mod fnol;

pub use claim::{ClaimSetupAgent, CLAIM_SETUP_INSTRUCTIONS};
pub use fnol::{FnolIntakeAgent, FNOL_INTAKE_INSTRUCTIONS};

use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use crate::agent::{AgentError, AgentState, RunConfig};
use crate::checkpoint::{CheckpointStore, InMemoryCheckpointStore, SqliteCheckpointStore};
use crate::config::Config;
use crate::llm::{LlmClient, OpenAiClient};

/// Which workflow a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowKind {
    Fnol,
    Claim,
}

impl FromStr for WorkflowKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fnol" | "fnol_intake" => Ok(Self::Fnol),
            "claim" | "claim_setup" => Ok(Self::Claim),
            other => Err(format!("unknown agent: {}", other)),
        }
    }
}

/// Both agents, sharing one model client and checkpoint store.
pub struct Workflows {
    pub fnol: FnolIntakeAgent,
    pub claim: ClaimSetupAgent,
    store: Arc<dyn CheckpointStore>,
}

impl Workflows {
    pub fn new(config: &Config, llm: Arc<dyn LlmClient>, store: Arc<dyn CheckpointStore>) -> Self {
        Self {
            fnol: FnolIntakeAgent::new(config, Arc::clone(&llm), Arc::clone(&store)),
            claim: ClaimSetupAgent::new(config, llm, Arc::clone(&store)),
            store,
        }
    }

    /// Wire the OpenAI-compatible client and the configured checkpoint store.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let llm: Arc<dyn LlmClient> = Arc::new(OpenAiClient::new(&config.llm));
        let store = open_store(config)?;
        Ok(Self::new(config, llm, store))
    }

    pub fn store(&self) -> &Arc<dyn CheckpointStore> {
        &self.store
    }

    pub async fn call_agent(
        &self,
        kind: WorkflowKind,
        msg: &str,
        run: &RunConfig,
    ) -> Result<AgentState, AgentError> {
        match kind {
            WorkflowKind::Fnol => self.fnol.call_agent(msg, run).await,
            WorkflowKind::Claim => self.claim.call_agent(msg, run).await,
        }
    }

    pub async fn resume_agent(
        &self,
        kind: WorkflowKind,
        decision: Value,
        run: &RunConfig,
    ) -> Result<AgentState, AgentError> {
        match kind {
            WorkflowKind::Fnol => self.fnol.resume_agent(decision, run).await,
            WorkflowKind::Claim => self.claim.resume_agent(decision, run).await,
        }
    }
}

/// SQLite when `CHECKPOINT_DB` is set, otherwise in-memory.
pub fn open_store(config: &Config) -> anyhow::Result<Arc<dyn CheckpointStore>> {
    match &config.checkpoint_db {
        Some(path) => Ok(Arc::new(SqliteCheckpointStore::open(path)?)),
        None => {
            tracing::info!("CHECKPOINT_DB not set, checkpoints are kept in memory");
            Ok(Arc::new(InMemoryCheckpointStore::new()))
        }
    }
}
