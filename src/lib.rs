//! # Claims Intake
//!
//! LLM-driven agents for an insurance claims intake pipeline.
//!
//! This library provides:
//! - An FNOL intake agent that turns raw loss emails into a First Notice of Loss
//! - A claim setup agent that looks up the FNOL and policy, checks prior
//!   claims, opens a claim and notifies the insured
//! - Checkpointed threads that can be suspended for human approval and resumed,
//!   in memory or in SQLite
//! - An HTTP API exposing each agent's forward and resume calls
//!
//! ## Architecture
//!
//! Each agent follows the "tools in a loop" pattern:
//! 1. Receive a message on a thread
//! 2. Build context with the system prompt, thread history and tools
//! 3. Call the LLM, execute any tool calls, feed results back
//! 4. Stop on a final answer, or suspend when a tool needs approval
//!
//! ## Example
//!
//! ```rust,ignore
//! use claims_intake::{agent::RunConfig, config::Config, workflows::Workflows};
//!
//! let config = Config::from_env()?;
//! let workflows = Workflows::from_config(&config)?;
//! let run = RunConfig::new();
//! let state = workflows.claim.call_agent("FNOL-2025-001234, policy HO3-77889900", &run).await?;
//! if let Some(interrupt) = state.interrupt {
//!     println!("approve? {}", interrupt.value);
//!     workflows.claim.resume_agent(serde_json::json!({"approved": true}), &run).await?;
//! }
//! ```

pub mod agent;
pub mod api;
pub mod approval;
pub mod checkpoint;
pub mod config;
pub mod llm;
pub mod tools;
pub mod workflows;

pub use config::Config;
