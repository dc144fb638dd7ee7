//! Tool registry and the claims tool catalogue.
//!
//! Tools are what the model can invoke. Most return fixed payloads; the email
//! tool is gated on human approval and suspends the agent instead of acting.

mod claim;
mod email;
mod fnol;
mod policy;

pub use claim::CreateClaim;
pub use email::SendEmail;
pub use fnol::{CreateFnol, GetFnolDetails};
pub use policy::{GetPolicyDetails, GetPreviousClaims};

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::llm::{ToolFunction, ToolSchema};

/// Result of executing a tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// Text returned to the model as the tool message.
    Output(String),
    /// Execution must pause; the payload is surfaced to the caller and the
    /// call is completed later through [`Tool::resume`].
    Interrupt(Value),
}

/// A function the model can call.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema for the arguments object.
    fn parameters_schema(&self) -> Value;

    async fn execute(&self, args: Value) -> anyhow::Result<ToolOutcome>;

    /// Finish a call that previously returned [`ToolOutcome::Interrupt`],
    /// using `decision` in place of the suspended result.
    async fn resume(&self, _args: Value, _decision: Value) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("Tool '{}' cannot be resumed", self.name()))
    }
}

/// Name and description of a registered tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

/// Ordered set of tools available to one agent.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool, replacing any existing tool with the same name.
    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        self.tools.retain(|t| t.name() != tool.name());
        self.tools.push(Arc::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.tools
            .iter()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
            })
            .collect()
    }

    /// Function definitions in the shape the chat endpoint expects.
    pub fn get_tool_schemas(&self) -> Vec<ToolSchema> {
        self.tools
            .iter()
            .map(|t| ToolSchema {
                kind: "function".to_string(),
                function: ToolFunction {
                    name: t.name().to_string(),
                    description: t.description().to_string(),
                    parameters: t.parameters_schema(),
                },
            })
            .collect()
    }

    pub async fn execute(&self, name: &str, args: Value) -> anyhow::Result<ToolOutcome> {
        let tool = self
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", name))?;
        tool.execute(args).await
    }

    pub async fn resume(&self, name: &str, args: Value, decision: Value) -> anyhow::Result<String> {
        let tool = self
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", name))?;
        tool.resume(args, decision).await
    }
}

/// Tools for turning a raw email into an FNOL.
pub fn fnol_tools() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(CreateFnol);
    registry
}

/// Tools for setting up a claim from an FNOL and policy.
pub fn claim_tools() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(GetFnolDetails);
    registry.register(CreateClaim);
    registry.register(GetPolicyDetails);
    registry.register(SendEmail);
    registry.register(GetPreviousClaims);
    registry
}

/// Read an optional string argument, treating blanks as absent.
fn str_arg<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Build an object schema where every listed property is a string.
fn string_properties_schema(properties: &[(&str, &str)], required: &[&str]) -> Value {
    let props: serde_json::Map<String, Value> = properties
        .iter()
        .map(|(name, description)| {
            (
                name.to_string(),
                serde_json::json!({ "type": "string", "description": description }),
            )
        })
        .collect();
    serde_json::json!({
        "type": "object",
        "properties": props,
        "required": required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn claim_registry_has_all_tools_in_order() {
        let names: Vec<String> = claim_tools().list_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                "get_fnol_details_from_fnol_number",
                "create_claim",
                "get_policy_details",
                "send_email",
                "get_previous_claims_by_policy_number",
            ]
        );
    }

    #[test]
    fn fnol_registry_only_creates_fnol() {
        let registry = fnol_tools();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("create_fnol").is_some());
        assert!(registry.get("send_email").is_none());
    }

    #[test]
    fn schemas_are_function_objects() {
        for schema in claim_tools().get_tool_schemas() {
            assert_eq!(schema.kind, "function");
            assert_eq!(schema.function.parameters["type"], "object");
            assert!(!schema.function.description.is_empty());
        }
    }

    #[test]
    fn register_replaces_same_name() {
        let mut registry = ToolRegistry::new();
        registry.register(GetPreviousClaims);
        registry.register(GetPreviousClaims);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let err = claim_tools()
            .execute("delete_policy", json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool: delete_policy");
    }

    #[tokio::test]
    async fn non_interrupting_tool_cannot_resume() {
        let err = claim_tools()
            .resume("create_claim", json!({}), json!({"approved": true}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("cannot be resumed"));
    }

    #[test]
    fn str_arg_ignores_blank_and_non_string() {
        let args = json!({"a": "  ", "b": 3, "c": " x "});
        assert_eq!(str_arg(&args, "a"), None);
        assert_eq!(str_arg(&args, "b"), None);
        assert_eq!(str_arg(&args, "c"), Some("x"));
        assert_eq!(str_arg(&args, "missing"), None);
    }
}
