//! System prompt assembly for the agents.

use crate::tools::ToolRegistry;

/// Build the system prompt: task instructions followed by the tool list.
pub fn build_system_prompt(instructions: &str, tools: &ToolRegistry) -> String {
    let tool_descriptions = tools
        .list_tools()
        .iter()
        .map(|t| format!("- **{}**: {}", t.name, t.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"{instructions}

## Available Tools

{tool_descriptions}

Respond with a tool call whenever a tool is needed. The system will execute it and return the result."#,
        instructions = instructions.trim(),
        tool_descriptions = tool_descriptions
    )
}
