//! Renders registered tools for model prompts and help output.
//!
//! ```rust
//! use serde_json::json;
//! use stooling::{ToolArgs, ToolRegistry, ToolResult, format_tools_for_anthropic, tool_descriptions};
//!
//! let registry = ToolRegistry::new();
//! assert_eq!(tool_descriptions(&registry), "No tools available.");
//!
//! registry
//!     .register_fn(
//!         "ping",
//!         "Replies with pong",
//!         json!({"type": "object", "properties": {}}),
//!         |_args: &ToolArgs| ToolResult::success("pong"),
//!     )
//!     .expect("ping should register");
//!
//! assert_eq!(format_tools_for_anthropic(&registry)[0]["name"], "ping");
//! assert_eq!(tool_descriptions(&registry), "- **ping**: Replies with pong");
//! ```

use serde_json::{Value, json};

use crate::ToolRegistry;

/// `tools` entries for the Anthropic Messages API, sorted by tool name.
pub fn format_tools_for_anthropic(registry: &ToolRegistry) -> Vec<Value> {
    registry
        .list_tools()
        .iter()
        .map(|tool| {
            json!({
                "name": tool.name(),
                "description": tool.description(),
                "input_schema": tool.parameters(),
            })
        })
        .collect()
}

pub fn tool_descriptions(registry: &ToolRegistry) -> String {
    let tools = registry.list_tools();
    if tools.is_empty() {
        return "No tools available.".to_string();
    }

    tools
        .iter()
        .map(|tool| format!("- **{}**: {}", tool.name(), tool.description()))
        .collect::<Vec<_>>()
        .join("\n")
}
