//! Unified facade over the sisyphus workspace crates.
//!
//! This crate is designed to be the single dependency for most applications.
//! It re-exports the registry, executor, built-in tools, and observability
//! hooks, and provides a runtime bootstrap plus a few convenience macros.

mod macros;

pub mod prelude;
pub mod runtime;
pub mod util;

pub use sbuiltins;
pub use scommon;
pub use sobserve;
pub use stooling;

pub use scommon::{BoxFuture, MetadataMap, TraceId};
pub use sobserve::{
    CompositeToolHooks, MetricsObservabilityHooks, SafeToolHooks, TracingObservabilityHooks,
};
pub use stooling::{
    AsyncFunctionTool, AsyncTool, DEFAULT_DEFINITION_PATTERN, ExecutionContext, ExecutorConfig,
    FunctionTool, HandlerEntry, HandlerModule, HandlerTable, NoopToolExecutionHooks,
    ParameterSchema, SyncTool, Tool, ToolArgs, ToolCall, ToolCallResult, ToolDefinition,
    ToolDefinitionBuilder, ToolDescriptor, ToolError, ToolErrorKind, ToolExecutionHooks,
    ToolExecutor, ToolFuture, ToolOrchestrator, ToolRegistry, ToolResult, ToolStatus,
    format_tools_for_anthropic, parse_json_object, parse_json_value, required_string,
    tool_descriptions,
};

pub use runtime::{RuntimeBundle, RuntimeConfig, build_runtime, default_hooks};
pub use util::{execution_context, tool_call};

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{SyncTool, ToolStatus};

    #[test]
    fn tool_args_macro_builds_an_argument_map() {
        let args = crate::tool_args! {
            "file_path" => "notes.md",
            "start_line" => 2,
        };

        assert_eq!(args.len(), 2);
        assert_eq!(args["file_path"], json!("notes.md"));
        assert_eq!(args["start_line"], json!(2));
        assert!(crate::tool_args! {}.is_empty());
    }

    #[test]
    fn tool_call_macro_carries_id_and_input() {
        let call = crate::tool_call!("toolu_1", "search", { "pattern" => "fn main" });

        assert_eq!(call.id, "toolu_1");
        assert_eq!(call.name, "search");
        assert_eq!(call.input["pattern"], json!("fn main"));
    }

    #[test]
    fn fn_tool_macro_wraps_a_closure() {
        let tool = crate::fn_tool!("ping", "Replies with pong", |_args| {
            crate::ToolResult::success("pong")
        });

        assert_eq!(tool.name(), "ping");
        assert!(!tool.is_async());
        let result = tool
            .as_sync()
            .expect("sync tool")
            .execute(&crate::ToolArgs::new());
        assert_eq!(result.status, ToolStatus::Success);
        assert_eq!(result.data, json!("pong"));
    }
}
