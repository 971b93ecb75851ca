//! Runs a model's tool calls against a registry and shapes the replies.

use std::sync::Arc;

use serde_json::Value;

use crate::{ExecutionContext, ToolCall, ToolCallResult, ToolExecutor, ToolRegistry, ToolResult};

#[derive(Clone)]
pub struct ToolOrchestrator {
    registry: Arc<ToolRegistry>,
    executor: ToolExecutor,
}

impl ToolOrchestrator {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self::with_executor(registry, ToolExecutor::default())
    }

    pub fn with_executor(registry: Arc<ToolRegistry>, executor: ToolExecutor) -> Self {
        Self { registry, executor }
    }

    pub fn registry(&self) -> Arc<ToolRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn executor(&self) -> &ToolExecutor {
        &self.executor
    }

    /// Executes calls one after another; results keep the input order.
    pub async fn execute_tool_calls(&self, tool_calls: &[ToolCall]) -> Vec<ToolCallResult> {
        let mut results = Vec::with_capacity(tool_calls.len());
        for call in tool_calls {
            results.push(self.execute_single_tool_call(call).await);
        }
        results
    }

    pub async fn execute_single_tool_call(&self, tool_call: &ToolCall) -> ToolCallResult {
        let Ok(tool) = self.registry.get(&tool_call.name) else {
            return ToolCallResult::error(
                &tool_call.id,
                format!("Error: Tool '{}' not found in registry", tool_call.name),
            );
        };

        let timeout = self
            .registry
            .get_definition(&tool_call.name)
            .and_then(|definition| definition.timeout());
        let context = ExecutionContext::new().with_call_id(&tool_call.id);

        match self
            .executor
            .execute_with_context(&tool, tool_call.input.clone(), timeout, &context)
            .await
        {
            Ok(result) if result.is_success() => {
                ToolCallResult::success(&tool_call.id, success_content(&result))
            }
            Ok(result) => ToolCallResult::error(
                &tool_call.id,
                result
                    .error_message
                    .unwrap_or_else(|| "Unknown error occurred".to_string()),
            ),
            Err(error) => {
                ToolCallResult::error(&tool_call.id, format!("Execution error: {error}"))
            }
        }
    }

    pub fn format_results_for_llm(&self, results: &[ToolCallResult]) -> Vec<Value> {
        results
            .iter()
            .map(ToolCallResult::to_anthropic_format)
            .collect()
    }
}

fn success_content(result: &ToolResult) -> String {
    match &result.data {
        Value::Null => "Success".to_string(),
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
