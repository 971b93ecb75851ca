use std::sync::Arc;
use std::time::Duration;

use stooling::{ExecutionContext, ToolError, ToolExecutionHooks, ToolResult};

/// Fans every callback out to each registered hook, in insertion order.
#[derive(Clone, Default)]
pub struct CompositeToolHooks {
    hooks: Vec<Arc<dyn ToolExecutionHooks>>,
}

impl CompositeToolHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<H>(mut self, hooks: H) -> Self
    where
        H: ToolExecutionHooks + 'static,
    {
        self.hooks.push(Arc::new(hooks));
        self
    }

    pub fn push(&mut self, hooks: Arc<dyn ToolExecutionHooks>) {
        self.hooks.push(hooks);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl ToolExecutionHooks for CompositeToolHooks {
    fn on_execution_start(&self, tool_name: &str, context: &ExecutionContext) {
        for hooks in &self.hooks {
            hooks.on_execution_start(tool_name, context);
        }
    }

    fn on_execution_success(
        &self,
        tool_name: &str,
        context: &ExecutionContext,
        result: &ToolResult,
        elapsed: Duration,
    ) {
        for hooks in &self.hooks {
            hooks.on_execution_success(tool_name, context, result, elapsed);
        }
    }

    fn on_execution_failure(
        &self,
        tool_name: &str,
        context: &ExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        for hooks in &self.hooks {
            hooks.on_execution_failure(tool_name, context, error, elapsed);
        }
    }
}
