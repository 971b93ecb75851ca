use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use stooling::{ExecutionContext, ToolError, ToolExecutionHooks, ToolResult};

/// Wraps hooks so a panicking callback never takes down a tool execution.
pub struct SafeToolHooks<H> {
    inner: H,
}

impl<H> SafeToolHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H> ToolExecutionHooks for SafeToolHooks<H>
where
    H: ToolExecutionHooks,
{
    fn on_execution_start(&self, tool_name: &str, context: &ExecutionContext) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_execution_start(tool_name, context)
        }));
    }

    fn on_execution_success(
        &self,
        tool_name: &str,
        context: &ExecutionContext,
        result: &ToolResult,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_execution_success(tool_name, context, result, elapsed)
        }));
    }

    fn on_execution_failure(
        &self,
        tool_name: &str,
        context: &ExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_execution_failure(tool_name, context, error, elapsed)
        }));
    }
}
