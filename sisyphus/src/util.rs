//! Small convenience constructors for common types.

use serde_json::Value;

use crate::{ExecutionContext, ToolCall, ToolError, TraceId};

#[doc(hidden)]
pub use serde_json::json as json_value;

/// Builds a [`ToolCall`] from a JSON value, which must be an object.
pub fn tool_call(
    id: impl Into<String>,
    name: impl Into<String>,
    input: Value,
) -> Result<ToolCall, ToolError> {
    let name = name.into();
    match input {
        Value::Object(input) => Ok(ToolCall::new(id, name, input)),
        other => Err(ToolError::invalid_arguments(format!(
            "tool input must be a JSON object, got {other}"
        ))
        .with_tool_name(name)),
    }
}

pub fn execution_context(
    call_id: impl Into<String>,
    trace_id: impl Into<TraceId>,
) -> ExecutionContext {
    ExecutionContext::new()
        .with_call_id(call_id)
        .with_trace_id(trace_id)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::ToolErrorKind;

    use super::{execution_context, tool_call};

    #[test]
    fn tool_call_requires_an_object_input() {
        let call = tool_call("toolu_1", "search", json!({"pattern": "x"})).expect("object input");
        assert_eq!(call.input["pattern"], "x");

        let error = tool_call("toolu_2", "search", json!(["x"])).expect_err("array input");
        assert_eq!(error.kind, ToolErrorKind::InvalidArguments);
        assert_eq!(error.tool_name.as_deref(), Some("search"));
    }

    #[test]
    fn execution_context_sets_both_identifiers() {
        let context = execution_context("toolu_1", "trace-9");

        assert_eq!(context.call_id.as_deref(), Some("toolu_1"));
        assert_eq!(context.trace_id.as_ref().map(ToString::to_string).as_deref(), Some("trace-9"));
    }
}
