//! Execution context and the tool call records exchanged with a model.

use scommon::{MetadataMap, TraceId};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{ToolArgs, ToolError, parse_json_object};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionContext {
    pub call_id: Option<String>,
    pub trace_id: Option<TraceId>,
    pub metadata: MetadataMap,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_call_id(mut self, call_id: impl Into<String>) -> Self {
        self.call_id = Some(call_id.into());
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<TraceId>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A model's request to invoke a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub input: ToolArgs,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, input: ToolArgs) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input,
        }
    }

    /// Builds a call whose input arrives as a raw JSON object string.
    pub fn from_raw(
        id: impl Into<String>,
        name: impl Into<String>,
        input_json: &str,
    ) -> Result<Self, ToolError> {
        let name = name.into();
        let input = parse_json_object(input_json).map_err(|error| error.with_tool_name(&name))?;
        Ok(Self::new(id, name, input))
    }
}

/// Outcome of one [`ToolCall`], shaped for the model's next turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub tool_use_id: String,
    pub content: String,
    #[serde(default)]
    pub is_error: bool,
}

impl ToolCallResult {
    pub fn success(tool_use_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(tool_use_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
            is_error: true,
        }
    }

    /// `tool_result` content block for the Anthropic Messages API.
    pub fn to_anthropic_format(&self) -> Value {
        json!({
            "type": "tool_result",
            "tool_use_id": self.tool_use_id,
            "content": self.content,
            "is_error": self.is_error,
        })
    }
}
