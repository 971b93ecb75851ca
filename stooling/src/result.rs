//! Uniform outcome record returned by every tool invocation.
//!
//! ```rust
//! use stooling::{ToolResult, ToolStatus};
//!
//! let result = ToolResult::success("hi").with_metadata("lines_read", 1);
//! assert_eq!(result.status, ToolStatus::Success);
//! assert_eq!(result.data, "hi");
//! assert!(result.error_message.is_none());
//!
//! let failed = ToolResult::error("file not found: notes.txt");
//! assert!(failed.is_error());
//! ```

use scommon::MetadataMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ToolError, ToolErrorKind};

const MISSING_ERROR_MESSAGE: &str = "tool reported a failure without a message";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Success,
    Error,
    Timeout,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub status: ToolStatus,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub metadata: MetadataMap,
}

impl ToolResult {
    pub fn success(data: impl Into<Value>) -> Self {
        Self {
            status: ToolStatus::Success,
            data: data.into(),
            error_message: None,
            metadata: MetadataMap::new(),
        }
    }

    pub fn success_empty() -> Self {
        Self::success(Value::Null)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::failure(ToolStatus::Error, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::failure(ToolStatus::Timeout, message)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::failure(ToolStatus::Cancelled, message)
    }

    fn failure(status: ToolStatus, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            MISSING_ERROR_MESSAGE.to_string()
        } else {
            message
        };

        Self {
            status,
            data: Value::Null,
            error_message: Some(message),
            metadata: MetadataMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ToolStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == ToolStatus::Error
    }

    /// Converts a non-successful result into the matching error, `None` on success.
    pub fn to_error(&self) -> Option<ToolError> {
        let kind = match self.status {
            ToolStatus::Success => return None,
            ToolStatus::Error => ToolErrorKind::Execution,
            ToolStatus::Timeout => ToolErrorKind::Timeout,
            ToolStatus::Cancelled => ToolErrorKind::Cancelled,
        };
        let message = self
            .error_message
            .clone()
            .unwrap_or_else(|| MISSING_ERROR_MESSAGE.to_string());

        Some(ToolError::new(kind, message))
    }
}
