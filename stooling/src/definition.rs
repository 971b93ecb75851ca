//! Declarative tool definitions and their validation rules.
//!
//! A [`ToolDefinition`] can only exist in a valid state: the builder, the YAML
//! loader, and serde deserialization all funnel through the same checks.
//!
//! ```rust
//! use serde_json::json;
//! use stooling::ToolDefinition;
//!
//! let definition = ToolDefinition::builder("echo", "Echo the input text", "demo.text.echo")
//!     .parameters(json!({
//!         "type": "object",
//!         "properties": {"text": {"type": "string"}},
//!         "required": ["text"]
//!     }))
//!     .build()
//!     .expect("definition should be valid");
//!
//! assert_eq!(definition.name(), "echo");
//! assert_eq!(definition.handler_parts(), Some(("demo.text", "echo")));
//!
//! let invalid = ToolDefinition::builder("Echo", "Echo", "demo.text.echo").build();
//! assert!(invalid.is_err());
//! ```

use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use scommon::MetadataMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::ToolError;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("tool name pattern is valid"));

/// JSON-Schema-shaped description of a tool's keyword arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct ParameterSchema(Value);

impl ParameterSchema {
    pub fn new(value: Value) -> Result<Self, ToolError> {
        let object = value
            .as_object()
            .ok_or_else(|| ToolError::validation("parameters must be a mapping"))?;

        match object.get("type") {
            None => return Err(ToolError::validation("parameters must have a 'type' field")),
            Some(Value::String(kind)) if kind == "object" => {}
            Some(other) => {
                return Err(ToolError::validation(format!(
                    "parameters type must be 'object', got {other}"
                )));
            }
        }

        let properties = match object.get("properties") {
            None => {
                return Err(ToolError::validation(
                    "parameters must have a 'properties' field",
                ));
            }
            Some(Value::Object(properties)) => properties,
            Some(_) => {
                return Err(ToolError::validation(
                    "parameters.properties must be a mapping",
                ));
            }
        };

        if let Some(required) = object.get("required") {
            let required = required
                .as_array()
                .ok_or_else(|| ToolError::validation("parameters.required must be a list"))?;
            for entry in required {
                let field = entry.as_str().ok_or_else(|| {
                    ToolError::validation("parameters.required entries must be strings")
                })?;
                if !properties.contains_key(field) {
                    return Err(ToolError::validation(format!(
                        "required parameter '{field}' is not declared in parameters.properties"
                    )));
                }
            }
        }

        Ok(Self(value))
    }

    /// An object schema without any properties.
    pub fn empty() -> Self {
        Self(json!({"type": "object", "properties": {}}))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn properties(&self) -> &Map<String, Value> {
        static EMPTY: LazyLock<Map<String, Value>> = LazyLock::new(Map::new);
        self.0
            .get("properties")
            .and_then(Value::as_object)
            .unwrap_or(&*EMPTY)
    }

    pub fn required(&self) -> Vec<&str> {
        self.0
            .get("required")
            .and_then(Value::as_array)
            .map(|fields| fields.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

impl Default for ParameterSchema {
    fn default() -> Self {
        Self::empty()
    }
}

impl TryFrom<Value> for ParameterSchema {
    type Error = ToolError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ParameterSchema> for Value {
    fn from(schema: ParameterSchema) -> Self {
        schema.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawToolDefinition", into = "RawToolDefinition")]
pub struct ToolDefinition {
    name: String,
    description: String,
    parameters: ParameterSchema,
    handler: String,
    timeout: Option<Duration>,
    is_async: bool,
    metadata: MetadataMap,
}

impl ToolDefinition {
    pub fn builder(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl Into<String>,
    ) -> ToolDefinitionBuilder {
        ToolDefinitionBuilder {
            name: name.into(),
            description: description.into(),
            handler: handler.into(),
            parameters: ParameterSchema::empty().into_value(),
            timeout: None,
            is_async: false,
            metadata: MetadataMap::new(),
        }
    }

    /// Parses and validates a single YAML definition document.
    pub fn from_yaml_str(source: &str) -> Result<Self, ToolError> {
        let raw: RawToolDefinition = serde_yaml::from_str(source)
            .map_err(|error| ToolError::validation(format!("malformed tool definition: {error}")))?;
        Self::try_from(raw)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ToolError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|error| {
            ToolError::other(format!("failed to read tool definition file: {error}"))
                .with_source_path(path)
        })?;
        Self::from_yaml_str(&source).map_err(|error| error.with_source_path(path))
    }

    pub fn to_yaml_string(&self) -> Result<String, ToolError> {
        serde_yaml::to_string(self)
            .map_err(|error| ToolError::other(format!("failed to serialize definition: {error}")))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &ParameterSchema {
        &self.parameters
    }

    pub fn handler(&self) -> &str {
        &self.handler
    }

    /// Splits the handler path into its module path and member name.
    pub fn handler_parts(&self) -> Option<(&str, &str)> {
        self.handler.rsplit_once('.')
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn is_async(&self) -> bool {
        self.is_async
    }

    pub fn metadata(&self) -> &MetadataMap {
        &self.metadata
    }
}

#[derive(Debug, Clone)]
pub struct ToolDefinitionBuilder {
    name: String,
    description: String,
    handler: String,
    parameters: Value,
    timeout: Option<Duration>,
    is_async: bool,
    metadata: MetadataMap,
}

impl ToolDefinitionBuilder {
    pub fn parameters(mut self, parameters: Value) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn asynchronous(mut self, is_async: bool) -> Self {
        self.is_async = is_async;
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Result<ToolDefinition, ToolError> {
        if self.timeout.is_some_and(|timeout| timeout.is_zero()) {
            return Err(ToolError::validation("timeout must be greater than zero")
                .with_tool_name(self.name));
        }

        validate(
            self.name,
            self.description,
            self.parameters,
            self.handler,
            self.timeout,
            self.is_async,
            self.metadata,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawToolDefinition {
    name: String,
    description: String,
    parameters: Value,
    handler: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout: Option<f64>,
    #[serde(rename = "async", default)]
    is_async: bool,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    metadata: MetadataMap,
}

impl TryFrom<RawToolDefinition> for ToolDefinition {
    type Error = ToolError;

    fn try_from(raw: RawToolDefinition) -> Result<Self, Self::Error> {
        let timeout = match raw.timeout {
            None => None,
            Some(seconds) if seconds.is_finite() && seconds > 0.0 => {
                let timeout = Duration::try_from_secs_f64(seconds).map_err(|error| {
                    ToolError::validation(format!("timeout {seconds} is out of range: {error}"))
                        .with_tool_name(raw.name.clone())
                })?;
                Some(timeout)
            }
            Some(seconds) => {
                return Err(ToolError::validation(format!(
                    "timeout must be a positive number of seconds, got {seconds}"
                ))
                .with_tool_name(raw.name));
            }
        };

        validate(
            raw.name,
            raw.description,
            raw.parameters,
            raw.handler,
            timeout,
            raw.is_async,
            raw.metadata,
        )
    }
}

impl From<ToolDefinition> for RawToolDefinition {
    fn from(definition: ToolDefinition) -> Self {
        Self {
            name: definition.name,
            description: definition.description,
            parameters: definition.parameters.into_value(),
            handler: definition.handler,
            timeout: definition.timeout.map(|timeout| timeout.as_secs_f64()),
            is_async: definition.is_async,
            metadata: definition.metadata,
        }
    }
}

fn validate(
    name: String,
    description: String,
    parameters: Value,
    handler: String,
    timeout: Option<Duration>,
    is_async: bool,
    metadata: MetadataMap,
) -> Result<ToolDefinition, ToolError> {
    if !NAME_PATTERN.is_match(&name) {
        return Err(ToolError::validation(format!(
            "tool name '{name}' must match ^[a-z][a-z0-9_]*$"
        ))
        .with_tool_name(name));
    }

    if description.trim().is_empty() {
        return Err(ToolError::validation("description must not be empty").with_tool_name(name));
    }

    let parameters = ParameterSchema::new(parameters).map_err(|error| error.with_tool_name(&name))?;

    match handler.rsplit_once('.') {
        Some((module, member)) if !module.is_empty() && !member.is_empty() => {}
        _ => {
            return Err(ToolError::validation(format!(
                "handler '{handler}' must be a dotted path such as 'module.function'"
            ))
            .with_tool_name(name)
            .with_handler(handler));
        }
    }

    Ok(ToolDefinition {
        name,
        description,
        parameters,
        handler,
        timeout,
        is_async,
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToolErrorKind;

    const READ_FILE_YAML: &str = r#"
name: read_file
description: Read the contents of a file from the filesystem
parameters:
  type: object
  properties:
    file_path:
      type: string
      description: The absolute path to the file to read
  required:
    - file_path
handler: sisyphus.tools.filesystem.read_file
timeout: 30.0
metadata:
  category: filesystem
"#;

    fn echo_builder() -> ToolDefinitionBuilder {
        ToolDefinition::builder("echo", "Echo the input", "demo.text.echo").parameters(json!({
            "type": "object",
            "properties": {"text": {"type": "string"}},
            "required": ["text"]
        }))
    }

    #[test]
    fn yaml_definition_parses_every_field() {
        let definition = ToolDefinition::from_yaml_str(READ_FILE_YAML).expect("yaml should parse");

        assert_eq!(definition.name(), "read_file");
        assert_eq!(definition.handler(), "sisyphus.tools.filesystem.read_file");
        assert_eq!(
            definition.handler_parts(),
            Some(("sisyphus.tools.filesystem", "read_file"))
        );
        assert_eq!(definition.timeout(), Some(Duration::from_secs(30)));
        assert!(!definition.is_async());
        assert_eq!(definition.parameters().required(), vec!["file_path"]);
        assert!(definition.parameters().properties().contains_key("file_path"));
        assert_eq!(definition.metadata()["category"], "filesystem");
    }

    #[test]
    fn async_key_sets_the_async_flag() {
        let source = READ_FILE_YAML.replace("timeout: 30.0", "async: true");
        let definition = ToolDefinition::from_yaml_str(&source).expect("yaml should parse");
        assert!(definition.is_async());
        assert_eq!(definition.timeout(), None);
    }

    #[test]
    fn builder_accepts_valid_definition() {
        let definition = echo_builder()
            .timeout(Duration::from_millis(1500))
            .asynchronous(true)
            .metadata("owner", "core")
            .build()
            .expect("definition should be valid");

        assert_eq!(definition.description(), "Echo the input");
        assert_eq!(definition.timeout(), Some(Duration::from_millis(1500)));
        assert!(definition.is_async());
    }

    #[test]
    fn invalid_names_are_rejected() {
        for name in ["", "Echo", "1echo", "echo-tool", "_echo", "echo tool"] {
            let error = ToolDefinition::builder(name, "desc", "demo.echo")
                .build()
                .expect_err("name should be rejected");
            assert_eq!(error.kind, ToolErrorKind::Validation, "name {name:?}");
        }
    }

    #[test]
    fn empty_description_is_rejected() {
        let error = ToolDefinition::builder("echo", "  ", "demo.echo")
            .build()
            .expect_err("description should be rejected");
        assert_eq!(error.kind, ToolErrorKind::Validation);
        assert_eq!(error.tool_name.as_deref(), Some("echo"));
    }

    #[test]
    fn handler_without_separator_is_rejected() {
        for handler in ["echo", ".echo", "demo.", ""] {
            let error = ToolDefinition::builder("echo", "desc", handler)
                .build()
                .expect_err("handler should be rejected");
            assert_eq!(error.kind, ToolErrorKind::Validation, "handler {handler:?}");
        }
    }

    #[test]
    fn non_object_parameter_schemas_are_rejected() {
        let cases = [
            json!("object"),
            json!({"properties": {}}),
            json!({"type": "array", "properties": {}}),
            json!({"type": "object"}),
            json!({"type": "object", "properties": []}),
            json!({"type": "object", "properties": {}, "required": "text"}),
            json!({"type": "object", "properties": {"a": {}}, "required": ["b"]}),
        ];

        for parameters in cases {
            let error = echo_builder()
                .parameters(parameters.clone())
                .build()
                .expect_err("schema should be rejected");
            assert_eq!(error.kind, ToolErrorKind::Validation, "schema {parameters}");
        }
    }

    #[test]
    fn non_positive_timeouts_are_rejected() {
        let error = echo_builder()
            .timeout(Duration::ZERO)
            .build()
            .expect_err("zero timeout should be rejected");
        assert_eq!(error.kind, ToolErrorKind::Validation);

        for timeout in ["0", "-5", ".nan"] {
            let source = READ_FILE_YAML.replace("30.0", timeout);
            let error = ToolDefinition::from_yaml_str(&source).expect_err("timeout should fail");
            assert_eq!(error.kind, ToolErrorKind::Validation, "timeout {timeout}");
        }
    }

    #[test]
    fn malformed_yaml_and_unknown_keys_are_rejected() {
        let error = ToolDefinition::from_yaml_str("invalid: yaml: content:")
            .expect_err("yaml should fail");
        assert_eq!(error.kind, ToolErrorKind::Validation);

        let error = ToolDefinition::from_yaml_str("name: incomplete\n")
            .expect_err("missing fields should fail");
        assert!(error.message.contains("malformed"));

        let source = format!("{READ_FILE_YAML}retries: 3\n");
        assert!(ToolDefinition::from_yaml_str(&source).is_err());
    }

    #[test]
    fn deserializing_through_serde_validates() {
        let value = json!({
            "name": "BadName",
            "description": "desc",
            "parameters": {"type": "object", "properties": {}},
            "handler": "demo.echo"
        });
        assert!(serde_json::from_value::<ToolDefinition>(value).is_err());
    }

    #[test]
    fn yaml_serialization_round_trips() {
        let definition = echo_builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("definition should be valid");

        let yaml = definition.to_yaml_string().expect("should serialize");
        assert!(yaml.contains("handler: demo.text.echo"));
        assert_eq!(
            ToolDefinition::from_yaml_str(&yaml).expect("should parse back"),
            definition
        );
    }
}
