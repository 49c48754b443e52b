//! Wire types for the stdio host protocol.
//!
//! One [`ToolRequest`] per input line, one [`ToolResponse`] per output line.
//! The request `id` is opaque and echoed back unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reserved request name answered with every registered tool's schema.
pub const LIST_TOOLS: &str = "list_tools";

/// A tool call from the agent process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    /// Caller-chosen correlation id, echoed in the response.
    #[serde(default)]
    pub id: Value,
    /// Registered tool name.
    pub tool: String,
    /// Tool arguments.
    #[serde(default = "empty_args")]
    pub args: Value,
}

fn empty_args() -> Value {
    Value::Object(serde_json::Map::new())
}

impl ToolRequest {
    /// Create a request.
    pub fn new(id: impl Into<Value>, tool: impl Into<String>, args: Value) -> Self {
        Self {
            id: id.into(),
            tool: tool.into(),
            args,
        }
    }
}

/// The host's answer to one input line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    /// The request id, or `null` if the line could not be parsed.
    pub id: Value,
    /// Whether the tool ran.
    pub ok: bool,
    /// Tool output text when `ok`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Protocol error when not `ok`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Tool schemas, only in answer to [`LIST_TOOLS`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
}

impl ToolResponse {
    /// A tool ran and produced `text`.
    pub fn ok(id: Value, text: impl Into<String>) -> Self {
        Self {
            id,
            ok: true,
            text: Some(text.into()),
            error: None,
            tools: None,
        }
    }

    /// The line was rejected before any tool ran.
    pub fn error(id: Value, error: impl Into<String>) -> Self {
        Self {
            id,
            ok: false,
            text: None,
            error: Some(error.into()),
            tools: None,
        }
    }

    /// The registered tools, each with `name`, `description` and `parameters`.
    pub fn tools(id: Value, schemas: Vec<Value>) -> Self {
        Self {
            id,
            ok: true,
            text: None,
            error: None,
            tools: Some(schemas),
        }
    }
}
