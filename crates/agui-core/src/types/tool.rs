//! Tool types for the AG-UI protocol.
//!
//! Tool definitions travel inside `RunAgentInput`; tool calls are what a
//! client reconstructs from `TOOL_CALL_*` events.

use crate::types::ids::ToolCallId;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A generated function call from a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// The name of the function to call.
    pub name: String,
    /// The arguments to pass to the function (JSON-encoded string).
    pub arguments: String,
}

impl FunctionCall {
    /// Parses the argument string as JSON.
    pub fn parsed_arguments(&self) -> serde_json::Result<JsonValue> {
        serde_json::from_str(&self.arguments)
    }
}

/// A tool call made by an assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call.
    pub id: ToolCallId,
    /// The type of call (always "function").
    #[serde(rename = "type", default = "function_call_type")]
    pub call_type: String,
    /// The function being called with its arguments.
    pub function: FunctionCall,
}

fn function_call_type() -> String {
    "function".to_string()
}

impl ToolCall {
    /// Creates a new tool call with the given ID and function.
    pub fn new(id: impl Into<ToolCallId>, function: FunctionCall) -> Self {
        Self {
            id: id.into(),
            call_type: function_call_type(),
            function,
        }
    }
}

/// A tool definition describing a function the model can call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    /// The name of the tool.
    pub name: String,
    /// A description of what the tool does.
    pub description: String,
    /// JSON Schema describing the tool's parameters.
    pub parameters: JsonValue,
}

impl Tool {
    /// Creates a new tool definition.
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: JsonValue) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}
