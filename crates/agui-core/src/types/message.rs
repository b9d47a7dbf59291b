//! Message types for the AG-UI protocol.
//!
//! Messages are what a client ends up holding after folding an event stream:
//! the conversation transcript. They are role-discriminated on the wire
//! (`{"role": "assistant", ...}`).

use crate::types::ids::{MessageId, ToolCallId};
use crate::types::tool::ToolCall;
use serde::{Deserialize, Serialize};

/// Message role indicating the sender type.
///
/// This is a closed set. `TextMessageStart.role` reuses it with anything
/// but `tool`; `ToolCallResult.role` only ever carries `tool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Developer messages, typically for debugging.
    Developer,
    /// System messages, usually containing system prompts.
    System,
    /// Assistant messages from the AI model.
    Assistant,
    /// User messages from the human user.
    User,
    /// Tool messages containing tool/function call results.
    Tool,
}

impl Role {
    pub(crate) fn assistant() -> Self {
        Self::Assistant
    }

    pub(crate) fn tool() -> Self {
        Self::Tool
    }

    /// Returns the wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Developer => "developer",
            Role::System => "system",
            Role::Assistant => "assistant",
            Role::User => "user",
            Role::Tool => "tool",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A conversation message.
///
/// # Example
///
/// ```rust
/// use agui_core::{Message, Role};
///
/// let msg = Message::assistant("m1", "Hi there");
/// assert_eq!(msg.role(), Role::Assistant);
/// assert_eq!(msg.content(), Some("Hi there"));
///
/// let json = serde_json::to_value(&msg).unwrap();
/// assert_eq!(json["role"], "assistant");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    /// A developer message, not to be confused with a system message.
    Developer {
        id: MessageId,
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// A system message (usually the system prompt).
    System {
        id: MessageId,
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// An assistant message. Content is optional because a message may
    /// consist only of tool calls.
    Assistant {
        id: MessageId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(
            rename = "toolCalls",
            alias = "tool_calls",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        tool_calls: Option<Vec<ToolCall>>,
    },
    /// A user message.
    User {
        id: MessageId,
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// The serialized result of a tool call.
    Tool {
        id: MessageId,
        content: String,
        #[serde(rename = "toolCallId", alias = "tool_call_id")]
        tool_call_id: ToolCallId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl Message {
    /// Creates a developer message.
    pub fn developer(id: impl Into<MessageId>, content: impl Into<String>) -> Self {
        Self::Developer {
            id: id.into(),
            content: content.into(),
            name: None,
        }
    }

    /// Creates a system message.
    pub fn system(id: impl Into<MessageId>, content: impl Into<String>) -> Self {
        Self::System {
            id: id.into(),
            content: content.into(),
            name: None,
        }
    }

    /// Creates a user message.
    pub fn user(id: impl Into<MessageId>, content: impl Into<String>) -> Self {
        Self::User {
            id: id.into(),
            content: content.into(),
            name: None,
        }
    }

    /// Creates an assistant message with text content.
    pub fn assistant(id: impl Into<MessageId>, content: impl Into<String>) -> Self {
        Self::Assistant {
            id: id.into(),
            content: Some(content.into()),
            name: None,
            tool_calls: None,
        }
    }

    /// Creates an assistant message that only carries tool calls.
    pub fn assistant_with_tool_calls(id: impl Into<MessageId>, tool_calls: Vec<ToolCall>) -> Self {
        Self::Assistant {
            id: id.into(),
            content: None,
            name: None,
            tool_calls: Some(tool_calls),
        }
    }

    /// Creates a tool result message.
    pub fn tool(
        id: impl Into<MessageId>,
        tool_call_id: impl Into<ToolCallId>,
        content: impl Into<String>,
    ) -> Self {
        Self::Tool {
            id: id.into(),
            content: content.into(),
            tool_call_id: tool_call_id.into(),
            error: None,
        }
    }

    /// Creates a text message for any role except `tool`, which needs a
    /// tool call ID and yields `None`.
    pub fn text(role: Role, id: impl Into<MessageId>, content: impl Into<String>) -> Option<Self> {
        match role {
            Role::Developer => Some(Self::developer(id, content)),
            Role::System => Some(Self::system(id, content)),
            Role::Assistant => Some(Self::assistant(id, content)),
            Role::User => Some(Self::user(id, content)),
            Role::Tool => None,
        }
    }

    /// Creates a user message with a random ID.
    pub fn new_user(content: impl Into<String>) -> Self {
        Self::user(MessageId::random(), content)
    }

    /// Sets the sender name. Tool messages have no name and are returned unchanged.
    pub fn with_name(mut self, new_name: impl Into<String>) -> Self {
        match &mut self {
            Message::Developer { name, .. }
            | Message::System { name, .. }
            | Message::Assistant { name, .. }
            | Message::User { name, .. } => *name = Some(new_name.into()),
            Message::Tool { .. } => {}
        }
        self
    }

    /// Returns a reference to the message ID.
    pub fn id(&self) -> &MessageId {
        match self {
            Message::Developer { id, .. }
            | Message::System { id, .. }
            | Message::Assistant { id, .. }
            | Message::User { id, .. }
            | Message::Tool { id, .. } => id,
        }
    }

    /// Returns the role of this message.
    pub fn role(&self) -> Role {
        match self {
            Message::Developer { .. } => Role::Developer,
            Message::System { .. } => Role::System,
            Message::Assistant { .. } => Role::Assistant,
            Message::User { .. } => Role::User,
            Message::Tool { .. } => Role::Tool,
        }
    }

    /// Returns the text content of this message, if any.
    pub fn content(&self) -> Option<&str> {
        match self {
            Message::Developer { content, .. }
            | Message::System { content, .. }
            | Message::User { content, .. }
            | Message::Tool { content, .. } => Some(content),
            Message::Assistant { content, .. } => content.as_deref(),
        }
    }

    /// Returns a mutable reference to the content, creating empty assistant
    /// content if there was none.
    pub fn content_mut(&mut self) -> &mut String {
        match self {
            Message::Developer { content, .. }
            | Message::System { content, .. }
            | Message::User { content, .. }
            | Message::Tool { content, .. } => content,
            Message::Assistant { content, .. } => content.get_or_insert_with(String::new),
        }
    }

    /// Returns the tool calls for this message, if any.
    pub fn tool_calls(&self) -> Option<&[ToolCall]> {
        match self {
            Message::Assistant { tool_calls, .. } => tool_calls.as_deref(),
            _ => None,
        }
    }

    /// Returns the tool call list of an assistant message, creating it if needed.
    pub fn tool_calls_mut(&mut self) -> Option<&mut Vec<ToolCall>> {
        match self {
            Message::Assistant { tool_calls, .. } => Some(tool_calls.get_or_insert_with(Vec::new)),
            _ => None,
        }
    }

    /// Returns the tool call ID a tool message answers.
    pub fn tool_call_id(&self) -> Option<&ToolCallId> {
        match self {
            Message::Tool { tool_call_id, .. } => Some(tool_call_id),
            _ => None,
        }
    }
}
