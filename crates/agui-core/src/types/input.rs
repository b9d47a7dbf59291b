//! Run input for AG-UI agents.
//!
//! `RunAgentInput` is the boundary object a request handler builds before it
//! invokes an agent. The core never interprets it beyond carrying the thread
//! and run identifiers into the stream.

use crate::types::ids::{RunId, ThreadId};
use crate::types::message::Message;
use crate::types::tool::Tool;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A piece of context handed to the agent alongside the conversation.
///
/// # Example
///
/// ```
/// use agui_core::Context;
///
/// let ctx = Context::new("current_page", "https://example.com/dashboard");
/// assert_eq!(ctx.description, "current_page");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// What this context represents.
    pub description: String,
    /// The context value.
    pub value: String,
}

impl Context {
    /// Creates a new context item.
    pub fn new(description: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            value: value.into(),
        }
    }
}

/// Input for running an agent.
///
/// Collections and `state` default to empty/null when absent so that a
/// minimal `{"threadId": "...", "runId": "..."}` body is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunAgentInput {
    /// The conversation thread.
    #[serde(rename = "threadId", alias = "thread_id")]
    pub thread_id: ThreadId,

    /// The run being started.
    #[serde(rename = "runId", alias = "run_id")]
    pub run_id: RunId,

    /// Parent run for nested or sub-agent runs.
    #[serde(
        rename = "parentRunId",
        alias = "parent_run_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_run_id: Option<RunId>,

    /// Current application state.
    #[serde(default)]
    pub state: JsonValue,

    /// Conversation so far.
    #[serde(default)]
    pub messages: Vec<Message>,

    /// Tools the agent may call.
    #[serde(default)]
    pub tools: Vec<Tool>,

    /// Extra context items.
    #[serde(default)]
    pub context: Vec<Context>,

    /// Properties forwarded untouched from the client.
    #[serde(rename = "forwardedProps", alias = "forwarded_props", default)]
    pub forwarded_props: JsonValue,
}

impl RunAgentInput {
    /// Creates an input with empty messages, tools and context and null state.
    pub fn new(thread_id: impl Into<ThreadId>, run_id: impl Into<RunId>) -> Self {
        Self {
            thread_id: thread_id.into(),
            run_id: run_id.into(),
            parent_run_id: None,
            state: JsonValue::Null,
            messages: Vec::new(),
            tools: Vec::new(),
            context: Vec::new(),
            forwarded_props: JsonValue::Null,
        }
    }

    /// Sets the parent run ID.
    pub fn with_parent_run_id(mut self, parent_id: impl Into<RunId>) -> Self {
        self.parent_run_id = Some(parent_id.into());
        self
    }

    /// Sets the state.
    pub fn with_state(mut self, state: JsonValue) -> Self {
        self.state = state;
        self
    }

    /// Sets the messages.
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    /// Sets the available tools.
    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = tools;
        self
    }

    /// Sets the context items.
    pub fn with_context(mut self, context: Vec<Context>) -> Self {
        self.context = context;
        self
    }

    /// Sets the forwarded props.
    pub fn with_forwarded_props(mut self, props: JsonValue) -> Self {
        self.forwarded_props = props;
        self
    }
}
