//! Client-side stream reducer.
//!
//! A [`Reducer`] folds the events of one thread into the conversation it
//! describes: finished messages, tool calls, thinking traces and the
//! application state.
//!
//! Every message and tool call key moves through `Absent → Open → Closed`.
//! An event that does not fit that machine, or any other protocol rule, is
//! rejected as a [`ProtocolViolation`]: it is logged, recorded, and leaves
//! the accumulators exactly as they were.
//!
//! Chunk events open their key implicitly. The key stays open for further
//! chunks carrying the same id or no id, and closes when a chunk for another
//! key or any other event arrives. A lone chunk followed by anything else is
//! therefore the same as start, content and end.
//!
//! # Example
//!
//! ```rust
//! use agui_client::Reducer;
//! use agui_core::*;
//!
//! let events: Vec<Event> = vec![
//!     RunStartedEvent::new("t1", "r1").into(),
//!     TextMessageStartEvent::new("m1").into(),
//!     TextMessageContentEvent::new("m1", "Hi there").unwrap().into(),
//!     TextMessageEndEvent::new("m1").into(),
//!     RunFinishedEvent::new("t1", "r1").into(),
//! ];
//!
//! let reducer = Reducer::from_events(&events);
//! assert_eq!(reducer.messages(), &[Message::assistant("m1", "Hi there")]);
//! assert!(reducer.violations().is_empty());
//! ```

use std::collections::{HashMap, HashSet};

use agui_core::patch::apply_delta;
use agui_core::{
    Event, EventType, FunctionCall, JsonValue, Message, MessageId, Role, RunErrorEvent, RunId,
    ThreadId, ToolCall, ToolCallId,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// An event the reducer refused to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{event_type}: {reason}")]
pub struct ProtocolViolation {
    /// Type of the rejected event.
    pub event_type: EventType,
    /// Why it was rejected.
    pub reason: String,
}

/// Where the current run stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// No run seen yet.
    #[default]
    Idle,
    /// Between `RUN_STARTED` and a terminal event.
    Running,
    /// Ended with `RUN_FINISHED`.
    Finished,
    /// Ended with `RUN_ERROR`.
    Errored,
}

#[derive(Debug, Clone)]
struct TextBuffer {
    role: Role,
    content: String,
}

#[derive(Debug, Clone)]
struct ToolCallBuffer {
    name: String,
    parent_message_id: Option<MessageId>,
    arguments: String,
}

/// Rebuilds one thread from its events.
#[derive(Debug, Clone, Default)]
pub struct Reducer {
    messages: Vec<Message>,
    state: Option<JsonValue>,
    tool_calls: Vec<ToolCall>,
    thinking: Vec<String>,

    open_messages: HashMap<MessageId, TextBuffer>,
    closed_messages: HashSet<MessageId>,
    open_tool_calls: HashMap<ToolCallId, ToolCallBuffer>,
    closed_tool_calls: HashSet<ToolCallId>,
    text_chunk: Option<MessageId>,
    tool_chunk: Option<ToolCallId>,
    open_thinking: Option<String>,

    thread_id: Option<ThreadId>,
    run_id: Option<RunId>,
    status: RunStatus,
    finished_runs: HashSet<RunId>,
    result: Option<JsonValue>,
    run_error: Option<RunErrorEvent>,

    violations: Vec<ProtocolViolation>,
}

impl Reducer {
    /// Creates an empty reducer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a complete stream into a fresh reducer, recording any
    /// violations. A trailing chunk is closed once the events run out.
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a Event>) -> Self {
        let mut reducer = Self::new();
        for event in events {
            let _ = reducer.apply(event);
        }
        reducer.end_chunks();
        reducer
    }

    /// Applies one event.
    ///
    /// A rejected event is logged and recorded in [`Reducer::violations`],
    /// and the accumulators are left untouched.
    pub fn apply(&mut self, event: &Event) -> Result<(), ProtocolViolation> {
        // Ending a chunk stream mutates before the event itself is checked.
        let checkpoint = self.ends_chunk(event).then(|| self.clone());
        match self.reduce(event) {
            Ok(()) => Ok(()),
            Err(reason) => {
                if let Some(checkpoint) = checkpoint {
                    *self = checkpoint;
                }
                let violation = ProtocolViolation {
                    event_type: event.event_type(),
                    reason,
                };
                warn!(
                    event_type = %violation.event_type,
                    reason = %violation.reason,
                    "protocol violation, event ignored"
                );
                self.violations.push(violation.clone());
                Err(violation)
            }
        }
    }

    /// Finished messages, in completion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Current state, `None` until the first snapshot.
    pub fn state(&self) -> Option<&JsonValue> {
        self.state.as_ref()
    }

    /// Completed tool calls, in completion order.
    pub fn tool_calls(&self) -> &[ToolCall] {
        &self.tool_calls
    }

    /// Completed thinking traces. Never part of [`Reducer::messages`].
    pub fn thinking(&self) -> &[String] {
        &self.thinking
    }

    /// Rejected events, oldest first.
    pub fn violations(&self) -> &[ProtocolViolation] {
        &self.violations
    }

    /// Status of the current run.
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Thread named by the last run lifecycle event.
    pub fn thread_id(&self) -> Option<&ThreadId> {
        self.thread_id.as_ref()
    }

    /// Run named by the last run lifecycle event.
    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    /// `result` of the last `RUN_FINISHED`.
    pub fn result(&self) -> Option<&JsonValue> {
        self.result.as_ref()
    }

    /// The `RUN_ERROR` that ended the current run, if any.
    pub fn run_error(&self) -> Option<&RunErrorEvent> {
        self.run_error.as_ref()
    }

    /// True while a message with this id is open.
    pub fn is_message_open(&self, id: &MessageId) -> bool {
        self.open_messages.contains_key(id)
    }

    /// True while a tool call with this id is open.
    pub fn is_tool_call_open(&self, id: &ToolCallId) -> bool {
        self.open_tool_calls.contains_key(id)
    }

    /// Closes any message or tool call opened by chunks, as if the stream
    /// had moved on. Call at end of stream to keep a trailing chunk.
    pub fn end_chunks(&mut self) {
        self.end_text_chunk();
        self.end_tool_chunk();
    }

    /// True after a terminal event, until the next run starts.
    pub fn is_terminated(&self) -> bool {
        matches!(self.status, RunStatus::Finished | RunStatus::Errored)
    }

    fn reduce(&mut self, event: &Event) -> Result<(), String> {
        event.validate().map_err(|e| e.to_string())?;

        if self.is_terminated() && !matches!(event, Event::RunStarted(_)) {
            return Err("run already terminated".to_string());
        }

        if !self.keeps_text_chunk(event) {
            self.end_text_chunk();
        }
        if !self.keeps_tool_chunk(event) {
            self.end_tool_chunk();
        }

        match event {
            Event::RunStarted(e) => {
                if self.finished_runs.contains(&e.run_id) {
                    return Err(format!("run {} already finished", e.run_id));
                }
                if !self.open_messages.is_empty() || !self.open_tool_calls.is_empty() {
                    debug!(run_id = %e.run_id, "discarding buffers left open by the previous run");
                }
                self.open_messages.clear();
                self.open_tool_calls.clear();
                self.text_chunk = None;
                self.tool_chunk = None;
                self.open_thinking = None;
                self.result = None;
                self.run_error = None;
                self.thread_id = Some(e.thread_id.clone());
                self.run_id = Some(e.run_id.clone());
                self.status = RunStatus::Running;
            }
            Event::RunFinished(e) => {
                if self.status == RunStatus::Running {
                    if let Some(active) = self.run_id.as_ref().filter(|active| **active != e.run_id) {
                        return Err(format!("run {} is not the active run {active}", e.run_id));
                    }
                }
                self.finished_runs.insert(e.run_id.clone());
                self.thread_id = Some(e.thread_id.clone());
                self.run_id = Some(e.run_id.clone());
                self.result = e.result.clone();
                self.status = RunStatus::Finished;
            }
            Event::RunError(e) => {
                if let Some(run) = &self.run_id {
                    self.finished_runs.insert(run.clone());
                }
                self.run_error = Some(e.clone());
                self.status = RunStatus::Errored;
            }

            Event::TextMessageStart(e) => {
                self.check_message_absent(&e.message_id)?;
                self.open_messages.insert(
                    e.message_id.clone(),
                    TextBuffer {
                        role: e.role,
                        content: String::new(),
                    },
                );
            }
            Event::TextMessageContent(e) => {
                let reason = self.message_not_open(&e.message_id);
                let buffer = self.open_messages.get_mut(&e.message_id).ok_or(reason)?;
                buffer.content.push_str(&e.delta);
            }
            Event::TextMessageEnd(e) => {
                let reason = self.message_not_open(&e.message_id);
                let buffer = self.open_messages.remove(&e.message_id).ok_or(reason)?;
                self.close_message(e.message_id.clone(), buffer);
            }
            Event::TextMessageChunk(e) => {
                let id = e
                    .message_id
                    .clone()
                    .or_else(|| self.text_chunk.clone())
                    .ok_or_else(|| "text chunk has no message id and no chunk is open".to_string())?;

                if self.text_chunk.as_ref() != Some(&id) {
                    self.end_text_chunk();
                    // A chunk may also feed a message opened by TEXT_MESSAGE_START.
                    if !self.open_messages.contains_key(&id) {
                        self.check_message_absent(&id)?;
                        self.open_messages.insert(
                            id.clone(),
                            TextBuffer {
                                role: e.role.unwrap_or(Role::Assistant),
                                content: String::new(),
                            },
                        );
                        self.text_chunk = Some(id.clone());
                    }
                }
                if let (Some(buffer), Some(delta)) = (self.open_messages.get_mut(&id), &e.delta) {
                    buffer.content.push_str(delta);
                }
            }

            Event::ToolCallStart(e) => {
                self.check_tool_call_absent(&e.tool_call_id)?;
                self.open_tool_calls.insert(
                    e.tool_call_id.clone(),
                    ToolCallBuffer {
                        name: e.tool_call_name.clone(),
                        parent_message_id: e.parent_message_id.clone(),
                        arguments: String::new(),
                    },
                );
            }
            Event::ToolCallArgs(e) => {
                let reason = self.tool_call_not_open(&e.tool_call_id);
                let buffer = self.open_tool_calls.get_mut(&e.tool_call_id).ok_or(reason)?;
                buffer.arguments.push_str(&e.delta);
            }
            Event::ToolCallEnd(e) => {
                let reason = self.tool_call_not_open(&e.tool_call_id);
                let buffer = self.open_tool_calls.remove(&e.tool_call_id).ok_or(reason)?;
                self.close_tool_call(e.tool_call_id.clone(), buffer);
            }
            Event::ToolCallChunk(e) => {
                let id = e
                    .tool_call_id
                    .clone()
                    .or_else(|| self.tool_chunk.clone())
                    .ok_or_else(|| "tool call chunk has no tool call id and no chunk is open".to_string())?;

                if self.tool_chunk.as_ref() != Some(&id) {
                    if !self.open_tool_calls.contains_key(&id) {
                        self.check_tool_call_absent(&id)?;
                        let name = e
                            .tool_call_name
                            .clone()
                            .ok_or_else(|| format!("first chunk of tool call {id} has no tool name"))?;
                        self.end_tool_chunk();
                        self.open_tool_calls.insert(
                            id.clone(),
                            ToolCallBuffer {
                                name,
                                parent_message_id: e.parent_message_id.clone(),
                                arguments: String::new(),
                            },
                        );
                        self.tool_chunk = Some(id.clone());
                    } else {
                        self.end_tool_chunk();
                    }
                }
                if let (Some(buffer), Some(delta)) = (self.open_tool_calls.get_mut(&id), &e.delta) {
                    buffer.arguments.push_str(delta);
                }
            }
            Event::ToolCallResult(e) => {
                self.messages.push(Message::tool(
                    e.message_id.clone(),
                    e.tool_call_id.clone(),
                    e.content.clone(),
                ));
            }

            Event::ThinkingTextMessageStart(_) => {
                if self.open_thinking.is_some() {
                    return Err("thinking text already open".to_string());
                }
                self.open_thinking = Some(String::new());
            }
            Event::ThinkingTextMessageContent(e) => {
                self.open_thinking
                    .as_mut()
                    .ok_or_else(|| "thinking text is not open".to_string())?
                    .push_str(&e.delta);
            }
            Event::ThinkingTextMessageEnd(_) => {
                let trace = self
                    .open_thinking
                    .take()
                    .ok_or_else(|| "thinking text is not open".to_string())?;
                self.thinking.push(trace);
            }

            Event::StateSnapshot(e) => self.state = Some(e.snapshot.clone()),
            Event::StateDelta(e) => {
                let current = self
                    .state
                    .as_ref()
                    .ok_or_else(|| "state delta before any snapshot".to_string())?;
                let next = apply_delta(current, &e.delta).map_err(|err| err.to_string())?;
                self.state = Some(next);
            }
            Event::MessagesSnapshot(e) => self.messages = e.messages.clone(),

            Event::ThinkingStart(_)
            | Event::ThinkingEnd(_)
            | Event::StepStarted(_)
            | Event::StepFinished(_)
            | Event::Raw(_)
            | Event::Custom(_) => {
                debug!(event_type = %event.event_type(), "informational event");
            }
        }
        Ok(())
    }

    /// True when `event` leaves the chunk-opened message open.
    fn keeps_text_chunk(&self, event: &Event) -> bool {
        let Some(open) = &self.text_chunk else {
            return true;
        };
        match event {
            // A new run discards open buffers instead.
            Event::TextMessageChunk(_) | Event::RunStarted(_) => true,
            Event::TextMessageContent(e) => e.message_id == *open,
            Event::TextMessageEnd(e) => e.message_id == *open,
            _ => false,
        }
    }

    /// True when `event` leaves the chunk-opened tool call open.
    fn keeps_tool_chunk(&self, event: &Event) -> bool {
        let Some(open) = &self.tool_chunk else {
            return true;
        };
        match event {
            Event::ToolCallChunk(_) | Event::RunStarted(_) => true,
            Event::ToolCallArgs(e) => e.tool_call_id == *open,
            Event::ToolCallEnd(e) => e.tool_call_id == *open,
            _ => false,
        }
    }

    /// True when applying `event` closes a chunk-opened key.
    fn ends_chunk(&self, event: &Event) -> bool {
        let switches = match event {
            Event::TextMessageChunk(e) => {
                self.text_chunk.is_some() && e.message_id.is_some() && e.message_id != self.text_chunk
            }
            Event::ToolCallChunk(e) => {
                self.tool_chunk.is_some() && e.tool_call_id.is_some() && e.tool_call_id != self.tool_chunk
            }
            _ => false,
        };
        switches || !self.keeps_text_chunk(event) || !self.keeps_tool_chunk(event)
    }

    fn end_text_chunk(&mut self) {
        if let Some(id) = self.text_chunk.take()
            && let Some(buffer) = self.open_messages.remove(&id)
        {
            self.close_message(id, buffer);
        }
    }

    fn end_tool_chunk(&mut self) {
        if let Some(id) = self.tool_chunk.take()
            && let Some(buffer) = self.open_tool_calls.remove(&id)
        {
            self.close_tool_call(id, buffer);
        }
    }

    fn check_message_absent(&self, id: &MessageId) -> Result<(), String> {
        if self.open_messages.contains_key(id) {
            return Err(format!("message {id} already open"));
        }
        if self.closed_messages.contains(id) {
            return Err(format!("message {id} already closed"));
        }
        Ok(())
    }

    fn message_not_open(&self, id: &MessageId) -> String {
        if self.closed_messages.contains(id) {
            format!("message {id} already closed")
        } else {
            format!("message {id} was never started")
        }
    }

    fn check_tool_call_absent(&self, id: &ToolCallId) -> Result<(), String> {
        if self.open_tool_calls.contains_key(id) {
            return Err(format!("tool call {id} already open"));
        }
        if self.closed_tool_calls.contains(id) {
            return Err(format!("tool call {id} already closed"));
        }
        Ok(())
    }

    fn tool_call_not_open(&self, id: &ToolCallId) -> String {
        if self.closed_tool_calls.contains(id) {
            format!("tool call {id} already closed")
        } else {
            format!("tool call {id} was never started")
        }
    }

    fn close_message(&mut self, id: MessageId, buffer: TextBuffer) {
        if self.text_chunk.as_ref() == Some(&id) {
            self.text_chunk = None;
        }
        self.closed_messages.insert(id.clone());
        // Tool is the one role Message::text refuses; validation keeps it out.
        if let Some(message) = Message::text(buffer.role, id, buffer.content) {
            self.messages.push(message);
        }
    }

    fn close_tool_call(&mut self, id: ToolCallId, buffer: ToolCallBuffer) {
        if self.tool_chunk.as_ref() == Some(&id) {
            self.tool_chunk = None;
        }
        self.closed_tool_calls.insert(id.clone());
        let call = ToolCall::new(
            id.clone(),
            FunctionCall {
                name: buffer.name,
                arguments: buffer.arguments,
            },
        );
        self.tool_calls.push(call.clone());

        let parent = buffer.parent_message_id;
        let existing = match &parent {
            Some(pid) => self
                .messages
                .iter_mut()
                .rev()
                .find(|m| m.role() == Role::Assistant && m.id() == pid),
            None => None,
        };
        match existing.and_then(Message::tool_calls_mut) {
            Some(calls) => calls.push(call),
            None => {
                let message_id = parent.unwrap_or_else(|| MessageId::from(id.as_str()));
                self.messages
                    .push(Message::assistant_with_tool_calls(message_id, vec![call]));
            }
        }
    }
}
