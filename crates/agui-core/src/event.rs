//! AG-UI Event Types
//!
//! This module defines the closed set of AG-UI protocol events:
//! - Text message events (start, content, end, chunk)
//! - Thinking text message events and thinking step markers
//! - Tool call events (start, args, end, chunk, result)
//! - State events (snapshot, delta) and messages snapshot
//! - Run lifecycle events (started, finished, error)
//! - Step events (started, finished)
//! - Custom and raw events
//!
//! Events are immutable once built. Constructors that can violate a protocol
//! invariant return `Result<_, EventValidationError>`; [`Event::validate`]
//! re-checks any instance, including ones produced by deserialization.

use crate::types::{Message, MessageId, Role, RunId, ThreadId, ToolCallId};
use crate::JsonValue;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Event types for the AG-UI protocol.
///
/// Serialized using SCREAMING_SNAKE_CASE (e.g., `TEXT_MESSAGE_START`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Start of a streamed text message.
    TextMessageStart,
    /// Content delta of a text message.
    TextMessageContent,
    /// End of a text message.
    TextMessageEnd,
    /// Self-contained text message fragment.
    TextMessageChunk,
    /// Start of a thinking text message.
    ThinkingTextMessageStart,
    /// Content delta of a thinking text message.
    ThinkingTextMessageContent,
    /// End of a thinking text message.
    ThinkingTextMessageEnd,
    /// Start of a tool call.
    ToolCallStart,
    /// Argument delta of a tool call.
    ToolCallArgs,
    /// End of a tool call.
    ToolCallEnd,
    /// Self-contained tool call fragment.
    ToolCallChunk,
    /// Result of a tool call.
    ToolCallResult,
    /// Start of a thinking step.
    ThinkingStart,
    /// End of a thinking step.
    ThinkingEnd,
    /// Complete state snapshot.
    StateSnapshot,
    /// Incremental state update (JSON Patch RFC 6902).
    StateDelta,
    /// Complete messages snapshot.
    MessagesSnapshot,
    /// Raw passthrough event.
    Raw,
    /// Custom application-specific event.
    Custom,
    /// Agent run has started.
    RunStarted,
    /// Agent run has finished.
    RunFinished,
    /// Agent run failed.
    RunError,
    /// A step within a run has started.
    StepStarted,
    /// A step within a run has finished.
    StepFinished,
}

impl EventType {
    /// Every event type, in declaration order.
    pub const ALL: [EventType; 24] = [
        EventType::TextMessageStart,
        EventType::TextMessageContent,
        EventType::TextMessageEnd,
        EventType::TextMessageChunk,
        EventType::ThinkingTextMessageStart,
        EventType::ThinkingTextMessageContent,
        EventType::ThinkingTextMessageEnd,
        EventType::ToolCallStart,
        EventType::ToolCallArgs,
        EventType::ToolCallEnd,
        EventType::ToolCallChunk,
        EventType::ToolCallResult,
        EventType::ThinkingStart,
        EventType::ThinkingEnd,
        EventType::StateSnapshot,
        EventType::StateDelta,
        EventType::MessagesSnapshot,
        EventType::Raw,
        EventType::Custom,
        EventType::RunStarted,
        EventType::RunFinished,
        EventType::RunError,
        EventType::StepStarted,
        EventType::StepFinished,
    ];

    /// Returns the wire string of the event type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::TextMessageStart => "TEXT_MESSAGE_START",
            EventType::TextMessageContent => "TEXT_MESSAGE_CONTENT",
            EventType::TextMessageEnd => "TEXT_MESSAGE_END",
            EventType::TextMessageChunk => "TEXT_MESSAGE_CHUNK",
            EventType::ThinkingTextMessageStart => "THINKING_TEXT_MESSAGE_START",
            EventType::ThinkingTextMessageContent => "THINKING_TEXT_MESSAGE_CONTENT",
            EventType::ThinkingTextMessageEnd => "THINKING_TEXT_MESSAGE_END",
            EventType::ToolCallStart => "TOOL_CALL_START",
            EventType::ToolCallArgs => "TOOL_CALL_ARGS",
            EventType::ToolCallEnd => "TOOL_CALL_END",
            EventType::ToolCallChunk => "TOOL_CALL_CHUNK",
            EventType::ToolCallResult => "TOOL_CALL_RESULT",
            EventType::ThinkingStart => "THINKING_START",
            EventType::ThinkingEnd => "THINKING_END",
            EventType::StateSnapshot => "STATE_SNAPSHOT",
            EventType::StateDelta => "STATE_DELTA",
            EventType::MessagesSnapshot => "MESSAGES_SNAPSHOT",
            EventType::Raw => "RAW",
            EventType::Custom => "CUSTOM",
            EventType::RunStarted => "RUN_STARTED",
            EventType::RunFinished => "RUN_FINISHED",
            EventType::RunError => "RUN_ERROR",
            EventType::StepStarted => "STEP_STARTED",
            EventType::StepFinished => "STEP_FINISHED",
        }
    }

    /// Wire names (camelCase) of the fields an event of this type must carry.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            EventType::TextMessageStart | EventType::TextMessageEnd => &["messageId"],
            EventType::TextMessageContent => &["messageId", "delta"],
            EventType::ThinkingTextMessageContent => &["delta"],
            EventType::ToolCallStart => &["toolCallId", "toolCallName"],
            EventType::ToolCallArgs => &["toolCallId", "delta"],
            EventType::ToolCallEnd => &["toolCallId"],
            EventType::ToolCallResult => &["messageId", "toolCallId", "content"],
            EventType::StateSnapshot => &["snapshot"],
            EventType::StateDelta => &["delta"],
            EventType::MessagesSnapshot => &["messages"],
            EventType::Raw => &["event"],
            EventType::Custom => &["name", "value"],
            EventType::RunStarted | EventType::RunFinished => &["threadId", "runId"],
            EventType::RunError => &["message"],
            EventType::StepStarted | EventType::StepFinished => &["stepName"],
            EventType::TextMessageChunk
            | EventType::ThinkingTextMessageStart
            | EventType::ThinkingTextMessageEnd
            | EventType::ToolCallChunk
            | EventType::ThinkingStart
            | EventType::ThinkingEnd => &[],
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventType {
    type Err = EventValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| EventValidationError::UnknownEventType(s.to_string()))
    }
}

/// Fields shared by every event.
///
/// # Example
///
/// ```rust
/// use agui_core::event::BaseEvent;
///
/// let base = BaseEvent::new().timestamp(1706123456789);
/// assert_eq!(base.timestamp, Some(1706123456789));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BaseEvent {
    /// Unix timestamp in milliseconds. Advisory only, implies no ordering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// Provider payload kept for debugging. Never interpreted.
    #[serde(
        rename = "rawEvent",
        alias = "raw_event",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub raw_event: Option<JsonValue>,
}

impl BaseEvent {
    /// Creates a new empty BaseEvent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a BaseEvent stamped with the current time.
    pub fn with_current_timestamp() -> Self {
        Self {
            timestamp: Some(now_millis()),
            raw_event: None,
        }
    }

    /// Sets the timestamp.
    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the raw event.
    pub fn raw_event(mut self, raw_event: JsonValue) -> Self {
        self.raw_event = Some(raw_event);
        self
    }
}

/// Maps a field that is present on the wire to `Some`, even when it is
/// `null`. Absent fields fall back to `None` through `#[serde(default)]`.
fn present<'de, D>(deserializer: D) -> Result<Option<JsonValue>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    JsonValue::deserialize(deserializer).map(Some)
}

/// Milliseconds since the Unix epoch, or 0 if the clock is before it.
pub fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Validation errors raised when an event violates a protocol invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventValidationError {
    /// Delta content must not be empty.
    #[error("Delta must not be an empty string")]
    EmptyDelta,
    /// Event format is invalid.
    #[error("Invalid event format: {0}")]
    InvalidFormat(String),
    /// Required field is missing.
    #[error("Missing required field: {0}")]
    MissingField(String),
    /// The `type` discriminator does not match the requested variant.
    #[error("Event type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Expected event type.
        expected: String,
        /// Actual event type.
        actual: String,
    },
    /// The `type` discriminator is not part of the protocol.
    #[error("Unknown event type: {0}")]
    UnknownEventType(String),
}

/// A concrete event struct with a pinned discriminator.
pub trait TypedEvent: Clone + Serialize + DeserializeOwned + Into<Event> {
    /// The discriminator every instance of this struct carries.
    const EVENT_TYPE: EventType;
}

/// Implements the builder methods and conversions every event struct shares.
macro_rules! event_struct {
    ($($ty:ident => $variant:ident),+ $(,)?) => {
        $(
            impl TypedEvent for $ty {
                const EVENT_TYPE: EventType = EventType::$variant;
            }

            impl From<$ty> for Event {
                fn from(event: $ty) -> Self {
                    Event::$variant(event)
                }
            }

            impl $ty {
                /// Sets the timestamp for this event.
                pub fn with_timestamp(mut self, timestamp: i64) -> Self {
                    self.base.timestamp = Some(timestamp);
                    self
                }

                /// Sets the raw event for this event.
                pub fn with_raw_event(mut self, raw_event: JsonValue) -> Self {
                    self.base.raw_event = Some(raw_event);
                    self
                }
            }
        )+
    };
}

fn check_delta(delta: &str) -> Result<(), EventValidationError> {
    if delta.is_empty() {
        return Err(EventValidationError::EmptyDelta);
    }
    Ok(())
}

fn check_text_role(role: Role) -> Result<(), EventValidationError> {
    if role == Role::Tool {
        return Err(EventValidationError::InvalidFormat(
            "text message role must not be tool".to_string(),
        ));
    }
    Ok(())
}

// =============================================================================
// Text Message Events
// =============================================================================

/// Opens a streamed text message.
///
/// `message_id` is the join key for the content and end events that follow.
///
/// ```rust
/// use agui_core::{Role, TextMessageStartEvent};
///
/// let event = TextMessageStartEvent::new("m1");
/// assert_eq!(event.role, Role::Assistant);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMessageStartEvent {
    /// Common event fields (timestamp, rawEvent).
    #[serde(flatten)]
    pub base: BaseEvent,
    /// Unique identifier for this message.
    #[serde(rename = "messageId", alias = "message_id")]
    pub message_id: MessageId,
    /// The sender role. Anything but `tool`; defaults to assistant.
    #[serde(default = "Role::assistant")]
    pub role: Role,
}

impl TextMessageStartEvent {
    /// Creates an assistant text message start.
    pub fn new(message_id: impl Into<MessageId>) -> Self {
        Self {
            base: BaseEvent::default(),
            message_id: message_id.into(),
            role: Role::Assistant,
        }
    }

    /// Creates a start event for another text role.
    pub fn with_role(
        message_id: impl Into<MessageId>,
        role: Role,
    ) -> Result<Self, EventValidationError> {
        check_text_role(role)?;
        Ok(Self {
            base: BaseEvent::default(),
            message_id: message_id.into(),
            role,
        })
    }

    /// Validates this event's data.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        check_text_role(self.role)
    }
}

/// A piece of text message content.
///
/// # Validation
///
/// The delta must not be empty. `new()` enforces this; `new_unchecked()`
/// skips the check for callers that already validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMessageContentEvent {
    /// Common event fields (timestamp, rawEvent).
    #[serde(flatten)]
    pub base: BaseEvent,
    /// The message this content belongs to.
    #[serde(rename = "messageId", alias = "message_id")]
    pub message_id: MessageId,
    /// The text to append.
    pub delta: String,
}

impl TextMessageContentEvent {
    /// Creates a content event, rejecting an empty delta.
    pub fn new(
        message_id: impl Into<MessageId>,
        delta: impl Into<String>,
    ) -> Result<Self, EventValidationError> {
        let event = Self::new_unchecked(message_id, delta);
        event.validate()?;
        Ok(event)
    }

    /// Creates a content event without validation.
    pub fn new_unchecked(message_id: impl Into<MessageId>, delta: impl Into<String>) -> Self {
        Self {
            base: BaseEvent::default(),
            message_id: message_id.into(),
            delta: delta.into(),
        }
    }

    /// Validates this event's data.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        check_delta(&self.delta)
    }
}

/// Closes a text message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMessageEndEvent {
    /// Common event fields (timestamp, rawEvent).
    #[serde(flatten)]
    pub base: BaseEvent,
    /// The message being closed.
    #[serde(rename = "messageId", alias = "message_id")]
    pub message_id: MessageId,
}

impl TextMessageEndEvent {
    /// Creates a new TextMessageEndEvent.
    pub fn new(message_id: impl Into<MessageId>) -> Self {
        Self {
            base: BaseEvent::default(),
            message_id: message_id.into(),
        }
    }
}

/// A self-contained text message fragment.
///
/// All fields are optional. A chunk carrying an unseen `message_id` is an
/// implicit start; one carrying an id and a delta is equivalent to
/// start + content + end.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextMessageChunkEvent {
    /// Common event fields (timestamp, rawEvent).
    #[serde(flatten)]
    pub base: BaseEvent,
    /// Message the chunk belongs to.
    #[serde(
        rename = "messageId",
        alias = "message_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub message_id: Option<MessageId>,
    /// Sender role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Text to append.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
}

impl TextMessageChunkEvent {
    /// Creates an empty chunk.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the message ID.
    pub fn with_message_id(mut self, message_id: impl Into<MessageId>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    /// Sets the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Sets the delta.
    pub fn with_delta(mut self, delta: impl Into<String>) -> Self {
        self.delta = Some(delta.into());
        self
    }

    /// Validates this event's data.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        match self.role {
            Some(role) => check_text_role(role),
            None => Ok(()),
        }
    }
}

// =============================================================================
// Thinking Text Message Events
// =============================================================================

/// Opens a thinking text message (internal reasoning trace).
///
/// Thinking text carries no id; at most one is open at a time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThinkingTextMessageStartEvent {
    /// Common event fields (timestamp, rawEvent).
    #[serde(flatten)]
    pub base: BaseEvent,
}

impl ThinkingTextMessageStartEvent {
    /// Creates a new ThinkingTextMessageStartEvent.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A piece of thinking text. The delta must not be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThinkingTextMessageContentEvent {
    /// Common event fields (timestamp, rawEvent).
    #[serde(flatten)]
    pub base: BaseEvent,
    /// The reasoning text to append.
    pub delta: String,
}

impl ThinkingTextMessageContentEvent {
    /// Creates a thinking content event, rejecting an empty delta.
    pub fn new(delta: impl Into<String>) -> Result<Self, EventValidationError> {
        let event = Self::new_unchecked(delta);
        event.validate()?;
        Ok(event)
    }

    /// Creates a thinking content event without validation.
    pub fn new_unchecked(delta: impl Into<String>) -> Self {
        Self {
            base: BaseEvent::default(),
            delta: delta.into(),
        }
    }

    /// Validates this event's data.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        check_delta(&self.delta)
    }
}

/// Closes the open thinking text message.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThinkingTextMessageEndEvent {
    /// Common event fields (timestamp, rawEvent).
    #[serde(flatten)]
    pub base: BaseEvent,
}

impl ThinkingTextMessageEndEvent {
    /// Creates a new ThinkingTextMessageEndEvent.
    pub fn new() -> Self {
        Self::default()
    }
}

// =============================================================================
// Tool Call Events
// =============================================================================

/// Opens a tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallStartEvent {
    /// Common event fields (timestamp, rawEvent).
    #[serde(flatten)]
    pub base: BaseEvent,
    /// Join key for args and end events.
    #[serde(rename = "toolCallId", alias = "tool_call_id")]
    pub tool_call_id: ToolCallId,
    /// Name of the tool being called.
    #[serde(rename = "toolCallName", alias = "tool_call_name")]
    pub tool_call_name: String,
    /// Assistant message the call belongs to.
    #[serde(
        rename = "parentMessageId",
        alias = "parent_message_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_message_id: Option<MessageId>,
}

impl ToolCallStartEvent {
    /// Creates a new ToolCallStartEvent.
    pub fn new(tool_call_id: impl Into<ToolCallId>, tool_call_name: impl Into<String>) -> Self {
        Self {
            base: BaseEvent::default(),
            tool_call_id: tool_call_id.into(),
            tool_call_name: tool_call_name.into(),
            parent_message_id: None,
        }
    }

    /// Sets the parent message ID.
    pub fn with_parent_message_id(mut self, message_id: impl Into<MessageId>) -> Self {
        self.parent_message_id = Some(message_id.into());
        self
    }
}

/// A fragment of tool call arguments.
///
/// Concatenating every delta for a call yields the argument JSON text. A
/// single fragment is rarely valid JSON on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallArgsEvent {
    /// Common event fields (timestamp, rawEvent).
    #[serde(flatten)]
    pub base: BaseEvent,
    /// The tool call this fragment belongs to.
    #[serde(rename = "toolCallId", alias = "tool_call_id")]
    pub tool_call_id: ToolCallId,
    /// The argument text to append.
    pub delta: String,
}

impl ToolCallArgsEvent {
    /// Creates a new ToolCallArgsEvent.
    pub fn new(tool_call_id: impl Into<ToolCallId>, delta: impl Into<String>) -> Self {
        Self {
            base: BaseEvent::default(),
            tool_call_id: tool_call_id.into(),
            delta: delta.into(),
        }
    }
}

/// Closes a tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallEndEvent {
    /// Common event fields (timestamp, rawEvent).
    #[serde(flatten)]
    pub base: BaseEvent,
    /// The tool call being closed.
    #[serde(rename = "toolCallId", alias = "tool_call_id")]
    pub tool_call_id: ToolCallId,
}

impl ToolCallEndEvent {
    /// Creates a new ToolCallEndEvent.
    pub fn new(tool_call_id: impl Into<ToolCallId>) -> Self {
        Self {
            base: BaseEvent::default(),
            tool_call_id: tool_call_id.into(),
        }
    }
}

/// A self-contained tool call fragment, every field optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ToolCallChunkEvent {
    /// Common event fields (timestamp, rawEvent).
    #[serde(flatten)]
    pub base: BaseEvent,
    /// Tool call the chunk belongs to.
    #[serde(
        rename = "toolCallId",
        alias = "tool_call_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub tool_call_id: Option<ToolCallId>,
    /// Tool name, normally present on the first chunk of a call.
    #[serde(
        rename = "toolCallName",
        alias = "tool_call_name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub tool_call_name: Option<String>,
    /// Assistant message the call belongs to.
    #[serde(
        rename = "parentMessageId",
        alias = "parent_message_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_message_id: Option<MessageId>,
    /// Argument text to append.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
}

impl ToolCallChunkEvent {
    /// Creates an empty chunk.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tool call ID.
    pub fn with_tool_call_id(mut self, tool_call_id: impl Into<ToolCallId>) -> Self {
        self.tool_call_id = Some(tool_call_id.into());
        self
    }

    /// Sets the tool call name.
    pub fn with_tool_call_name(mut self, name: impl Into<String>) -> Self {
        self.tool_call_name = Some(name.into());
        self
    }

    /// Sets the parent message ID.
    pub fn with_parent_message_id(mut self, message_id: impl Into<MessageId>) -> Self {
        self.parent_message_id = Some(message_id.into());
        self
    }

    /// Sets the delta.
    pub fn with_delta(mut self, delta: impl Into<String>) -> Self {
        self.delta = Some(delta.into());
        self
    }
}

/// The return value of a tool, delivered as a follow-up tool message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallResultEvent {
    /// Common event fields (timestamp, rawEvent).
    #[serde(flatten)]
    pub base: BaseEvent,
    /// ID of the tool message that carries the result.
    #[serde(rename = "messageId", alias = "message_id")]
    pub message_id: MessageId,
    /// The tool call being answered.
    #[serde(rename = "toolCallId", alias = "tool_call_id")]
    pub tool_call_id: ToolCallId,
    /// Serialized result.
    pub content: String,
    /// Always `tool` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl ToolCallResultEvent {
    /// Creates a new ToolCallResultEvent.
    pub fn new(
        message_id: impl Into<MessageId>,
        tool_call_id: impl Into<ToolCallId>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            base: BaseEvent::default(),
            message_id: message_id.into(),
            tool_call_id: tool_call_id.into(),
            content: content.into(),
            role: Some(Role::tool()),
        }
    }

    /// Validates this event's data.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        match self.role {
            Some(Role::Tool) | None => Ok(()),
            Some(other) => Err(EventValidationError::InvalidFormat(format!(
                "tool call result role must be tool, got {other}"
            ))),
        }
    }
}

// =============================================================================
// Thinking Step Events
// =============================================================================

/// Marks the start of a thinking step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThinkingStartEvent {
    /// Common event fields (timestamp, rawEvent).
    #[serde(flatten)]
    pub base: BaseEvent,
    /// Optional human readable title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ThinkingStartEvent {
    /// Creates a new ThinkingStartEvent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Marks the end of a thinking step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThinkingEndEvent {
    /// Common event fields (timestamp, rawEvent).
    #[serde(flatten)]
    pub base: BaseEvent,
}

impl ThinkingEndEvent {
    /// Creates a new ThinkingEndEvent.
    pub fn new() -> Self {
        Self::default()
    }
}

// =============================================================================
// State Events
// =============================================================================

/// The complete application state. Replaces whatever the client held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshotEvent {
    /// Common event fields (timestamp, rawEvent).
    #[serde(flatten)]
    pub base: BaseEvent,
    /// The full state.
    pub snapshot: JsonValue,
}

impl StateSnapshotEvent {
    /// Creates a new StateSnapshotEvent.
    pub fn new(snapshot: JsonValue) -> Self {
        Self {
            base: BaseEvent::default(),
            snapshot,
        }
    }
}

/// RFC 6902 operations to apply, in order, to the current state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDeltaEvent {
    /// Common event fields (timestamp, rawEvent).
    #[serde(flatten)]
    pub base: BaseEvent,
    /// JSON Patch operations.
    pub delta: Vec<JsonValue>,
}

impl StateDeltaEvent {
    /// Creates a new StateDeltaEvent.
    pub fn new(delta: Vec<JsonValue>) -> Self {
        Self {
            base: BaseEvent::default(),
            delta,
        }
    }
}

/// The complete message list. Replaces whatever the client held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagesSnapshotEvent {
    /// Common event fields (timestamp, rawEvent).
    #[serde(flatten)]
    pub base: BaseEvent,
    /// The full message list.
    pub messages: Vec<Message>,
}

impl MessagesSnapshotEvent {
    /// Creates a new MessagesSnapshotEvent.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            base: BaseEvent::default(),
            messages,
        }
    }
}

// =============================================================================
// Special Events
// =============================================================================

/// Passthrough wrapper around an external event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Common event fields (timestamp, rawEvent).
    #[serde(flatten)]
    pub base: BaseEvent,
    /// The wrapped event.
    pub event: JsonValue,
    /// Where the event came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl RawEvent {
    /// Creates a new RawEvent.
    pub fn new(event: JsonValue) -> Self {
        Self {
            base: BaseEvent::default(),
            event,
            source: None,
        }
    }

    /// Sets the source.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Application-defined extension event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomEvent {
    /// Common event fields (timestamp, rawEvent).
    #[serde(flatten)]
    pub base: BaseEvent,
    /// Name of the custom event.
    pub name: String,
    /// Payload.
    pub value: JsonValue,
}

impl CustomEvent {
    /// Creates a new CustomEvent.
    pub fn new(name: impl Into<String>, value: JsonValue) -> Self {
        Self {
            base: BaseEvent::default(),
            name: name.into(),
            value,
        }
    }
}

// =============================================================================
// Run Lifecycle Events
// =============================================================================

/// A run has started within a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStartedEvent {
    /// Common event fields (timestamp, rawEvent).
    #[serde(flatten)]
    pub base: BaseEvent,
    /// The thread ID this run belongs to.
    #[serde(rename = "threadId", alias = "thread_id")]
    pub thread_id: ThreadId,
    /// Unique identifier for this run.
    #[serde(rename = "runId", alias = "run_id")]
    pub run_id: RunId,
}

impl RunStartedEvent {
    /// Creates a new RunStartedEvent.
    pub fn new(thread_id: impl Into<ThreadId>, run_id: impl Into<RunId>) -> Self {
        Self {
            base: BaseEvent::default(),
            thread_id: thread_id.into(),
            run_id: run_id.into(),
        }
    }
}

/// A run has completed. Terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunFinishedEvent {
    /// Common event fields (timestamp, rawEvent).
    #[serde(flatten)]
    pub base: BaseEvent,
    /// The thread ID this run belongs to.
    #[serde(rename = "threadId", alias = "thread_id")]
    pub thread_id: ThreadId,
    /// The run that finished.
    #[serde(rename = "runId", alias = "run_id")]
    pub run_id: RunId,
    /// Optional result value from the run. An explicit `null` is kept.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
}

impl RunFinishedEvent {
    /// Creates a new RunFinishedEvent.
    pub fn new(thread_id: impl Into<ThreadId>, run_id: impl Into<RunId>) -> Self {
        Self {
            base: BaseEvent::default(),
            thread_id: thread_id.into(),
            run_id: run_id.into(),
            result: None,
        }
    }

    /// Sets the result.
    pub fn with_result(mut self, result: JsonValue) -> Self {
        self.result = Some(result);
        self
    }
}

/// A run has failed. Terminal, and may replace `RunFinished`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunErrorEvent {
    /// Common event fields (timestamp, rawEvent).
    #[serde(flatten)]
    pub base: BaseEvent,
    /// Error message describing what went wrong.
    pub message: String,
    /// Optional error code for programmatic handling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl RunErrorEvent {
    /// Creates a new RunErrorEvent.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            base: BaseEvent::default(),
            message: message.into(),
            code: None,
        }
    }

    /// Sets the error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

// =============================================================================
// Step Events
// =============================================================================

/// A named step within a run has started. Informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepStartedEvent {
    /// Common event fields (timestamp, rawEvent).
    #[serde(flatten)]
    pub base: BaseEvent,
    /// Name of the step.
    #[serde(rename = "stepName", alias = "step_name")]
    pub step_name: String,
}

impl StepStartedEvent {
    /// Creates a new StepStartedEvent.
    pub fn new(step_name: impl Into<String>) -> Self {
        Self {
            base: BaseEvent::default(),
            step_name: step_name.into(),
        }
    }
}

/// A named step within a run has finished. Informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepFinishedEvent {
    /// Common event fields (timestamp, rawEvent).
    #[serde(flatten)]
    pub base: BaseEvent,
    /// Name of the step.
    #[serde(rename = "stepName", alias = "step_name")]
    pub step_name: String,
}

impl StepFinishedEvent {
    /// Creates a new StepFinishedEvent.
    pub fn new(step_name: impl Into<String>) -> Self {
        Self {
            base: BaseEvent::default(),
            step_name: step_name.into(),
        }
    }
}

event_struct! {
    TextMessageStartEvent => TextMessageStart,
    TextMessageContentEvent => TextMessageContent,
    TextMessageEndEvent => TextMessageEnd,
    TextMessageChunkEvent => TextMessageChunk,
    ThinkingTextMessageStartEvent => ThinkingTextMessageStart,
    ThinkingTextMessageContentEvent => ThinkingTextMessageContent,
    ThinkingTextMessageEndEvent => ThinkingTextMessageEnd,
    ToolCallStartEvent => ToolCallStart,
    ToolCallArgsEvent => ToolCallArgs,
    ToolCallEndEvent => ToolCallEnd,
    ToolCallChunkEvent => ToolCallChunk,
    ToolCallResultEvent => ToolCallResult,
    ThinkingStartEvent => ThinkingStart,
    ThinkingEndEvent => ThinkingEnd,
    StateSnapshotEvent => StateSnapshot,
    StateDeltaEvent => StateDelta,
    MessagesSnapshotEvent => MessagesSnapshot,
    RawEvent => Raw,
    CustomEvent => Custom,
    RunStartedEvent => RunStarted,
    RunFinishedEvent => RunFinished,
    RunErrorEvent => RunError,
    StepStartedEvent => StepStarted,
    StepFinishedEvent => StepFinished,
}

// =============================================================================
// Event Enum
// =============================================================================

/// An AG-UI protocol event.
///
/// Serialized as a JSON object with a `type` discriminator:
/// ```json
/// {"type": "TEXT_MESSAGE_START", "messageId": "m1", "role": "assistant"}
/// ```
///
/// Plain serde deserialization does not run [`Event::validate`]; use
/// [`crate::decode`] for input from the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    TextMessageStart(TextMessageStartEvent),
    TextMessageContent(TextMessageContentEvent),
    TextMessageEnd(TextMessageEndEvent),
    TextMessageChunk(TextMessageChunkEvent),
    ThinkingTextMessageStart(ThinkingTextMessageStartEvent),
    ThinkingTextMessageContent(ThinkingTextMessageContentEvent),
    ThinkingTextMessageEnd(ThinkingTextMessageEndEvent),
    ToolCallStart(ToolCallStartEvent),
    ToolCallArgs(ToolCallArgsEvent),
    ToolCallEnd(ToolCallEndEvent),
    ToolCallChunk(ToolCallChunkEvent),
    ToolCallResult(ToolCallResultEvent),
    ThinkingStart(ThinkingStartEvent),
    ThinkingEnd(ThinkingEndEvent),
    StateSnapshot(StateSnapshotEvent),
    StateDelta(StateDeltaEvent),
    MessagesSnapshot(MessagesSnapshotEvent),
    Raw(RawEvent),
    Custom(CustomEvent),
    RunStarted(RunStartedEvent),
    RunFinished(RunFinishedEvent),
    RunError(RunErrorEvent),
    StepStarted(StepStartedEvent),
    StepFinished(StepFinishedEvent),
}

impl Event {
    /// Returns the event type for this event.
    pub fn event_type(&self) -> EventType {
        match self {
            Event::TextMessageStart(_) => EventType::TextMessageStart,
            Event::TextMessageContent(_) => EventType::TextMessageContent,
            Event::TextMessageEnd(_) => EventType::TextMessageEnd,
            Event::TextMessageChunk(_) => EventType::TextMessageChunk,
            Event::ThinkingTextMessageStart(_) => EventType::ThinkingTextMessageStart,
            Event::ThinkingTextMessageContent(_) => EventType::ThinkingTextMessageContent,
            Event::ThinkingTextMessageEnd(_) => EventType::ThinkingTextMessageEnd,
            Event::ToolCallStart(_) => EventType::ToolCallStart,
            Event::ToolCallArgs(_) => EventType::ToolCallArgs,
            Event::ToolCallEnd(_) => EventType::ToolCallEnd,
            Event::ToolCallChunk(_) => EventType::ToolCallChunk,
            Event::ToolCallResult(_) => EventType::ToolCallResult,
            Event::ThinkingStart(_) => EventType::ThinkingStart,
            Event::ThinkingEnd(_) => EventType::ThinkingEnd,
            Event::StateSnapshot(_) => EventType::StateSnapshot,
            Event::StateDelta(_) => EventType::StateDelta,
            Event::MessagesSnapshot(_) => EventType::MessagesSnapshot,
            Event::Raw(_) => EventType::Raw,
            Event::Custom(_) => EventType::Custom,
            Event::RunStarted(_) => EventType::RunStarted,
            Event::RunFinished(_) => EventType::RunFinished,
            Event::RunError(_) => EventType::RunError,
            Event::StepStarted(_) => EventType::StepStarted,
            Event::StepFinished(_) => EventType::StepFinished,
        }
    }

    /// Returns the common fields of this event.
    pub fn base(&self) -> &BaseEvent {
        match self {
            Event::TextMessageStart(e) => &e.base,
            Event::TextMessageContent(e) => &e.base,
            Event::TextMessageEnd(e) => &e.base,
            Event::TextMessageChunk(e) => &e.base,
            Event::ThinkingTextMessageStart(e) => &e.base,
            Event::ThinkingTextMessageContent(e) => &e.base,
            Event::ThinkingTextMessageEnd(e) => &e.base,
            Event::ToolCallStart(e) => &e.base,
            Event::ToolCallArgs(e) => &e.base,
            Event::ToolCallEnd(e) => &e.base,
            Event::ToolCallChunk(e) => &e.base,
            Event::ToolCallResult(e) => &e.base,
            Event::ThinkingStart(e) => &e.base,
            Event::ThinkingEnd(e) => &e.base,
            Event::StateSnapshot(e) => &e.base,
            Event::StateDelta(e) => &e.base,
            Event::MessagesSnapshot(e) => &e.base,
            Event::Raw(e) => &e.base,
            Event::Custom(e) => &e.base,
            Event::RunStarted(e) => &e.base,
            Event::RunFinished(e) => &e.base,
            Event::RunError(e) => &e.base,
            Event::StepStarted(e) => &e.base,
            Event::StepFinished(e) => &e.base,
        }
    }

    /// Returns the timestamp of this event if available.
    pub fn timestamp(&self) -> Option<i64> {
        self.base().timestamp
    }

    /// Returns the message ID the event refers to, if it has one.
    pub fn message_id(&self) -> Option<&MessageId> {
        match self {
            Event::TextMessageStart(e) => Some(&e.message_id),
            Event::TextMessageContent(e) => Some(&e.message_id),
            Event::TextMessageEnd(e) => Some(&e.message_id),
            Event::TextMessageChunk(e) => e.message_id.as_ref(),
            Event::ToolCallResult(e) => Some(&e.message_id),
            _ => None,
        }
    }

    /// Returns the tool call ID the event refers to, if it has one.
    pub fn tool_call_id(&self) -> Option<&ToolCallId> {
        match self {
            Event::ToolCallStart(e) => Some(&e.tool_call_id),
            Event::ToolCallArgs(e) => Some(&e.tool_call_id),
            Event::ToolCallEnd(e) => Some(&e.tool_call_id),
            Event::ToolCallChunk(e) => e.tool_call_id.as_ref(),
            Event::ToolCallResult(e) => Some(&e.tool_call_id),
            _ => None,
        }
    }

    /// True for `RunFinished` and `RunError`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::RunFinished(_) | Event::RunError(_))
    }

    /// Checks the invariants of whichever variant this is.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        match self {
            Event::TextMessageStart(e) => e.validate(),
            Event::TextMessageContent(e) => e.validate(),
            Event::TextMessageChunk(e) => e.validate(),
            Event::ThinkingTextMessageContent(e) => e.validate(),
            Event::ToolCallResult(e) => e.validate(),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // =========================================================================
    // EventType
    // =========================================================================

    #[test]
    fn test_event_type_serialization() {
        assert_eq!(
            serde_json::to_string(&EventType::TextMessageStart).unwrap(),
            "\"TEXT_MESSAGE_START\""
        );
        assert_eq!(
            serde_json::to_string(&EventType::ThinkingTextMessageContent).unwrap(),
            "\"THINKING_TEXT_MESSAGE_CONTENT\""
        );
    }

    #[test]
    fn test_event_type_as_str_matches_serde() {
        for event_type in EventType::ALL {
            let json = serde_json::to_value(event_type).unwrap();
            assert_eq!(json, JsonValue::String(event_type.as_str().to_string()));
        }
    }

    #[test]
    fn test_event_type_from_str() {
        assert_eq!("RUN_STARTED".parse::<EventType>().unwrap(), EventType::RunStarted);
        assert_eq!(
            "ACTIVITY_SNAPSHOT".parse::<EventType>().unwrap_err(),
            EventValidationError::UnknownEventType("ACTIVITY_SNAPSHOT".to_string())
        );
    }

    #[test]
    fn test_event_type_display() {
        assert_eq!(format!("{}", EventType::StateDelta), "STATE_DELTA");
    }

    // =========================================================================
    // BaseEvent
    // =========================================================================

    #[test]
    fn test_base_event_integer_timestamp() {
        let base = BaseEvent::new().timestamp(1706123456789);
        let json = serde_json::to_string(&base).unwrap();
        assert_eq!(json, r#"{"timestamp":1706123456789}"#);
    }

    #[test]
    fn test_base_event_raw_event_wire_name() {
        let base = BaseEvent::new().raw_event(json!({"provider": "openai"}));
        let json = serde_json::to_value(&base).unwrap();
        assert_eq!(json["rawEvent"]["provider"], "openai");

        let back: BaseEvent = serde_json::from_value(json!({"raw_event": 1})).unwrap();
        assert_eq!(back.raw_event, Some(json!(1)));
    }

    #[test]
    fn test_base_event_current_timestamp() {
        let base = BaseEvent::with_current_timestamp();
        assert!(base.timestamp.unwrap() > 1_600_000_000_000);
    }

    #[test]
    fn test_event_validation_error_display() {
        assert_eq!(
            EventValidationError::EmptyDelta.to_string(),
            "Delta must not be an empty string"
        );
        assert_eq!(
            EventValidationError::MissingField("messageId".to_string()).to_string(),
            "Missing required field: messageId"
        );
        assert_eq!(
            EventValidationError::TypeMismatch {
                expected: "TEXT_MESSAGE_START".to_string(),
                actual: "RUN_STARTED".to_string(),
            }
            .to_string(),
            "Event type mismatch: expected TEXT_MESSAGE_START, got RUN_STARTED"
        );
    }

    // =========================================================================
    // Smart constructors
    // =========================================================================

    #[test]
    fn test_text_message_content_rejects_empty_delta() {
        assert_eq!(
            TextMessageContentEvent::new("m1", "").unwrap_err(),
            EventValidationError::EmptyDelta
        );
        assert!(TextMessageContentEvent::new("m1", "Hi").is_ok());
    }

    #[test]
    fn test_thinking_content_rejects_empty_delta() {
        assert_eq!(
            ThinkingTextMessageContentEvent::new("").unwrap_err(),
            EventValidationError::EmptyDelta
        );
        assert!(ThinkingTextMessageContentEvent::new("hmm").is_ok());
    }

    #[test]
    fn test_unchecked_content_fails_validate() {
        let event = Event::from(TextMessageContentEvent::new_unchecked("m1", ""));
        assert_eq!(event.validate(), Err(EventValidationError::EmptyDelta));
    }

    #[test]
    fn test_text_start_rejects_tool_role() {
        assert!(TextMessageStartEvent::with_role("m1", Role::Tool).is_err());
        let start = TextMessageStartEvent::with_role("m1", Role::User).unwrap();
        assert_eq!(start.role, Role::User);
    }

    #[test]
    fn test_tool_call_result_role_must_be_tool() {
        let mut event = ToolCallResultEvent::new("r1", "c1", "42");
        assert!(event.validate().is_ok());
        event.role = Some(Role::Assistant);
        assert!(event.validate().is_err());
    }

    // =========================================================================
    // Wire shape
    // =========================================================================

    #[test]
    fn test_text_message_start_wire_shape() {
        let event: Event = TextMessageStartEvent::new("m1").into();
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "TEXT_MESSAGE_START", "messageId": "m1", "role": "assistant"})
        );
    }

    #[test]
    fn test_tool_call_start_wire_shape() {
        let event: Event = ToolCallStartEvent::new("c1", "get_weather")
            .with_parent_message_id("m1")
            .with_timestamp(5)
            .into();
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "TOOL_CALL_START",
                "timestamp": 5,
                "toolCallId": "c1",
                "toolCallName": "get_weather",
                "parentMessageId": "m1"
            })
        );
    }

    #[test]
    fn test_thinking_events_have_no_id() {
        let event: Event = ThinkingTextMessageStartEvent::new().into();
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "THINKING_TEXT_MESSAGE_START"})
        );
    }

    #[test]
    fn test_snake_case_fields_are_accepted() {
        let event: Event = serde_json::from_value(json!({
            "type": "RUN_STARTED",
            "thread_id": "t1",
            "run_id": "r1"
        }))
        .unwrap();
        assert_eq!(event, RunStartedEvent::new("t1", "r1").into());
    }

    #[test]
    fn test_optional_fields_omitted() {
        let event: Event = RunErrorEvent::new("boom").into();
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"RUN_ERROR","message":"boom"}"#);
    }

    #[test]
    fn test_round_trip_every_variant() {
        let events: Vec<Event> = vec![
            TextMessageStartEvent::new("m1").with_timestamp(1).into(),
            TextMessageContentEvent::new("m1", "Hi").unwrap().into(),
            TextMessageEndEvent::new("m1").into(),
            TextMessageChunkEvent::new().with_message_id("m2").with_delta("x").into(),
            ThinkingTextMessageStartEvent::new().into(),
            ThinkingTextMessageContentEvent::new("plan").unwrap().into(),
            ThinkingTextMessageEndEvent::new().into(),
            ToolCallStartEvent::new("c1", "f").into(),
            ToolCallArgsEvent::new("c1", "{").into(),
            ToolCallEndEvent::new("c1").into(),
            ToolCallChunkEvent::new().with_tool_call_id("c2").with_delta("{}").into(),
            ToolCallResultEvent::new("r1", "c1", "ok").into(),
            ThinkingStartEvent::new().with_title("t").into(),
            ThinkingEndEvent::new().into(),
            StateSnapshotEvent::new(json!({"a": 1})).into(),
            StateDeltaEvent::new(vec![json!({"op": "remove", "path": "/a"})]).into(),
            MessagesSnapshotEvent::new(vec![Message::assistant("m1", "Hi")]).into(),
            RawEvent::new(json!({"x": 1})).with_source("openai").into(),
            CustomEvent::new("ping", json!(null)).into(),
            RunStartedEvent::new("t1", "r1").into(),
            RunFinishedEvent::new("t1", "r1").with_result(json!("done")).into(),
            RunErrorEvent::new("boom").with_code("AGENT_ERROR").into(),
            StepStartedEvent::new("plan").into(),
            StepFinishedEvent::new("plan").with_raw_event(json!([1])).into(),
        ];
        assert_eq!(events.len(), EventType::ALL.len());

        for (event, expected_type) in events.iter().zip(EventType::ALL) {
            assert_eq!(event.event_type(), expected_type);
            let json = serde_json::to_string(event).unwrap();
            let back: Event = serde_json::from_str(&json).unwrap();
            assert_eq!(&back, event, "round trip failed for {}", expected_type);
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[test]
    fn test_id_accessors() {
        let event: Event = TextMessageContentEvent::new_unchecked("m1", "x").into();
        assert_eq!(event.message_id().map(|id| id.as_str()), Some("m1"));
        assert!(event.tool_call_id().is_none());

        let event: Event = ToolCallArgsEvent::new("c1", "{").into();
        assert_eq!(event.tool_call_id().map(|id| id.as_str()), Some("c1"));
        assert!(event.message_id().is_none());
    }

    #[test]
    fn test_is_terminal() {
        assert!(Event::from(RunFinishedEvent::new("t", "r")).is_terminal());
        assert!(Event::from(RunErrorEvent::new("x")).is_terminal());
        assert!(!Event::from(RunStartedEvent::new("t", "r")).is_terminal());
    }

    #[test]
    fn test_timestamp_accessor() {
        let event: Event = StepStartedEvent::new("s").with_timestamp(42).into();
        assert_eq!(event.timestamp(), Some(42));
    }

    #[test]
    fn test_explicit_null_survives_round_trip() {
        let events: Vec<Event> = vec![
            RunFinishedEvent::new("t1", "r1").with_result(JsonValue::Null).into(),
            StepFinishedEvent::new("plan").with_raw_event(JsonValue::Null).into(),
        ];
        for event in events {
            let json = serde_json::to_string(&event).unwrap();
            assert!(json.contains("null"), "{json}");
            let back: Event = serde_json::from_str(&json).unwrap();
            assert_eq!(back, event);
        }

        let absent: RunFinishedEvent =
            serde_json::from_value(json!({"threadId": "t1", "runId": "r1"})).unwrap();
        assert_eq!(absent.result, None);
    }
}

