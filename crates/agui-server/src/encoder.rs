//! Event frame encoding.
//!
//! An [`EventEncoder`] serializes events for exactly one wire format, picked
//! once at construction and fixed for its lifetime:
//!
//! - event stream: `data: <json>\n\n`
//! - NDJSON: `<json>\n`

use agui_core::{Event, EventType, MessageId, ToolCallId, WireFormat};

use crate::negotiation::negotiate;

/// Frame used when even the `RUN_ERROR` for an encoding failure cannot be encoded.
pub const ENCODING_FALLBACK_FRAME: &str =
    "event: error\ndata: {\"error\": \"Event encoding failed\"}\n\n";

/// Frame used when the `RUN_ERROR` for a failed agent cannot be encoded.
pub const AGENT_FALLBACK_FRAME: &str =
    "event: error\ndata: {\"error\": \"Agent execution failed\"}\n\n";

/// An event could not be turned into a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingError {
    /// Type of the event that failed.
    pub event_type: EventType,
    /// Message the event refers to, if any.
    pub message_id: Option<MessageId>,
    /// Tool call the event refers to, if any.
    pub tool_call_id: Option<ToolCallId>,
    /// Underlying failure.
    pub reason: String,
}

impl EncodingError {
    /// Creates an error describing `event`.
    pub fn new(event: &Event, reason: impl Into<String>) -> Self {
        Self {
            event_type: event.event_type(),
            message_id: event.message_id().cloned(),
            tool_call_id: event.tool_call_id().cloned(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for EncodingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cannot encode {}", self.event_type)?;
        if let Some(id) = &self.message_id {
            write!(f, " (message {id})")?;
        }
        if let Some(id) = &self.tool_call_id {
            write!(f, " (tool call {id})")?;
        }
        write!(f, ": {}", self.reason)
    }
}

impl std::error::Error for EncodingError {}

/// Turns events into wire frames.
pub trait FrameEncoder {
    /// The `Content-Type` of the frames this encoder produces.
    fn content_type(&self) -> &'static str;

    /// Encodes one event into one frame.
    fn encode(&self, event: &Event) -> Result<String, EncodingError>;
}

/// The protocol encoder for one response.
///
/// ```rust
/// use agui_core::{Event, TextMessageEndEvent};
/// use agui_server::EventEncoder;
///
/// let encoder = EventEncoder::new(Some("application/x-ndjson"));
/// let event: Event = TextMessageEndEvent::new("m1").into();
///
/// assert_eq!(encoder.content_type(), "application/x-ndjson");
/// assert_eq!(
///     encoder.encode(&event).unwrap(),
///     "{\"type\":\"TEXT_MESSAGE_END\",\"messageId\":\"m1\"}\n"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventEncoder {
    format: WireFormat,
}

impl EventEncoder {
    /// Negotiates the format from an `Accept` header value.
    pub fn new(accept: Option<&str>) -> Self {
        Self::with_format(negotiate(accept))
    }

    /// Uses `format` regardless of what the client asked for.
    pub fn with_format(format: WireFormat) -> Self {
        Self { format }
    }

    /// The negotiated format.
    pub fn format(&self) -> WireFormat {
        self.format
    }

    /// The `Content-Type` of the negotiated format.
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    /// Encodes one event.
    pub fn encode(&self, event: &Event) -> Result<String, EncodingError> {
        let json = serde_json::to_string(event).map_err(|e| EncodingError::new(event, e.to_string()))?;
        Ok(match self.format {
            WireFormat::Sse => format!("data: {json}\n\n"),
            WireFormat::Ndjson => format!("{json}\n"),
        })
    }
}

impl FrameEncoder for EventEncoder {
    fn content_type(&self) -> &'static str {
        EventEncoder::content_type(self)
    }

    fn encode(&self, event: &Event) -> Result<String, EncodingError> {
        EventEncoder::encode(self, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agui_core::{RunErrorEvent, TextMessageContentEvent, ToolCallArgsEvent};

    #[test]
    fn test_sse_frame() {
        let encoder = EventEncoder::with_format(WireFormat::Sse);
        let event: Event = TextMessageContentEvent::new("m1", "Hello").unwrap().into();
        assert_eq!(
            encoder.encode(&event).unwrap(),
            "data: {\"type\":\"TEXT_MESSAGE_CONTENT\",\"messageId\":\"m1\",\"delta\":\"Hello\"}\n\n"
        );
    }

    #[test]
    fn test_ndjson_frame_is_one_line() {
        let encoder = EventEncoder::with_format(WireFormat::Ndjson);
        let event: Event = TextMessageContentEvent::new("m1", "line1\nline2").unwrap().into();
        let frame = encoder.encode(&event).unwrap();
        assert!(frame.ends_with('\n'));
        assert_eq!(frame.matches('\n').count(), 1);
    }

    #[test]
    fn test_encode_is_pure() {
        let encoder = EventEncoder::new(None);
        let event: Event = RunErrorEvent::new("boom").with_timestamp(7).into();
        assert_eq!(encoder.encode(&event).unwrap(), encoder.encode(&event).unwrap());
    }

    #[test]
    fn test_content_type_follows_negotiation() {
        assert_eq!(EventEncoder::new(None).content_type(), "text/event-stream");
        assert_eq!(EventEncoder::new(Some("application/json")).content_type(), "application/x-ndjson");
        assert_eq!(EventEncoder::new(Some("application/json")).format(), WireFormat::Ndjson);
    }

    #[test]
    fn test_encoding_error_names_ids() {
        let event: Event = ToolCallArgsEvent::new("c1", "{").into();
        let err = EncodingError::new(&event, "boom");
        assert_eq!(err.to_string(), "cannot encode TOOL_CALL_ARGS (tool call c1): boom");

        let event: Event = TextMessageContentEvent::new_unchecked("m1", "x").into();
        let err = EncodingError::new(&event, "boom");
        assert_eq!(err.message_id.as_ref().map(|id| id.as_str()), Some("m1"));
    }
}
