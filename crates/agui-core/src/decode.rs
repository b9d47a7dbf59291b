//! Validating event decoder.
//!
//! Plain `serde_json::from_value::<Event>` accepts anything serde can map,
//! including a content event with an empty delta. The functions here are the
//! entry point for input that came off the wire: they report which field was
//! missing, pin the discriminator when the caller expects a concrete type,
//! and re-run [`Event::validate`] on the result.

use crate::event::{Event, EventType, EventValidationError, RawEvent, TypedEvent};
use crate::JsonValue;
use serde_json::Map;

/// How to treat a `type` the protocol does not define.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Fail with [`EventValidationError::UnknownEventType`].
    #[default]
    Strict,
    /// Wrap the object in a `RAW` event with source `unknown:<type>`.
    Passthrough,
}

/// Decodes and validates one event object.
pub fn decode_value(value: JsonValue, mode: DecodeMode) -> Result<Event, EventValidationError> {
    let event_type = {
        let obj = as_object(&value)?;
        match discriminator(obj)?.parse::<EventType>() {
            Ok(event_type) => {
                check_required_fields(obj, event_type)?;
                event_type
            }
            Err(err) => {
                return match mode {
                    DecodeMode::Strict => Err(err),
                    DecodeMode::Passthrough => {
                        let source = format!("unknown:{}", discriminator(obj)?);
                        Ok(Event::Raw(RawEvent::new(value.clone()).with_source(source)))
                    }
                };
            }
        }
    };

    let event: Event = serde_json::from_value(value)
        .map_err(|e| EventValidationError::InvalidFormat(format!("{event_type}: {e}")))?;
    event.validate()?;
    Ok(event)
}

/// Parses JSON text and decodes it with [`decode_value`].
pub fn decode_str(text: &str, mode: DecodeMode) -> Result<Event, EventValidationError> {
    let value: JsonValue = serde_json::from_str(text)
        .map_err(|e| EventValidationError::InvalidFormat(format!("malformed JSON: {e}")))?;
    decode_value(value, mode)
}

/// Decodes an object into a concrete event struct, pinning its `type`.
///
/// ```rust
/// use agui_core::decode::decode_as;
/// use agui_core::{EventValidationError, TextMessageEndEvent};
/// use serde_json::json;
///
/// let end: TextMessageEndEvent =
///     decode_as(json!({"type": "TEXT_MESSAGE_END", "messageId": "m1"})).unwrap();
/// assert_eq!(end.message_id, "m1");
///
/// let err = decode_as::<TextMessageEndEvent>(json!({"type": "RUN_ERROR", "message": "x"}));
/// assert!(matches!(err, Err(EventValidationError::TypeMismatch { .. })));
/// ```
pub fn decode_as<T: TypedEvent>(value: JsonValue) -> Result<T, EventValidationError> {
    {
        let obj = as_object(&value)?;
        let actual = discriminator(obj)?;
        if actual != T::EVENT_TYPE.as_str() {
            return Err(EventValidationError::TypeMismatch {
                expected: T::EVENT_TYPE.as_str().to_string(),
                actual: actual.to_string(),
            });
        }
        check_required_fields(obj, T::EVENT_TYPE)?;
    }

    let typed: T = serde_json::from_value(value)
        .map_err(|e| EventValidationError::InvalidFormat(format!("{}: {e}", T::EVENT_TYPE)))?;
    let event: Event = typed.clone().into();
    event.validate()?;
    Ok(typed)
}

impl Event {
    /// Decodes a JSON value in strict mode.
    pub fn from_value(value: JsonValue) -> Result<Self, EventValidationError> {
        decode_value(value, DecodeMode::Strict)
    }

    /// Decodes JSON text in strict mode.
    pub fn from_json(text: &str) -> Result<Self, EventValidationError> {
        decode_str(text, DecodeMode::Strict)
    }
}

fn as_object(value: &JsonValue) -> Result<&Map<String, JsonValue>, EventValidationError> {
    value
        .as_object()
        .ok_or_else(|| EventValidationError::InvalidFormat("event must be a JSON object".to_string()))
}

fn discriminator(obj: &Map<String, JsonValue>) -> Result<&str, EventValidationError> {
    match obj.get("type") {
        None => Err(EventValidationError::MissingField("type".to_string())),
        Some(JsonValue::String(s)) => Ok(s),
        Some(other) => Err(EventValidationError::InvalidFormat(format!(
            "type must be a string, got {other}"
        ))),
    }
}

fn check_required_fields(
    obj: &Map<String, JsonValue>,
    event_type: EventType,
) -> Result<(), EventValidationError> {
    for field in event_type.required_fields() {
        if !obj.contains_key(*field) && !obj.contains_key(&snake_case(field)) {
            return Err(EventValidationError::MissingField((*field).to_string()));
        }
    }
    Ok(())
}

fn snake_case(camel: &str) -> String {
    let mut out = String::with_capacity(camel.len() + 4);
    for c in camel.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{RunStartedEvent, TextMessageContentEvent, TextMessageStartEvent};
    use serde_json::json;

    #[test]
    fn test_decode_valid_event() {
        let event = Event::from_value(json!({
            "type": "TEXT_MESSAGE_CONTENT",
            "messageId": "m1",
            "delta": "Hello"
        }))
        .unwrap();
        assert_eq!(event, TextMessageContentEvent::new("m1", "Hello").unwrap().into());
    }

    #[test]
    fn test_decode_snake_case_frame() {
        let event = Event::from_json(r#"{"type":"RUN_STARTED","thread_id":"t1","run_id":"r1"}"#).unwrap();
        assert_eq!(event, RunStartedEvent::new("t1", "r1").into());
    }

    #[test]
    fn test_missing_type() {
        assert_eq!(
            Event::from_value(json!({"messageId": "m1"})).unwrap_err(),
            EventValidationError::MissingField("type".to_string())
        );
    }

    #[test]
    fn test_missing_required_field_uses_wire_name() {
        assert_eq!(
            Event::from_value(json!({"type": "TOOL_CALL_START", "toolCallId": "c1"})).unwrap_err(),
            EventValidationError::MissingField("toolCallName".to_string())
        );
    }

    #[test]
    fn test_empty_delta_rejected_on_decode() {
        assert_eq!(
            Event::from_value(json!({"type": "TEXT_MESSAGE_CONTENT", "messageId": "m1", "delta": ""}))
                .unwrap_err(),
            EventValidationError::EmptyDelta
        );
    }

    #[test]
    fn test_wrong_field_type_is_invalid_format() {
        let err = Event::from_value(json!({"type": "STATE_DELTA", "delta": "nope"})).unwrap_err();
        assert!(matches!(err, EventValidationError::InvalidFormat(_)));
    }

    #[test]
    fn test_non_object_is_invalid_format() {
        let err = Event::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, EventValidationError::InvalidFormat(_)));

        let err = Event::from_json("{not json").unwrap_err();
        assert!(matches!(err, EventValidationError::InvalidFormat(_)));
    }

    #[test]
    fn test_unknown_type_strict() {
        assert_eq!(
            Event::from_value(json!({"type": "ACTIVITY_SNAPSHOT"})).unwrap_err(),
            EventValidationError::UnknownEventType("ACTIVITY_SNAPSHOT".to_string())
        );
    }

    #[test]
    fn test_unknown_type_passthrough() {
        let value = json!({"type": "ACTIVITY_SNAPSHOT", "content": {"x": 1}});
        let event = decode_value(value.clone(), DecodeMode::Passthrough).unwrap();
        match event {
            Event::Raw(raw) => {
                assert_eq!(raw.event, value);
                assert_eq!(raw.source.as_deref(), Some("unknown:ACTIVITY_SNAPSHOT"));
            }
            other => panic!("expected raw event, got {other:?}"),
        }
    }

    #[test]
    fn test_passthrough_still_validates_known_types() {
        let err = decode_value(
            json!({"type": "THINKING_TEXT_MESSAGE_CONTENT", "delta": ""}),
            DecodeMode::Passthrough,
        )
        .unwrap_err();
        assert_eq!(err, EventValidationError::EmptyDelta);
    }

    #[test]
    fn test_decode_as_type_mismatch() {
        let err = decode_as::<TextMessageStartEvent>(json!({
            "type": "RUN_STARTED",
            "threadId": "t1",
            "runId": "r1"
        }))
        .unwrap_err();
        assert_eq!(
            err,
            EventValidationError::TypeMismatch {
                expected: "TEXT_MESSAGE_START".to_string(),
                actual: "RUN_STARTED".to_string(),
            }
        );
    }

    #[test]
    fn test_decode_as_validates() {
        let err = decode_as::<TextMessageContentEvent>(json!({
            "type": "TEXT_MESSAGE_CONTENT",
            "messageId": "m1",
            "delta": ""
        }))
        .unwrap_err();
        assert_eq!(err, EventValidationError::EmptyDelta);
    }

    #[test]
    fn test_snake_case_helper() {
        assert_eq!(snake_case("parentMessageId"), "parent_message_id");
        assert_eq!(snake_case("delta"), "delta");
    }

    proptest::proptest! {
        #[test]
        fn test_decode_never_panics(text in ".{0,64}") {
            let _ = decode_str(&text, DecodeMode::Strict);
            let _ = decode_str(&text, DecodeMode::Passthrough);
        }

        #[test]
        fn test_content_delta_survives_decode(delta in ".{1,32}") {
            let value = json!({"type": "TEXT_MESSAGE_CONTENT", "messageId": "m1", "delta": delta.clone()});
            let event = decode_value(value, DecodeMode::Strict).unwrap();
            let expected = Event::from(TextMessageContentEvent::new("m1", delta).unwrap());
            proptest::prop_assert_eq!(event, expected);
        }
    }
}
