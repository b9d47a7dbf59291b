//! AG-UI Core Types
//!
//! This crate provides the core type definitions for the AG-UI (Agent-User Interaction)
//! protocol: the event type system, the message and state data model, and the
//! validation rules every producer and consumer shares.
//!
//! # Overview
//!
//! - **Event types**: the 24 protocol events, with smart constructors and `validate()`
//! - **Decoding**: wire objects to events with field-level errors and passthrough mode
//! - **Message types**: role-discriminated conversation messages and tool calls
//! - **State**: JSON Patch helpers and a producer-side `StateManager`
//! - **Sequencing**: strict ordering checks for complete streams
//!
//! # Usage
//!
//! ```rust
//! use agui_core::{Event, TextMessageContentEvent};
//!
//! let event: Event = TextMessageContentEvent::new("m1", "Hello").unwrap().into();
//! let json = serde_json::to_string(&event).unwrap();
//! assert_eq!(Event::from_json(&json).unwrap(), event);
//! ```

pub mod decode;
pub mod error;
pub mod event;
pub mod patch;
pub mod sequence;
pub mod state;
pub mod types;
pub mod wire;

// Re-export key types for convenience
pub use error::{AgUiError, Result};

/// Re-export serde_json::Value for consistent JSON handling across the crate
pub use serde_json::Value as JsonValue;

// Re-export all types at crate root for convenient access
pub use types::*;

pub use decode::{decode_as, decode_str, decode_value, DecodeMode};
pub use sequence::{validate_sequence, SequenceError};
pub use state::{diff_states, StateManager};
pub use wire::WireFormat;

// Re-export event types
pub use event::{
    // Foundation types
    BaseEvent, Event, EventType, EventValidationError, TypedEvent,
    // Text message events
    TextMessageChunkEvent, TextMessageContentEvent, TextMessageEndEvent, TextMessageStartEvent,
    // Thinking text message events
    ThinkingTextMessageContentEvent, ThinkingTextMessageEndEvent, ThinkingTextMessageStartEvent,
    // Tool call events
    ToolCallArgsEvent, ToolCallChunkEvent, ToolCallEndEvent, ToolCallResultEvent,
    ToolCallStartEvent,
    // Thinking step events
    ThinkingEndEvent, ThinkingStartEvent,
    // State events
    MessagesSnapshotEvent, StateDeltaEvent, StateSnapshotEvent,
    // Special events
    CustomEvent, RawEvent,
    // Run lifecycle events
    RunErrorEvent, RunFinishedEvent, RunStartedEvent,
    // Step events
    StepFinishedEvent, StepStartedEvent,
};
