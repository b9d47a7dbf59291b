//! AG-UI Client SDK
//!
//! The consuming side of an AG-UI stream:
//!
//! - **Decoder**: event-stream or NDJSON bytes back into events
//! - **Reducer**: events back into messages, tool calls and state
//! - **Registry**: one reducer per thread
//!
//! # Usage
//!
//! ```rust
//! use agui_client::{decode_events, Reducer};
//! use agui_core::{DecodeMode, WireFormat};
//!
//! let body = concat!(
//!     "data: {\"type\":\"TEXT_MESSAGE_START\",\"messageId\":\"m1\",\"role\":\"assistant\"}\n\n",
//!     "data: {\"type\":\"TEXT_MESSAGE_CONTENT\",\"messageId\":\"m1\",\"delta\":\"Hi\"}\n\n",
//!     "data: {\"type\":\"TEXT_MESSAGE_END\",\"messageId\":\"m1\"}\n\n",
//! );
//! let events = decode_events(body, WireFormat::Sse, DecodeMode::Strict).unwrap();
//! let reducer = Reducer::from_events(&events);
//! assert_eq!(reducer.messages()[0].content(), Some("Hi"));
//! ```

pub mod decoder;
pub mod error;
pub mod reducer;
pub mod registry;

pub use decoder::{decode_all, decode_events, read_frames, Frame, FrameDecoder};
pub use error::{ClientError, Result};
pub use reducer::{ProtocolViolation, Reducer, RunStatus};
pub use registry::ThreadRegistry;
