//! AG-UI Server SDK
//!
//! This crate provides the producing side of an AG-UI stream:
//!
//! - **Negotiation**: pick event-stream or NDJSON framing from `Accept`
//! - **Encoder**: one event in, one frame out
//! - **Transport**: a bounded channel that reports overflow instead of dropping
//! - **Stream**: frames for an HTTP body, with encoding and agent failures
//!   turned into `RUN_ERROR` frames
//! - **Agent**: the trait agent code implements, and `run_agent` to serve it
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use agui_server::{run_agent, EventEncoder};
//!
//! async fn handler(headers: HeaderMap, Json(input): Json<RunAgentInput>) -> Response {
//!     let accept = headers.get(ACCEPT).and_then(|v| v.to_str().ok());
//!     run_agent(Arc::new(MyAgent), input, EventEncoder::new(accept), 64).into_response()
//! }
//! ```

pub mod agent;
pub mod encoder;
pub mod error;
pub mod negotiation;
pub mod stream;
pub mod transport;

// Re-export agui-core types for convenience
pub use agui_core::*;

// Re-export server-specific types
pub use agent::{run_agent, Agent, AgentError};
pub use encoder::{EncodingError, EventEncoder, FrameEncoder};
pub use error::ServerError;
pub use negotiation::negotiate;
pub use stream::EventStream;
pub use transport::{channel, EventReceiver, EventSender, SendError};
