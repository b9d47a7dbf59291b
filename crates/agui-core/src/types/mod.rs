//! AG-UI Protocol Types
//!
//! This module defines the shared vocabulary referenced by both ends of a
//! stream:
//! - ID newtypes (ThreadId, RunId, MessageId, ToolCallId)
//! - Message and role definitions
//! - Tool definitions and tool calls
//! - `RunAgentInput` and context items

mod ids;
mod input;
mod message;
mod tool;

pub use ids::*;
pub use input::*;
pub use message::*;
pub use tool::*;
