//! Transport Layer for AG-UI Events
//!
//! Agent code pushes events into an [`EventSender`]; the matching
//! [`EventReceiver`] is consumed by an [`crate::EventStream`], which encodes
//! each event and produces the HTTP response body.
//!
//! # Example
//!
//! ```rust
//! use agui_core::RunErrorEvent;
//! use agui_server::transport::channel;
//!
//! let (sender, receiver) = channel(32);
//! assert!(!sender.is_closed());
//! drop(receiver);
//! assert!(sender.try_send(RunErrorEvent::new("error")).is_err());
//! ```

pub mod channel;

pub use channel::{channel, EventReceiver, EventSender, SendError, STREAM_OVERFLOW_CODE};
