//! Recovering frame stream.
//!
//! [`EventStream`] encodes events from an [`EventReceiver`] into frames. It
//! never ends a response with a bare transport error: an event that fails to
//! encode is replaced by a `RUN_ERROR` (code `ENCODING_ERROR`) and the stream
//! stops; an agent that fails is reported as a `RUN_ERROR` (code
//! `AGENT_ERROR`) after every event it managed to send.

use std::convert::Infallible;

use agui_core::{Event, RunErrorEvent};
use async_stream::stream;
use axum::body::Body;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use futures::{Stream, StreamExt};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::agent::AgentError;
use crate::encoder::{
    EventEncoder, FrameEncoder, AGENT_FALLBACK_FRAME, ENCODING_FALLBACK_FRAME,
};
use crate::transport::EventReceiver;

/// Error code used when an event cannot be encoded.
pub const ENCODING_ERROR_CODE: &str = "ENCODING_ERROR";

/// Error code used when the agent fails.
pub const AGENT_ERROR_CODE: &str = "AGENT_ERROR";

/// An encoded event stream for one response.
pub struct EventStream<E = EventEncoder> {
    encoder: E,
    receiver: EventReceiver,
    task: Option<JoinHandle<Result<(), AgentError>>>,
}

impl<E> EventStream<E>
where
    E: FrameEncoder + Send + Sync + 'static,
{
    /// Streams the events of `receiver` through `encoder`.
    pub fn new(receiver: EventReceiver, encoder: E) -> Self {
        Self {
            encoder,
            receiver,
            task: None,
        }
    }

    /// Reports the outcome of `task` once the channel closes.
    pub fn with_task(mut self, task: JoinHandle<Result<(), AgentError>>) -> Self {
        self.task = Some(task);
        self
    }

    /// The `Content-Type` of the frames.
    pub fn content_type(&self) -> &'static str {
        self.encoder.content_type()
    }

    /// The encoded frames, in event order.
    pub fn frames(self) -> impl Stream<Item = String> + Send + 'static {
        let Self {
            encoder,
            receiver,
            task,
        } = self;

        stream! {
            let mut events = Box::pin(receiver.into_stream());
            let mut last_terminal = false;
            let mut encoding_failed = false;

            while let Some(event) = events.next().await {
                debug!(event_type = %event.event_type(), "streaming event");
                match encoder.encode(&event) {
                    Ok(frame) => {
                        last_terminal = event.is_terminal();
                        yield frame;
                    }
                    Err(err) => {
                        warn!(error = %err, "event encoding failed, closing stream");
                        let replacement = RunErrorEvent::new(format!("Event encoding failed: {err}"))
                            .with_code(ENCODING_ERROR_CODE);
                        yield recover(&encoder, replacement.into(), ENCODING_FALLBACK_FRAME);
                        encoding_failed = true;
                        break;
                    }
                }
            }

            if let Some(task) = task {
                if encoding_failed {
                    task.abort();
                } else if let Some(reason) = agent_failure(task.await) {
                    if last_terminal {
                        warn!(error = %reason, "agent failed after the run terminated");
                    } else {
                        warn!(error = %reason, "agent execution failed");
                        let report = RunErrorEvent::new(format!("Agent execution failed: {reason}"))
                            .with_code(AGENT_ERROR_CODE);
                        yield recover(&encoder, report.into(), AGENT_FALLBACK_FRAME);
                    }
                }
            }
        }
    }

    /// Builds the HTTP response: negotiated `Content-Type`,
    /// `Cache-Control: no-cache`, frames as the body.
    pub fn into_response(self) -> Response {
        let content_type = self.content_type();
        let body = Body::from_stream(self.frames().map(Ok::<_, Infallible>));

        let mut response = Response::new(body);
        let headers = response.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        response
    }
}

impl<E> IntoResponse for EventStream<E>
where
    E: FrameEncoder + Send + Sync + 'static,
{
    fn into_response(self) -> Response {
        EventStream::into_response(self)
    }
}

fn recover<E: FrameEncoder>(encoder: &E, event: Event, fallback: &str) -> String {
    encoder.encode(&event).unwrap_or_else(|err| {
        warn!(error = %err, "error report could not be encoded, sending fallback frame");
        fallback.to_string()
    })
}

fn agent_failure(
    outcome: Result<Result<(), AgentError>, tokio::task::JoinError>,
) -> Option<String> {
    match outcome {
        Ok(Ok(())) => None,
        Ok(Err(err)) => Some(err.to_string()),
        Err(join) if join.is_panic() => Some("agent panicked".to_string()),
        Err(join) => Some(join.to_string()),
    }
}
