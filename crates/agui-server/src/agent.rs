//! Agent execution.
//!
//! An [`Agent`] receives the run input and an [`EventSender`] and pushes
//! events until it is done. [`run_agent`] spawns it and returns the
//! [`EventStream`] that serves those events, reporting a failed run as a
//! `RUN_ERROR` frame.

use std::sync::Arc;

use agui_core::{AgUiError, RunAgentInput};
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::encoder::EventEncoder;
use crate::stream::EventStream;
use crate::transport::{channel, EventSender, SendError};

/// Why an agent run failed.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The agent gave up.
    #[error("{0}")]
    Failed(String),

    /// An event could not be sent.
    #[error(transparent)]
    Send(#[from] SendError),

    /// An event could not be built.
    #[error(transparent)]
    Core(#[from] AgUiError),
}

impl From<agui_core::EventValidationError> for AgentError {
    fn from(err: agui_core::EventValidationError) -> Self {
        AgentError::Core(err.into())
    }
}

/// Something that answers a run by emitting events.
///
/// ```rust
/// use agui_core::{RunAgentInput, RunFinishedEvent, RunStartedEvent};
/// use agui_server::{Agent, AgentError, EventSender};
///
/// struct Echo;
///
/// #[async_trait::async_trait]
/// impl Agent for Echo {
///     async fn run(&self, input: RunAgentInput, sender: EventSender) -> Result<(), AgentError> {
///         sender.send(RunStartedEvent::new(input.thread_id.clone(), input.run_id.clone())).await?;
///         sender.send(RunFinishedEvent::new(input.thread_id, input.run_id)).await?;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Agent: Send + Sync + 'static {
    /// Runs the agent. Returning `Err` ends the stream with an `AGENT_ERROR`.
    async fn run(&self, input: RunAgentInput, sender: EventSender) -> Result<(), AgentError>;
}

/// Spawns `agent` on the current runtime and streams its events.
///
/// `capacity` bounds the events buffered between agent and response.
pub fn run_agent<A>(
    agent: Arc<A>,
    input: RunAgentInput,
    encoder: EventEncoder,
    capacity: usize,
) -> EventStream
where
    A: Agent + ?Sized,
{
    debug!(
        thread_id = %input.thread_id,
        run_id = %input.run_id,
        format = %encoder.format(),
        "starting agent run"
    );
    let (sender, receiver) = channel(capacity);
    let task = tokio::spawn(async move { agent.run(input, sender).await });
    EventStream::new(receiver, encoder).with_task(task)
}
