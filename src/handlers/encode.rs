use agui_client::decode_events;
use agui_core::{DecodeMode, Event, RunAgentInput, RunId, ThreadId, WireFormat};
use agui_server::{run_agent, Agent, AgentError, EventEncoder, EventSender};
use async_trait::async_trait;
use futures_util::StreamExt;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Plays recorded events back through the producer channel.
struct ReplayAgent {
    events: Vec<Event>,
}

#[async_trait]
impl Agent for ReplayAgent {
    async fn run(&self, _input: RunAgentInput, sender: EventSender) -> Result<(), AgentError> {
        for event in &self.events {
            sender.send(event.clone()).await?;
        }
        Ok(())
    }
}

/// Run input named after the first `RUN_STARTED` in the recording.
fn replay_input(events: &[Event]) -> RunAgentInput {
    events
        .iter()
        .find_map(|event| match event {
            Event::RunStarted(e) => Some(RunAgentInput::new(e.thread_id.clone(), e.run_id.clone())),
            _ => None,
        })
        .unwrap_or_else(|| RunAgentInput::new(ThreadId::random(), RunId::random()))
}

/// Re-encode a recorded stream into the format `accept` negotiates.
pub async fn handle_encode(
    file: PathBuf,
    format: Option<WireFormat>,
    mode: DecodeMode,
    accept: &str,
    capacity: usize,
    output: Option<PathBuf>,
) -> crate::Result<()> {
    let (text, format) = super::read_stream(&file, format)?;
    let events = decode_events(&text, format, mode)?;

    let encoder = EventEncoder::new(Some(accept));
    log::info!(
        "encoding {} events as {} (accept: {})",
        events.len(),
        encoder.content_type(),
        accept
    );

    let input = replay_input(&events);
    let stream = run_agent(Arc::new(ReplayAgent { events }), input, encoder, capacity.max(1));
    let body: String = stream.frames().collect::<Vec<_>>().await.concat();

    match output {
        Some(path) => {
            fs::write(&path, &body)?;
            log::info!("wrote {} bytes to {}", body.len(), path.display());
        }
        None => print!("{}", body),
    }
    Ok(())
}
