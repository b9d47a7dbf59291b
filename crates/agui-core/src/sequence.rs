//! Strict ordering checks for a complete event sequence.
//!
//! The client reducer tolerates bad input by logging and skipping it. Producers
//! and test suites usually want the opposite: stop at the first event that
//! breaks the protocol and say why.

use crate::event::{Event, EventType};
use crate::types::{MessageId, RunId, ToolCallId};
use std::collections::HashSet;
use thiserror::Error;

/// The first event of a sequence that breaks the protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("event {index} ({event_type}): {reason}")]
pub struct SequenceError {
    /// Position of the offending event.
    pub index: usize,
    /// Its type.
    pub event_type: EventType,
    /// What went wrong.
    pub reason: String,
}

#[derive(Debug, Default)]
struct SequenceState {
    active_run: Option<RunId>,
    finished_runs: HashSet<RunId>,
    terminated: bool,
    active_steps: HashSet<String>,
    open_messages: HashSet<MessageId>,
    closed_messages: HashSet<MessageId>,
    open_tool_calls: HashSet<ToolCallId>,
    closed_tool_calls: HashSet<ToolCallId>,
    thinking_open: bool,
}

impl SequenceState {
    fn check(&mut self, event: &Event) -> Result<(), String> {
        event.validate().map_err(|e| e.to_string())?;

        if self.terminated && !matches!(event, Event::RunStarted(_)) {
            return Err("run already terminated".to_string());
        }

        match event {
            Event::RunStarted(e) => {
                if let Some(active) = &self.active_run {
                    return Err(format!("run {active} is still active"));
                }
                if self.finished_runs.contains(&e.run_id) {
                    return Err(format!("run {} already finished", e.run_id));
                }
                self.active_run = Some(e.run_id.clone());
                self.terminated = false;
                self.active_steps.clear();
                self.open_messages.clear();
                self.open_tool_calls.clear();
                self.thinking_open = false;
            }
            Event::RunFinished(e) => {
                if self.active_run.as_ref() != Some(&e.run_id) {
                    return Err(format!("run {} was not started", e.run_id));
                }
                if let Some(step) = self.active_steps.iter().min() {
                    return Err(format!("step {step} is still active"));
                }
                self.terminate();
            }
            Event::RunError(_) => self.terminate(),
            Event::StepStarted(e) => {
                if !self.active_steps.insert(e.step_name.clone()) {
                    return Err(format!("step {} already active", e.step_name));
                }
            }
            Event::StepFinished(e) => {
                if !self.active_steps.remove(&e.step_name) {
                    return Err(format!("step {} is not active", e.step_name));
                }
            }
            Event::TextMessageStart(e) => {
                if self.closed_messages.contains(&e.message_id) {
                    return Err(format!("message {} already closed", e.message_id));
                }
                if !self.open_messages.insert(e.message_id.clone()) {
                    return Err(format!("message {} already open", e.message_id));
                }
            }
            Event::TextMessageContent(e) => {
                if !self.open_messages.contains(&e.message_id) {
                    return Err(format!("message {} is not open", e.message_id));
                }
            }
            Event::TextMessageEnd(e) => {
                if !self.open_messages.remove(&e.message_id) {
                    return Err(format!("message {} is not open", e.message_id));
                }
                self.closed_messages.insert(e.message_id.clone());
            }
            Event::ToolCallStart(e) => {
                if self.closed_tool_calls.contains(&e.tool_call_id) {
                    return Err(format!("tool call {} already closed", e.tool_call_id));
                }
                if !self.open_tool_calls.insert(e.tool_call_id.clone()) {
                    return Err(format!("tool call {} already open", e.tool_call_id));
                }
            }
            Event::ToolCallArgs(e) => {
                if !self.open_tool_calls.contains(&e.tool_call_id) {
                    return Err(format!("tool call {} is not open", e.tool_call_id));
                }
            }
            Event::ToolCallEnd(e) => {
                if !self.open_tool_calls.remove(&e.tool_call_id) {
                    return Err(format!("tool call {} is not open", e.tool_call_id));
                }
                self.closed_tool_calls.insert(e.tool_call_id.clone());
            }
            Event::ThinkingTextMessageStart(_) => {
                if self.thinking_open {
                    return Err("thinking text already open".to_string());
                }
                self.thinking_open = true;
            }
            Event::ThinkingTextMessageContent(_) => {
                if !self.thinking_open {
                    return Err("thinking text is not open".to_string());
                }
            }
            Event::ThinkingTextMessageEnd(_) => {
                if !self.thinking_open {
                    return Err("thinking text is not open".to_string());
                }
                self.thinking_open = false;
            }
            _ => {}
        }
        Ok(())
    }

    fn terminate(&mut self) {
        if let Some(run) = self.active_run.take() {
            self.finished_runs.insert(run);
        }
        self.terminated = true;
    }
}

/// Checks that `events` form a well-ordered stream.
///
/// ```rust
/// use agui_core::sequence::validate_sequence;
/// use agui_core::{Event, RunFinishedEvent, RunStartedEvent, TextMessageEndEvent};
///
/// let ok: Vec<Event> = vec![
///     RunStartedEvent::new("t1", "r1").into(),
///     RunFinishedEvent::new("t1", "r1").into(),
/// ];
/// assert!(validate_sequence(&ok).is_ok());
///
/// let bad: Vec<Event> = vec![TextMessageEndEvent::new("m1").into()];
/// assert_eq!(validate_sequence(&bad).unwrap_err().index, 0);
/// ```
pub fn validate_sequence(events: &[Event]) -> Result<(), SequenceError> {
    let mut state = SequenceState::default();
    for (index, event) in events.iter().enumerate() {
        state.check(event).map_err(|reason| SequenceError {
            index,
            event_type: event.event_type(),
            reason,
        })?;
    }
    Ok(())
}
