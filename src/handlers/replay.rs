use agui_client::{decode_all, ClientError, Frame, ProtocolViolation, Reducer, RunStatus, ThreadRegistry};
use agui_core::{DecodeMode, JsonValue, Message, RunId, ThreadId, ToolCall, WireFormat};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

/// Events seen before any `RUN_STARTED` land in this thread.
const DEFAULT_THREAD: &str = "default";

#[derive(Debug, Clone)]
pub struct ReplayOptions {
    pub format: Option<WireFormat>,
    pub mode: DecodeMode,
    pub strict: bool,
    pub thread: Option<String>,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ReplayReport<'a> {
    format: WireFormat,
    events: usize,
    frame_errors: Vec<String>,
    threads: Vec<ThreadReport<'a>>,
}

#[derive(Debug, Serialize)]
struct ThreadReport<'a> {
    thread_id: &'a ThreadId,
    run_id: Option<&'a RunId>,
    status: RunStatus,
    messages: &'a [Message],
    tool_calls: &'a [ToolCall],
    state: Option<&'a JsonValue>,
    thinking: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a JsonValue>,
    violations: &'a [ProtocolViolation],
}

impl<'a> ThreadReport<'a> {
    fn new(thread_id: &'a ThreadId, reducer: &'a Reducer) -> Self {
        Self {
            thread_id,
            run_id: reducer.run_id(),
            status: reducer.status(),
            messages: reducer.messages(),
            tool_calls: reducer.tool_calls(),
            state: reducer.state(),
            thinking: reducer.thinking(),
            result: reducer.result(),
            violations: reducer.violations(),
        }
    }
}

/// Decode a recorded stream and print the conversation it rebuilds.
pub fn handle_replay(file: PathBuf, options: ReplayOptions) -> crate::Result<()> {
    let (text, format) = super::read_stream(&file, options.format)?;
    let fallback = ThreadId::from(DEFAULT_THREAD);

    let mut registry = ThreadRegistry::new();
    let mut events = 0;
    let mut frame_errors = Vec::new();

    for frame in decode_all(&text, format, options.mode) {
        match frame {
            Frame::Event(event) => {
                events += 1;
                let applied = registry.ingest(&event, &fallback);
                if options.strict {
                    applied.map_err(ClientError::from)?;
                }
            }
            Frame::Error(message) => {
                if options.strict {
                    return Err(ClientError::ErrorFrame(message).into());
                }
                log::warn!("server sent an error frame: {}", message);
                frame_errors.push(format!("error frame: {message}"));
            }
            Frame::Invalid { payload, error } => {
                if options.strict {
                    return Err(ClientError::Decode(error).into());
                }
                log::warn!("skipping invalid frame: {}", error);
                frame_errors.push(format!("{error}: {payload}"));
            }
        }
    }
    registry.end_chunks();

    let threads: Vec<ThreadReport> = registry
        .threads()
        .into_iter()
        .filter(|id| options.thread.as_deref().is_none_or(|wanted| id.as_str() == wanted))
        .filter_map(|id| registry.reducer(id).map(|reducer| ThreadReport::new(id, reducer)))
        .collect();

    if let Some(wanted) = &options.thread
        && threads.is_empty()
    {
        log::warn!("no events for thread {}", wanted);
    }

    let report = ReplayReport {
        format,
        events,
        frame_errors,
        threads,
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}

fn render_text(report: &ReplayReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {} events ({})\n",
        "Replayed".bold(),
        report.events,
        report.format
    ));

    for thread in &report.threads {
        let run = thread.run_id.map(RunId::as_str).unwrap_or("-");
        out.push_str(&format!(
            "\n{} {} (run {}, {})\n",
            "Thread".bold(),
            thread.thread_id.as_str().cyan(),
            run,
            status_label(thread.status)
        ));

        for message in thread.messages {
            out.push_str(&format!("  {}\n", render_message(message)));
        }
        for trace in thread.thinking {
            out.push_str(&format!("  {} {}\n", "thinking:".dimmed(), trace));
        }
        if let Some(state) = thread.state {
            out.push_str(&format!("  {} {}\n", "state:".blue(), state));
        }
        if let Some(result) = thread.result {
            out.push_str(&format!("  {} {}\n", "result:".blue(), result));
        }
        for violation in thread.violations {
            out.push_str(&format!("  {} {}\n", "violation:".red(), violation));
        }
    }

    for error in &report.frame_errors {
        out.push_str(&format!("{} {}\n", "frame:".red(), error));
    }
    out
}

fn render_message(message: &Message) -> String {
    let mut line = format!("{} {}", message.role().as_str().green(), message.id().as_str());
    if let Some(call_id) = message.tool_call_id() {
        line.push_str(&format!(" ({call_id})"));
    }
    if let Some(content) = message.content().filter(|c| !c.is_empty()) {
        line.push_str(&format!(": {content}"));
    }
    for call in message.tool_calls().unwrap_or_default() {
        line.push_str(&format!(" -> {}({})", call.function.name.yellow(), call.function.arguments));
    }
    line
}

fn status_label(status: RunStatus) -> colored::ColoredString {
    match status {
        RunStatus::Idle => "idle".dimmed(),
        RunStatus::Running => "running".yellow(),
        RunStatus::Finished => "finished".green(),
        RunStatus::Errored => "errored".red(),
    }
}
