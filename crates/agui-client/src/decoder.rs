//! Incremental frame decoder for both wire formats.
//!
//! Network reads rarely line up with frame boundaries, so [`FrameDecoder`]
//! buffers partial lines and returns every frame a chunk completes.

use std::io::BufRead;

use agui_core::{decode_str, DecodeMode, Event, EventValidationError, WireFormat};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::ClientError;

/// One decoded frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// A valid protocol event.
    Event(Event),
    /// A fallback `event: error` frame sent when the server could not even
    /// encode a `RUN_ERROR`.
    Error(String),
    /// A frame whose payload is not a valid event.
    Invalid {
        /// The raw payload.
        payload: String,
        /// Why it was rejected.
        error: EventValidationError,
    },
}

/// Incremental decoder for one stream.
#[derive(Debug)]
pub struct FrameDecoder {
    format: WireFormat,
    mode: DecodeMode,
    buffer: String,
    data: Vec<String>,
    event_name: Option<String>,
}

impl FrameDecoder {
    /// Creates a strict decoder for `format`.
    pub fn new(format: WireFormat) -> Self {
        Self {
            format,
            mode: DecodeMode::Strict,
            buffer: String::new(),
            data: Vec::new(),
            event_name: None,
        }
    }

    /// Sets how unknown event types are handled.
    pub fn with_mode(mut self, mode: DecodeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Feeds a chunk and returns the frames it completed.
    pub fn push(&mut self, chunk: &str) -> Vec<Frame> {
        self.buffer.push_str(chunk);
        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=pos).collect();
            let line = line.trim_end_matches(['\n', '\r']);
            if let Some(frame) = self.line(line) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Flushes a trailing frame that was not terminated.
    pub fn finish(&mut self) -> Vec<Frame> {
        let rest = std::mem::take(&mut self.buffer);
        let mut frames = Vec::new();
        let rest = rest.trim_end_matches('\r');
        if !rest.is_empty() {
            frames.extend(self.line(rest));
        }
        if self.format == WireFormat::Sse {
            frames.extend(self.dispatch());
        }
        frames
    }

    fn line(&mut self, line: &str) -> Option<Frame> {
        match self.format {
            WireFormat::Sse => self.sse_line(line),
            WireFormat::Ndjson => self.ndjson_line(line),
        }
    }

    fn sse_line(&mut self, line: &str) -> Option<Frame> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = line.split_once(':').unwrap_or((line, ""));
        let value = value.strip_prefix(' ').unwrap_or(value);
        match field {
            "data" => self.data.push(value.to_string()),
            "event" => self.event_name = Some(value.to_string()),
            _ => debug!(field, "ignoring event-stream field"),
        }
        None
    }

    fn dispatch(&mut self) -> Option<Frame> {
        let event_name = self.event_name.take();
        if self.data.is_empty() {
            return None;
        }
        let payload = std::mem::take(&mut self.data).join("\n");
        if event_name.as_deref() == Some("error") {
            return Some(Frame::Error(error_message(&payload)));
        }
        Some(self.decode(payload))
    }

    fn ndjson_line(&mut self, line: &str) -> Option<Frame> {
        let line = line.trim();
        if line.is_empty() || line.starts_with(':') || line.starts_with("event:") {
            return None;
        }
        // Fallback error frames keep their event-stream shape in either format.
        if let Some(payload) = line.strip_prefix("data:") {
            return Some(Frame::Error(error_message(payload.trim_start())));
        }
        Some(self.decode(line.to_string()))
    }

    fn decode(&self, payload: String) -> Frame {
        match decode_str(&payload, self.mode) {
            Ok(event) => Frame::Event(event),
            Err(error) => Frame::Invalid { payload, error },
        }
    }
}

fn error_message(payload: &str) -> String {
    serde_json::from_str::<JsonValue>(payload)
        .ok()
        .and_then(|value| value.get("error").and_then(JsonValue::as_str).map(str::to_string))
        .unwrap_or_else(|| payload.to_string())
}

/// Decodes a complete recorded stream.
pub fn decode_all(text: &str, format: WireFormat, mode: DecodeMode) -> Vec<Frame> {
    let mut decoder = FrameDecoder::new(format).with_mode(mode);
    let mut frames = decoder.push(text);
    frames.extend(decoder.finish());
    frames
}

/// Reads and decodes a stream line by line.
pub fn read_frames<R: BufRead>(
    mut reader: R,
    format: WireFormat,
    mode: DecodeMode,
) -> Result<Vec<Frame>, ClientError> {
    let mut decoder = FrameDecoder::new(format).with_mode(mode);
    let mut frames = Vec::new();
    let mut line = String::new();
    while reader.read_line(&mut line)? > 0 {
        frames.extend(decoder.push(&line));
        line.clear();
    }
    frames.extend(decoder.finish());
    Ok(frames)
}

/// Decodes a stream and fails on the first frame that is not a valid event.
pub fn decode_events(text: &str, format: WireFormat, mode: DecodeMode) -> Result<Vec<Event>, ClientError> {
    decode_all(text, format, mode)
        .into_iter()
        .map(|frame| match frame {
            Frame::Event(event) => Ok(event),
            Frame::Error(message) => Err(ClientError::ErrorFrame(message)),
            Frame::Invalid { error, .. } => Err(ClientError::Decode(error)),
        })
        .collect()
}
