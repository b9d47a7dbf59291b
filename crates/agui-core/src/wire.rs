//! Wire sub-formats shared by encoder and decoder.

use serde::{Deserialize, Serialize};

/// Content type of the event-stream format.
pub const EVENT_STREAM_CONTENT_TYPE: &str = "text/event-stream";

/// Content type of the newline-delimited JSON format.
pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// The two framings an event stream can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    /// `data: <json>\n\n` frames.
    #[default]
    #[serde(alias = "event-stream")]
    Sse,
    /// One JSON object per line.
    #[serde(alias = "jsonl")]
    Ndjson,
}

impl WireFormat {
    /// The `Content-Type` a response in this format carries.
    pub fn content_type(&self) -> &'static str {
        match self {
            WireFormat::Sse => EVENT_STREAM_CONTENT_TYPE,
            WireFormat::Ndjson => NDJSON_CONTENT_TYPE,
        }
    }

    /// Guesses the format of a recorded stream from its first non-blank line.
    ///
    /// A line starting with `{` means NDJSON; anything else is treated as an
    /// event stream.
    pub fn sniff(text: &str) -> Self {
        match text.lines().map(str::trim_start).find(|line| !line.is_empty()) {
            Some(line) if line.starts_with('{') => WireFormat::Ndjson,
            _ => WireFormat::Sse,
        }
    }
}

impl std::fmt::Display for WireFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WireFormat::Sse => f.write_str("sse"),
            WireFormat::Ndjson => f.write_str("ndjson"),
        }
    }
}

impl std::str::FromStr for WireFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sse" | "event-stream" => Ok(WireFormat::Sse),
            "ndjson" | "jsonl" => Ok(WireFormat::Ndjson),
            other => Err(format!("unknown wire format: {other}")),
        }
    }
}
