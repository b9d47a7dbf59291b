use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub stream: StreamConfig,
    pub decode: DecodeConfig,
    pub output: OutputConfig,
}

/// Producer-side stream settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Accept header used by `encode` when none is given
    pub accept: String,
    /// Events buffered between producer and encoder
    pub channel_capacity: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            accept: agui_core::wire::EVENT_STREAM_CONTENT_TYPE.to_string(),
            channel_capacity: 64,
        }
    }
}

/// Decoding settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Wrap unknown event types as RAW events instead of rejecting them
    pub passthrough_unknown: bool,
    /// Make `replay` stop at the first error
    pub strict: bool,
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.stream.accept, "text/event-stream");
        assert_eq!(config.stream.channel_capacity, 64);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_partial_sections() {
        let config: Config = toml::from_str(
            r#"
            [stream]
            channel_capacity = 8

            [decode]
            passthrough_unknown = true

            [output]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.stream.channel_capacity, 8);
        assert_eq!(config.stream.accept, "text/event-stream");
        assert!(config.decode.passthrough_unknown);
        assert!(!config.decode.strict);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_unknown_output_format_rejected() {
        assert!(toml::from_str::<Config>("[output]\nformat = \"yaml\"").is_err());
    }
}
