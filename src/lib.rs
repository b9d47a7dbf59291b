//! # agui-ctl
//!
//! Command line tooling for recorded AG-UI event streams.
//!
//! ## Features
//!
//! - **Replay**: decode a stream and rebuild its messages, tool calls and state
//! - **Validate**: check a stream against the event ordering rules
//! - **Encode**: push a stream through the producer pipeline into the
//!   format an `Accept` header negotiates
//!
//! Both event-stream and newline-delimited JSON recordings are accepted;
//! the framing is detected from the content unless `--format` is given.

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;

pub use error::{CliError, Result};
pub use handlers::*;

use agui_core::DecodeMode;
use cli::Commands;
use config::types::{Config, OutputFormat};

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run one command. Flags take precedence over `config`.
pub async fn run_command(command: Commands, config: &Config, json: bool) -> Result<()> {
    let json = json || config.output.format == OutputFormat::Json;

    match command {
        Commands::Replay { file, format, passthrough, strict, thread } => {
            let options = ReplayOptions {
                format: format.map(Into::into),
                mode: decode_mode(passthrough || config.decode.passthrough_unknown),
                strict: strict || config.decode.strict,
                thread,
                json,
            };
            handlers::handle_replay(file, options)
        }
        Commands::Validate { file, format } => {
            handlers::handle_validate(file, format.map(Into::into), json)
        }
        Commands::Encode { file, format, accept, capacity, output } => {
            let accept = accept.as_deref().unwrap_or(&config.stream.accept);
            handlers::handle_encode(
                file,
                format.map(Into::into),
                decode_mode(config.decode.passthrough_unknown),
                accept,
                capacity.unwrap_or(config.stream.channel_capacity),
                output,
            )
            .await
        }
    }
}

fn decode_mode(passthrough: bool) -> DecodeMode {
    if passthrough {
        DecodeMode::Passthrough
    } else {
        DecodeMode::Strict
    }
}
