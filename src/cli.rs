use agui_core::WireFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agui-ctl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect recorded AG-UI event streams")]
#[command(long_about = "Decode recorded AG-UI event streams (event-stream or NDJSON framing), rebuild the conversation they describe, check their event ordering, and re-encode them into the format an Accept header negotiates.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format where applicable
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a recorded stream and rebuild the conversation it describes
    Replay {
        /// Recorded stream to read
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Framing of the file (detected from its content when omitted)
        #[arg(long, value_enum)]
        format: Option<StreamFormat>,

        /// Keep events of unknown type as RAW events instead of rejecting them
        #[arg(long)]
        passthrough: bool,

        /// Stop at the first invalid frame or protocol violation
        #[arg(long)]
        strict: bool,

        /// Only report this thread
        #[arg(long, value_name = "THREAD_ID")]
        thread: Option<String>,
    },

    /// Check that a recorded stream follows the event ordering rules
    Validate {
        /// Recorded stream to read
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Framing of the file (detected from its content when omitted)
        #[arg(long, value_enum)]
        format: Option<StreamFormat>,
    },

    /// Re-encode a recorded stream into the negotiated format
    Encode {
        /// Recorded stream to read
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Framing of the input file (detected from its content when omitted)
        #[arg(long, value_enum)]
        format: Option<StreamFormat>,

        /// Accept header to negotiate the output format with
        #[arg(long, value_name = "HEADER")]
        accept: Option<String>,

        /// Events buffered between producer and encoder
        #[arg(long, value_name = "N")]
        capacity: Option<usize>,

        /// Write frames to this file instead of stdout
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StreamFormat {
    Sse,
    Ndjson,
}

impl From<StreamFormat> for WireFormat {
    fn from(format: StreamFormat) -> Self {
        match format {
            StreamFormat::Sse => WireFormat::Sse,
            StreamFormat::Ndjson => WireFormat::Ndjson,
        }
    }
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
