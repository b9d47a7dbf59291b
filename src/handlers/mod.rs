// Handler modules
pub mod encode;
pub mod replay;
pub mod validate;

// Re-export all handler functions
pub use encode::handle_encode;
pub use replay::{handle_replay, ReplayOptions};
pub use validate::handle_validate;

use agui_core::WireFormat;
use std::fs;
use std::path::Path;

/// Read a recorded stream, detecting its framing unless one is given
pub(crate) fn read_stream(file: &Path, format: Option<WireFormat>) -> crate::Result<(String, WireFormat)> {
    let text = fs::read_to_string(file)?;
    let format = format.unwrap_or_else(|| WireFormat::sniff(&text));
    log::info!("reading {} as {}", file.display(), format);
    Ok((text, format))
}
