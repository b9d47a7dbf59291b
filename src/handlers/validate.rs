use agui_client::decode_events;
use agui_core::{validate_sequence, DecodeMode, WireFormat};
use colored::Colorize;
use serde_json::json;
use std::path::PathBuf;

/// Check a recorded stream against the event ordering rules.
///
/// The first broken rule is returned as an error, so the process exits
/// non-zero.
pub fn handle_validate(file: PathBuf, format: Option<WireFormat>, json: bool) -> crate::Result<()> {
    let (text, format) = super::read_stream(&file, format)?;
    let events = decode_events(&text, format, DecodeMode::Strict)?;
    validate_sequence(&events)?;

    if json {
        let report = json!({
            "file": file.display().to_string(),
            "format": format,
            "events": events.len(),
            "valid": true,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} {} ({} events, {})",
            "✓".green(),
            file.display(),
            events.len(),
            format
        );
    }
    Ok(())
}
