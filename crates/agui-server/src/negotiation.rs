//! `Accept` header negotiation.
//!
//! Media ranges are ranked by quality value, then by specificity
//! (`type/sub` beats `type/*` beats `*/*`), then by position in the header.
//! Ranges with `q=0` are excluded. When nothing recognizable remains the
//! event-stream format is used, as if `*/*` had been sent.

use agui_core::WireFormat;

/// Picks the wire format for an `Accept` header value.
///
/// ```rust
/// use agui_core::WireFormat;
/// use agui_server::negotiation::negotiate;
///
/// assert_eq!(negotiate(None), WireFormat::Sse);
/// assert_eq!(negotiate(Some("application/x-ndjson")), WireFormat::Ndjson);
/// assert_eq!(
///     negotiate(Some("text/event-stream;q=0.5, application/json")),
///     WireFormat::Ndjson
/// );
/// ```
pub fn negotiate(accept: Option<&str>) -> WireFormat {
    let mut best: Option<(f32, u8, WireFormat)> = None;

    for range in accept.unwrap_or_default().split(',') {
        let mut parts = range.split(';');
        let media = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
        let Some((format, specificity)) = classify(&media) else {
            continue;
        };

        let quality = parts.find_map(parse_quality).unwrap_or(1.0);
        if quality <= 0.0 {
            continue;
        }

        let better = match best {
            None => true,
            Some((q, s, _)) => quality > q || (quality == q && specificity > s),
        };
        if better {
            best = Some((quality, specificity, format));
        }
    }

    best.map(|(_, _, format)| format).unwrap_or_default()
}

/// Maps a media range to its format and specificity rank.
fn classify(media: &str) -> Option<(WireFormat, u8)> {
    match media {
        "text/event-stream" => Some((WireFormat::Sse, 2)),
        "application/x-ndjson"
        | "application/jsonl"
        | "application/json-lines"
        | "application/json" => Some((WireFormat::Ndjson, 2)),
        "text/*" => Some((WireFormat::Sse, 1)),
        "*/*" => Some((WireFormat::Sse, 0)),
        _ => None,
    }
}

fn parse_quality(param: &str) -> Option<f32> {
    let (key, value) = param.split_once('=')?;
    if !key.trim().eq_ignore_ascii_case("q") {
        return None;
    }
    // Malformed q values count as 1.0, clamped to the RFC range otherwise.
    Some(value.trim().parse::<f32>().map_or(1.0, |q| q.clamp(0.0, 1.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_missing_and_empty_headers_default_to_sse() {
        assert_eq!(negotiate(None), WireFormat::Sse);
        assert_eq!(negotiate(Some("")), WireFormat::Sse);
        assert_eq!(negotiate(Some("   ")), WireFormat::Sse);
    }

    #[test]
    fn test_unrecognized_header_defaults_to_sse() {
        assert_eq!(negotiate(Some("text/html, image/png")), WireFormat::Sse);
    }

    #[test]
    fn test_ndjson_family() {
        for accept in [
            "application/x-ndjson",
            "application/jsonl",
            "application/json-lines",
            "application/json",
            "Application/JSON",
        ] {
            assert_eq!(negotiate(Some(accept)), WireFormat::Ndjson, "{accept}");
        }
    }

    #[test]
    fn test_wildcards_map_to_sse() {
        assert_eq!(negotiate(Some("*/*")), WireFormat::Sse);
        assert_eq!(negotiate(Some("text/*")), WireFormat::Sse);
    }

    #[test]
    fn test_quality_ordering() {
        assert_eq!(
            negotiate(Some("text/event-stream;q=0.2, application/x-ndjson;q=0.8")),
            WireFormat::Ndjson
        );
        assert_eq!(
            negotiate(Some("application/x-ndjson; q=0.1, text/event-stream")),
            WireFormat::Sse
        );
    }

    #[test]
    fn test_specificity_breaks_ties() {
        assert_eq!(negotiate(Some("*/*, application/x-ndjson")), WireFormat::Ndjson);
        assert_eq!(negotiate(Some("text/*, application/json")), WireFormat::Ndjson);
    }

    #[test]
    fn test_zero_quality_excluded() {
        assert_eq!(
            negotiate(Some("text/event-stream;q=0, application/x-ndjson;q=0.3")),
            WireFormat::Ndjson
        );
        assert_eq!(negotiate(Some("application/x-ndjson;q=0")), WireFormat::Sse);
    }

    #[test]
    fn test_malformed_quality_counts_as_one() {
        assert_eq!(
            negotiate(Some("text/event-stream;q=0.5, application/json;q=abc")),
            WireFormat::Ndjson
        );
    }

    proptest! {
        #[test]
        fn test_negotiation_never_panics(accept in ".*") {
            let _ = negotiate(Some(&accept));
        }
    }
}
