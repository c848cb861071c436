//! Stream descriptors as reported by the probe tool, and quality selection.

use serde::Deserialize;

use crate::{error::NoVideoStreamSnafu, Result};

/// One stream of a probed media source. Width is absent for non-video streams and for some
/// manifest entries, in which case the stream ranks lowest during selection.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamInfo {
    pub index: u32,
    pub codec_type: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<StreamInfo>,
}

/// Parses the JSON document `ffprobe -print_format json -show_streams` writes to stdout.
pub fn parse_streams(raw: &[u8]) -> Result<Vec<StreamInfo>> {
    let output: ProbeOutput = serde_json::from_slice(raw)?;
    Ok(output.streams)
}

/// Picks the widest video stream and returns its index. Ties keep the first-encountered stream,
/// so the result is deterministic given the probe's ordering.
pub fn highest_quality_stream(streams: &[StreamInfo], url: &str) -> Result<u32> {
    let mut best: Option<&StreamInfo> = None;
    for stream in streams.iter().filter(|s| s.codec_type == "video") {
        match best {
            Some(b) if stream.width.unwrap_or(0) <= b.width.unwrap_or(0) => {}
            _ => best = Some(stream),
        }
    }
    match best {
        Some(stream) => Ok(stream.index),
        None => NoVideoStreamSnafu { url }.fail(),
    }
}
