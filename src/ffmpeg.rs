//! Thin command-construction wrappers around the external `ffprobe` and `ffmpeg` binaries.
//!
//! All manifest parsing, transcoding, and frame decoding happens inside the external tool; this
//! module only builds well-formed invocations and interprets exit status plus diagnostic output.

use std::{path::PathBuf, process::Command};

use crate::{
    error::{ExtractionSnafu, ProbeSnafu},
    probe::{self, StreamInfo},
    util, Result,
};

/// One frame-extraction request: sample `url`'s stream `stream_index` at `fps` frames per
/// second, writing JPEGs at `jpeg_quality` to the numbered `output_pattern`.
#[derive(Debug, Clone)]
pub struct ExtractJob {
    pub url: String,
    pub stream_index: u32,
    pub fps: u32,
    pub jpeg_quality: u32,
    pub output_pattern: PathBuf,
}

/// The media tool boundary. Production code shells out via [`FfmpegCli`]; tests substitute a
/// fake so no binary or network round trip is needed.
pub trait MediaTool {
    fn probe_streams(&self, url: &str) -> Result<Vec<StreamInfo>>;
    fn extract_frames(&self, job: &ExtractJob) -> Result<()>;
}

/// Runs the `ffprobe`/`ffmpeg` binaries found on `PATH`, or wherever the `FFPROBE`/`FFMPEG`
/// environment variables point.
#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegCli;

impl FfmpegCli {
    pub fn new() -> Self {
        Self
    }
}

impl MediaTool for FfmpegCli {
    fn probe_streams(&self, url: &str) -> Result<Vec<StreamInfo>> {
        log::debug!("Probing {}", url);
        let output = Command::new(util::ENV.ffprobe_path())
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(url)
            .output()?;
        if !output.status.success() {
            return ProbeSnafu {
                url,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
            .fail();
        }
        probe::parse_streams(&output.stdout)
    }

    fn extract_frames(&self, job: &ExtractJob) -> Result<()> {
        log::debug!(
            "Extracting frames from {} to {}",
            job.url,
            job.output_pattern.display()
        );
        let output = Command::new(util::ENV.ffmpeg_path())
            .arg("-y")
            .args(["-i", &job.url])
            .args(["-map", &format!("0:{}", job.stream_index)])
            .args(["-vf", &format!("fps={}", job.fps)])
            .args(["-q:v", &job.jpeg_quality.to_string()])
            .arg(&job.output_pattern)
            .output()?;
        if !output.status.success() {
            return ExtractionSnafu {
                url: job.url.clone(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
            .fail();
        }
        Ok(())
    }
}
