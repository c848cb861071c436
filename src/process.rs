//! Drives the extraction batch: teams, then videos, then the per-team metadata sidecar.

use indicatif::{MultiProgress, ProgressBar};
use rayon::prelude::*;
use std::{collections::HashMap, fs::DirBuilder, path::Path};

use crate::{
    cli,
    dataset::{TeamBucket, VideoEntry},
    ffmpeg::{ExtractJob, MediaTool},
    files, probe, sidecar, util, Result,
};

/// Knobs the orchestrator needs beyond the bucket map itself.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub fps: u32,
    pub jpeg_quality: u32,
    pub synchronous: bool,
}

/// Processes every team of `teams` in order. A failing video never aborts the batch; a failing
/// sidecar write never aborts the remaining teams. The sidecar is written only after all of a
/// team's videos were attempted.
pub fn process_teams<T: MediaTool + Sync>(
    tool: &T,
    mp: &MultiProgress,
    buckets: &HashMap<String, TeamBucket>,
    teams: &[String],
    out_root: &Path,
    options: &ExtractOptions,
) -> Result<()> {
    for team in teams {
        match buckets.get(team) {
            Some(bucket) => process_team(tool, mp, team, bucket, out_root, options)?,
            None => log::warn!("No bucket for {}; skipping", team),
        }
    }
    log::info!("Done extracting frames for all teams");
    Ok(())
}

fn process_team<T: MediaTool + Sync>(
    tool: &T,
    mp: &MultiProgress,
    team: &str,
    bucket: &TeamBucket,
    out_root: &Path,
    options: &ExtractOptions,
) -> Result<()> {
    let team_dir = out_root.join(files::sanitize_team_key(team));
    DirBuilder::new().recursive(true).create(&team_dir)?;
    log::info!("Extracting frames for {}...", team);
    let pbar = mp.add(ProgressBar::new(bucket.videos.len() as u64));
    pbar.set_style(cli::PROGRESS_BAR_STYLE.clone());
    pbar.set_prefix(String::from(team));

    let process = |video: &VideoEntry| -> bool {
        process_video(&pbar, tool, team, video, &team_dir, options)
    };
    let failures = if options.synchronous {
        bucket.videos.iter().map(process).filter(|ok| !ok).count()
    } else {
        bucket
            .videos
            .par_iter()
            .map(process)
            .filter(|ok| !ok)
            .count()
    };
    if failures > 0 {
        pbar.set_style(cli::ERROR_PROGRESS_BAR_STYLE.clone());
        pbar.abandon_with_message(format!(
            "{} of {} videos failed",
            failures,
            bucket.videos.len()
        ));
    } else {
        pbar.finish_with_message("done");
    }

    log::info!("Saving metadata for {}", team);
    let metadata_path = team_dir.join(files::metadata_file_name(team));
    if let Err(error) = sidecar::write_metadata(bucket, &metadata_path) {
        log::error!("{}", error);
    }
    log::info!("Done getting videos for {}", team);
    Ok(())
}

#[allow(clippy::panicking_unwrap)]
fn process_video<T: MediaTool>(
    pbar: &ProgressBar,
    tool: &T,
    team: &str,
    video: &VideoEntry,
    team_dir: &Path,
    options: &ExtractOptions,
) -> bool {
    pbar.set_message(util::safe_string_truncate(&video.video_url, 60));
    let result = extract_video(tool, team, video, team_dir, options);
    pbar.inc(1);
    if util::ENV.unwrap_errors() && result.is_err() {
        result.unwrap();
        return true;
    }
    if let Err(error) = result {
        log::error!("Video {} failed: {}", video.video_asset_id, error);
        return false;
    }
    true
}

fn extract_video<T: MediaTool>(
    tool: &T,
    team: &str,
    video: &VideoEntry,
    team_dir: &Path,
    options: &ExtractOptions,
) -> Result<()> {
    let streams = tool.probe_streams(&video.video_url)?;
    let stream_index = probe::highest_quality_stream(&streams, &video.video_url)?;
    let job = ExtractJob {
        url: video.video_url.clone(),
        stream_index,
        fps: options.fps,
        jpeg_quality: options.jpeg_quality,
        output_pattern: team_dir.join(files::frame_file_pattern(team, video)),
    };
    tool.extract_frames(&job)
}
