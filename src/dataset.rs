//! Loading of the playlist dataset and grouping of its videos by team.

use rand::{seq::index, Rng};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use snafu::{ensure, ResultExt as _};
use std::{
    collections::HashMap,
    fmt::{self, Display, Formatter},
    fs::File,
    io::BufReader,
    path::Path,
};

use crate::{
    error::{ParseSnafu, SampleTooLargeSnafu},
    Error, Result,
};

/// An asset or playlist identifier. The upstream playlist API is not consistent about whether
/// these are JSON numbers or strings, so both forms round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(i64),
    Text(String),
}

impl Display for Id {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{}", n),
            Id::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRef {
    pub short_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One video of the source playlist. Unrecognized attributes are retained in `extra` so the
/// metadata sidecar carries the source entries in full, not just the fields used here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoEntry {
    pub home_team: TeamRef,
    pub video_url: String,
    pub video_asset_id: Id,
    pub playlist_id: Id,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Dataset {
    pub metadata: Value,
    pub videos: Vec<VideoEntry>,
}

/// The per-team slice of the dataset, as written to the metadata sidecar.
#[derive(Debug, Clone, Serialize)]
pub struct TeamBucket {
    pub original_playlist_metadata: Value,
    pub videos: Vec<VideoEntry>,
}

/// Replaces one team's video list with a random sample of `size` videos.
#[derive(Debug, Clone)]
pub struct SamplePlan {
    pub team: String,
    pub size: usize,
}

/// Loads the dataset at `path` and buckets its videos by `home_team.short_name`. Every entry of
/// `teams` gets a bucket, even with zero matching videos; videos of teams outside the allow-list
/// are dropped. Source order is preserved unless `sample` replaces a team's list with an
/// unordered random subset.
pub fn parse_dataset<R: Rng>(
    path: &Path,
    teams: &[String],
    sample: Option<&SamplePlan>,
    rng: &mut R,
) -> Result<HashMap<String, TeamBucket>> {
    log::info!("Parsing dataset {}", path.display());
    let file = File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::DatasetNotFound { path: path.into() }
        } else {
            Error::Io { source }
        }
    })?;
    let dataset: Dataset =
        serde_json::from_reader(BufReader::new(file)).context(ParseSnafu { path })?;

    let mut buckets: HashMap<String, TeamBucket> = teams
        .iter()
        .map(|team| {
            (
                team.clone(),
                TeamBucket {
                    original_playlist_metadata: dataset.metadata.clone(),
                    videos: Vec::new(),
                },
            )
        })
        .collect();
    for video in dataset.videos {
        if let Some(bucket) = buckets.get_mut(&video.home_team.short_name) {
            bucket.videos.push(video);
        }
    }

    if let Some(plan) = sample {
        match buckets.get_mut(&plan.team) {
            Some(bucket) => {
                sample_videos(bucket, plan.size, rng)?;
                log::debug!("Sampled down to {} videos for {}", plan.size, plan.team);
            }
            None => log::warn!(
                "Sampling requested for {}, which is not in the allow-list",
                plan.team
            ),
        }
    }
    log::debug!("Done parsing dataset");
    Ok(buckets)
}

fn sample_videos<R: Rng>(bucket: &mut TeamBucket, size: usize, rng: &mut R) -> Result<()> {
    ensure!(
        size <= bucket.videos.len(),
        SampleTooLargeSnafu {
            requested: size,
            available: bucket.videos.len(),
        }
    );
    let keep = index::sample(rng, bucket.videos.len(), size);
    let sampled = keep.iter().map(|i| bucket.videos[i].clone()).collect();
    bucket.videos = sampled;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng as _};
    use serde_json::json;
    use std::{fs, path::PathBuf};
    use tempfile::tempdir;

    fn team_strings(teams: &[&str]) -> Vec<String> {
        teams.iter().map(|t| String::from(*t)).collect()
    }

    fn write_dataset(dir: &Path, videos: &[(&str, u32)]) -> PathBuf {
        let videos: Vec<Value> = videos
            .iter()
            .map(|(team, n)| {
                json!({
                    "home_team": {"short_name": team, "name": format!("{} FK", team)},
                    "video_url": format!("https://example.com/{}/{}.m3u8", team, n),
                    "video_asset_id": n,
                    "playlist_id": format!("pl-{}", n),
                    "duration": 25,
                })
            })
            .collect();
        let path = dir.join("playlist.json");
        let doc = json!({"metadata": {"league": "eliteserien", "season": 2025}, "videos": videos});
        fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_one_bucket_per_allowed_team() {
        let dir = tempdir().unwrap();
        let path = write_dataset(dir.path(), &[("BRA", 1), ("VIF", 2), ("BRA", 3), ("XXX", 4)]);
        let teams = team_strings(&["BRA", "VIF", "RBK"]);
        let buckets =
            parse_dataset(&path, &teams, None, &mut rand::thread_rng()).unwrap();
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets["BRA"].videos.len(), 2);
        assert_eq!(buckets["VIF"].videos.len(), 1);
        assert_eq!(buckets["RBK"].videos.len(), 0);
        let total: usize = buckets.values().map(|b| b.videos.len()).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_source_order_preserved() {
        let dir = tempdir().unwrap();
        let path = write_dataset(dir.path(), &[("BRA", 3), ("BRA", 1), ("BRA", 2)]);
        let teams = team_strings(&["BRA"]);
        let buckets =
            parse_dataset(&path, &teams, None, &mut rand::thread_rng()).unwrap();
        let ids: Vec<String> = buckets["BRA"]
            .videos
            .iter()
            .map(|v| v.video_asset_id.to_string())
            .collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_metadata_carried_into_buckets() {
        let dir = tempdir().unwrap();
        let path = write_dataset(dir.path(), &[("BRA", 1)]);
        let teams = team_strings(&["BRA"]);
        let buckets =
            parse_dataset(&path, &teams, None, &mut rand::thread_rng()).unwrap();
        assert_eq!(
            buckets["BRA"].original_playlist_metadata["league"],
            json!("eliteserien")
        );
    }

    #[test]
    fn test_missing_file() {
        let teams = team_strings(&["BRA"]);
        let result = parse_dataset(
            Path::new("/no/such/playlist.json"),
            &teams,
            None,
            &mut rand::thread_rng(),
        );
        assert!(matches!(result, Err(Error::DatasetNotFound { .. })));
    }

    #[test]
    fn test_malformed_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("playlist.json");
        fs::write(&path, "{\"metadata\": {}").unwrap();
        let teams = team_strings(&["BRA"]);
        let result = parse_dataset(&path, &teams, None, &mut rand::thread_rng());
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_sampling_is_seeded_and_subsets() {
        let dir = tempdir().unwrap();
        let videos: Vec<(&str, u32)> = (0..20).map(|n| ("VIF", n)).collect();
        let path = write_dataset(dir.path(), &videos);
        let teams = team_strings(&["VIF"]);
        let plan = SamplePlan {
            team: String::from("VIF"),
            size: 5,
        };
        let first = parse_dataset(&path, &teams, Some(&plan), &mut StdRng::seed_from_u64(7))
            .unwrap();
        let second = parse_dataset(&path, &teams, Some(&plan), &mut StdRng::seed_from_u64(7))
            .unwrap();
        let ids = |buckets: &HashMap<String, TeamBucket>| -> Vec<String> {
            buckets["VIF"]
                .videos
                .iter()
                .map(|v| v.video_asset_id.to_string())
                .collect()
        };
        assert_eq!(first["VIF"].videos.len(), 5);
        assert_eq!(ids(&first), ids(&second));
        // every sampled entry must exist in the source, exactly once
        let mut seen = ids(&first);
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn test_sample_larger_than_population() {
        let dir = tempdir().unwrap();
        let path = write_dataset(dir.path(), &[("VIF", 1), ("VIF", 2)]);
        let teams = team_strings(&["VIF"]);
        let plan = SamplePlan {
            team: String::from("VIF"),
            size: 3,
        };
        let result = parse_dataset(&path, &teams, Some(&plan), &mut rand::thread_rng());
        assert!(matches!(
            result,
            Err(Error::SampleTooLarge {
                requested: 3,
                available: 2,
            })
        ));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(Id::Number(12158).to_string(), "12158");
        assert_eq!(Id::Text(String::from("pl-9")).to_string(), "pl-9");
    }

    #[test]
    fn test_extra_attributes_survive() {
        let dir = tempdir().unwrap();
        let path = write_dataset(dir.path(), &[("BRA", 1)]);
        let teams = team_strings(&["BRA"]);
        let buckets =
            parse_dataset(&path, &teams, None, &mut rand::thread_rng()).unwrap();
        assert_eq!(buckets["BRA"].videos[0].extra["duration"], json!(25));
        assert_eq!(
            buckets["BRA"].videos[0].home_team.extra["name"],
            json!("BRA FK")
        );
    }
}
