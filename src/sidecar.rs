//! Per-team metadata sidecars.

use snafu::ResultExt as _;
use std::{fs, path::Path};

use crate::{dataset::TeamBucket, error::MetadataWriteSnafu, Result};

/// Writes `bucket` as pretty-printed JSON at `path`, replacing any existing file. Serialization
/// order follows the struct fields, so repeated writes of the same bucket are byte-identical.
pub fn write_metadata(bucket: &TeamBucket, path: &Path) -> Result<()> {
    log::debug!("Saving metadata to {}", path.display());
    let json = serde_json::to_string_pretty(bucket).context(MetadataWriteSnafu { path })?;
    fs::write(path, json)
        .map_err(serde_json::Error::io)
        .context(MetadataWriteSnafu { path })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn bucket() -> TeamBucket {
        TeamBucket {
            original_playlist_metadata: json!({"league": "eliteserien"}),
            videos: serde_json::from_value(json!([{
                "home_team": {"short_name": "VIF"},
                "video_url": "https://example.com/a.m3u8",
                "video_asset_id": 1,
                "playlist_id": "pl-1",
            }]))
            .unwrap(),
        }
    }

    #[test]
    fn test_write_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("VIF_metadata.json");
        let bucket = bucket();
        write_metadata(&bucket, &path).unwrap();
        let first = fs::read(&path).unwrap();
        write_metadata(&bucket, &path).unwrap();
        let second = fs::read(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_written_json_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("VIF_metadata.json");
        write_metadata(&bucket(), &path).unwrap();
        let value: serde_json::Value =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(value["original_playlist_metadata"]["league"], "eliteserien");
        assert_eq!(value["videos"].as_array().unwrap().len(), 1);
        assert_eq!(value["videos"][0]["video_asset_id"], json!(1));
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("VIF_metadata.json");
        let result = write_metadata(&bucket(), &path);
        assert!(matches!(result, Err(Error::MetadataWrite { .. })));
    }
}
