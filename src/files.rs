//! Output name construction.

use crate::dataset::VideoEntry;

/// A convenience function to make a team key usable as a single path component. Keys like
/// `"B/G"` appear in the source data and must not create nested directories.
pub fn sanitize_team_key(team: &str) -> String {
    team.replace(['/', '\\'], "_")
}

/// The file name pattern the extraction tool expands per frame. `%03d` becomes the zero-padded
/// frame counter.
pub fn frame_file_pattern(team: &str, video: &VideoEntry) -> String {
    format!(
        "{}_{}_{}_%03d.jpg",
        sanitize_team_key(team),
        video.video_asset_id,
        video.playlist_id
    )
}

pub fn metadata_file_name(team: &str) -> String {
    format!("{}_metadata.json", sanitize_team_key(team))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Id, TeamRef};
    use serde_json::Map;

    fn entry(team: &str, asset_id: Id, playlist_id: Id) -> VideoEntry {
        VideoEntry {
            home_team: TeamRef {
                short_name: String::from(team),
                extra: Map::new(),
            },
            video_url: String::from("https://example.com/manifest.m3u8"),
            video_asset_id: asset_id,
            playlist_id,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_sanitize_team_key() {
        assert_eq!(sanitize_team_key("BRA"), "BRA");
        assert_eq!(sanitize_team_key("B/G"), "B_G");
        assert_eq!(sanitize_team_key("A\\B"), "A_B");
    }

    #[test]
    fn test_frame_file_pattern() {
        let video = entry("B/G", Id::Number(12158), Id::Text(String::from("pl-7")));
        assert_eq!(
            frame_file_pattern("B/G", &video),
            "B_G_12158_pl-7_%03d.jpg"
        );
    }

    #[test]
    fn test_metadata_file_name() {
        assert_eq!(metadata_file_name("VIF"), "VIF_metadata.json");
        assert_eq!(metadata_file_name("B/G"), "B_G_metadata.json");
    }
}
