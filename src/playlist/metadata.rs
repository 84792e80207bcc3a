use crate::models::TrackCandidate;
use std::collections::HashSet;

/// Represents a generated playlist with metadata
#[derive(Debug, Clone)]
pub struct Playlist {
    pub name: String,
    pub tracks: Vec<TrackCandidate>, // Ascending popularity
    pub public: bool,
    pub metadata: PlaylistMetadata,
}

impl Playlist {
    pub fn track_uris(&self) -> Vec<String> {
        self.tracks
            .iter()
            .map(|track| track.catalog_track_uri.clone())
            .collect()
    }
}

/// How the run narrowed events down to the final track list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaylistMetadata {
    pub source: String,
    pub events_fetched: usize,
    pub events_kept: usize,
    pub performers: usize,
    pub performers_resolved: usize,
    pub performers_missed: usize,
    pub candidates: usize,
    pub selected: usize,
    pub performer_count: usize, // Distinct performers in the final list
    pub popularity_range: Option<(u32, u32)>,
    pub avg_popularity: f32,
    pub aborted: bool, // Catalog lookups stopped before every performer was checked
}

impl PlaylistMetadata {
    /// Fill in the track-level figures from the final selection
    pub fn record_selection(&mut self, tracks: &[TrackCandidate]) {
        self.selected = tracks.len();
        self.performer_count = tracks
            .iter()
            .map(|track| track.performer_name.as_str())
            .collect::<HashSet<_>>()
            .len();

        let min = tracks.iter().map(|track| track.popularity).min();
        let max = tracks.iter().map(|track| track.popularity).max();
        self.popularity_range = min.zip(max);

        self.avg_popularity = if tracks.is_empty() {
            0.0
        } else {
            tracks.iter().map(|track| track.popularity as f32).sum::<f32>() / tracks.len() as f32
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn create_track(performer: &str, id: &str, popularity: u32) -> TrackCandidate {
        TrackCandidate {
            performer_name: performer.to_string(),
            catalog_artist_id: format!("artist-{performer}"),
            catalog_track_id: id.to_string(),
            catalog_track_uri: format!("spotify:track:{id}"),
            catalog_track_name: format!("Track {id}"),
            popularity,
        }
    }

    #[test]
    fn test_record_selection() {
        let tracks = vec![
            create_track("A", "1", 10),
            create_track("A", "2", 40),
            create_track("B", "3", 70),
        ];
        let mut metadata = PlaylistMetadata::default();
        metadata.record_selection(&tracks);

        assert_eq!(metadata.selected, 3);
        assert_eq!(metadata.performer_count, 2);
        assert_eq!(metadata.popularity_range, Some((10, 70)));
        assert_relative_eq!(metadata.avg_popularity, 40.0);
    }

    #[test]
    fn test_record_empty_selection() {
        let mut metadata = PlaylistMetadata::default();
        metadata.record_selection(&[]);
        assert_eq!(metadata.selected, 0);
        assert_eq!(metadata.popularity_range, None);
        assert_relative_eq!(metadata.avg_popularity, 0.0);
    }

    #[test]
    fn test_track_uris_keep_order() {
        let playlist = Playlist {
            name: "Test".to_string(),
            tracks: vec![create_track("A", "1", 10), create_track("B", "2", 20)],
            public: false,
            metadata: PlaylistMetadata::default(),
        };
        assert_eq!(
            playlist.track_uris(),
            vec!["spotify:track:1", "spotify:track:2"]
        );
    }
}
