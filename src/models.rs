use chrono::{Datelike, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// A concert listing, normalized from whichever event API produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub source: String,
    pub source_id: String,
    pub name: String,
    pub start_time: NaiveDateTime, // Local time at the venue
    pub venue: Venue,
    pub performers: Vec<Performer>,
}

/// A band or artist attached to one or more events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performer {
    pub source: String,
    pub source_id: String,
    pub name: String,
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub source: String,
    pub source_id: String,
    pub name: String,
    pub address: String, // Free-form, may span several lines
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub source: String,
    pub source_id: String,
    pub name: String,
}

impl Event {
    /// Weekday of the local start time
    pub fn weekday(&self) -> Weekday {
        self.start_time.weekday()
    }

    /// Genre names across all performers, in performer order
    pub fn genre_names(&self) -> impl Iterator<Item = &str> + Clone {
        self.performers
            .iter()
            .flat_map(|performer| performer.genres.iter())
            .map(|genre| genre.name.as_str())
    }

    /// Copy of this event with the performer list stripped
    pub fn without_performers(&self) -> Event {
        Event {
            source: self.source.clone(),
            source_id: self.source_id.clone(),
            name: self.name.clone(),
            start_time: self.start_time,
            venue: self.venue.clone(),
            performers: Vec::new(),
        }
    }
}

/// An artist resolved in the streaming catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogArtist {
    pub id: String,
    pub name: String,
}

/// A top track returned by the streaming catalog for an artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTrack {
    pub id: String,
    pub uri: String,
    pub name: String,
    pub popularity: u32, // 0 to 100
}

/// A (performer, track) pairing proposed for the playlist
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackCandidate {
    pub performer_name: String,
    pub catalog_artist_id: String,
    pub catalog_track_id: String,
    pub catalog_track_uri: String,
    pub catalog_track_name: String,
    pub popularity: u32,
}

impl TrackCandidate {
    pub fn new(performer_name: &str, artist: &CatalogArtist, track: CatalogTrack) -> Self {
        Self {
            performer_name: performer_name.to_string(),
            catalog_artist_id: artist.id.clone(),
            catalog_track_id: track.id,
            catalog_track_uri: track.uri,
            catalog_track_name: track.name,
            popularity: track.popularity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn create_test_event() -> Event {
        Event {
            source: "SeatGeek".to_string(),
            source_id: "1".to_string(),
            name: "Night Out".to_string(),
            start_time: NaiveDate::from_ymd_opt(2018, 1, 5)
                .unwrap()
                .and_hms_opt(20, 0, 0)
                .unwrap(),
            venue: Venue {
                source: "SeatGeek".to_string(),
                source_id: "v1".to_string(),
                name: "Bowery Ballroom".to_string(),
                address: "6 Delancey St\nNew York, NY 10002".to_string(),
                city: "New York".to_string(),
            },
            performers: vec![
                Performer {
                    source: "SeatGeek".to_string(),
                    source_id: "p1".to_string(),
                    name: "Band A".to_string(),
                    genres: vec![Genre {
                        source: "SeatGeek".to_string(),
                        source_id: "g1".to_string(),
                        name: "Rock".to_string(),
                    }],
                },
                Performer {
                    source: "SeatGeek".to_string(),
                    source_id: "p2".to_string(),
                    name: "Band B".to_string(),
                    genres: vec![Genre {
                        source: "SeatGeek".to_string(),
                        source_id: "g2".to_string(),
                        name: "Punk".to_string(),
                    }],
                },
            ],
        }
    }

    #[test]
    fn test_weekday_uses_local_start_time() {
        // 2018-01-05 was a Friday
        assert_eq!(create_test_event().weekday(), Weekday::Fri);
    }

    #[test]
    fn test_genre_names_span_all_performers() {
        let event = create_test_event();
        let genres: Vec<&str> = event.genre_names().collect();
        assert_eq!(genres, vec!["Rock", "Punk"]);
    }

    #[test]
    fn test_without_performers_keeps_everything_else() {
        let event = create_test_event();
        let stripped = event.without_performers();
        assert!(stripped.performers.is_empty());
        assert_eq!(stripped.source_id, event.source_id);
        assert_eq!(stripped.venue, event.venue);
        assert_eq!(event.performers.len(), 2);
    }
}
