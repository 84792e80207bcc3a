pub mod ohmyrockness;
pub mod seatgeek;
pub mod spotify;

pub use ohmyrockness::OhMyRocknessClient;
pub use seatgeek::SeatGeekClient;
pub use spotify::SpotifyClient;

use crate::error::{Error, Result};
use crate::models::{CatalogArtist, CatalogTrack, Event};
use chrono::NaiveDate;
use log::debug;
use serde::de::DeserializeOwned;

#[cfg(test)]
use mockall::automock;

/// Parameters passed to an event API when listing upcoming concerts
#[derive(Debug, Clone, PartialEq)]
pub struct EventQuery {
    pub city: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub max_price: Option<f64>,
    pub limit: usize,  // Maximum number of events to return overall
    pub per_page: u32, // Events requested per API call
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            city: None,
            start_date: None,
            end_date: None,
            max_price: None,
            limit: 250,
            per_page: 50,
        }
    }
}

/// An event-discovery API that yields events in the shared domain shape
#[cfg_attr(test, automock)]
pub trait EventSource {
    /// Human readable name used in logs and default playlist names
    fn name(&self) -> &str;

    /// Fetch and parse a single page of events (pages start at 1)
    fn fetch_page(&self, query: &EventQuery, page: u32, per_page: u32) -> Result<Vec<Event>>;

    /// Fetch events page by page until `query.limit` is reached
    /// or the API returns a short page
    fn fetch_events(&self, query: &EventQuery) -> Result<Vec<Event>> {
        let per_page = query.per_page.max(1);
        let mut events = Vec::new();
        let mut page = 1;

        loop {
            let batch = self.fetch_page(query, page, per_page)?;
            let batch_size = batch.len();
            events.extend(batch);
            debug!(
                "{}: page {} returned {} events (total: {})",
                self.name(),
                page,
                batch_size,
                events.len()
            );

            if events.len() >= query.limit {
                events.truncate(query.limit);
                break;
            }
            if batch_size < per_page as usize {
                break;
            }
            page += 1;
        }

        Ok(events)
    }
}

/// Music catalog search used to turn performer names into tracks
#[cfg_attr(test, automock)]
pub trait CatalogLookup {
    /// Resolve an artist by name; `None` when the catalog has no match
    fn find_artist(&self, name: &str) -> Result<Option<CatalogArtist>>;

    /// Top tracks for an artist, in the order the catalog ranks them
    fn top_tracks(&self, artist: &CatalogArtist, max_count: usize) -> Result<Vec<CatalogTrack>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

impl From<bool> for Visibility {
    fn from(public: bool) -> Self {
        if public {
            Visibility::Public
        } else {
            Visibility::Private
        }
    }
}

/// A playlist created on the streaming service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistHandle {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
}

/// Destination for the final ordered track list
#[cfg_attr(test, automock)]
pub trait PlaylistSink {
    fn create_playlist(&self, name: &str, visibility: Visibility) -> Result<PlaylistHandle>;

    fn add_tracks(&self, playlist: &PlaylistHandle, track_uris: &[String]) -> Result<()>;
}

/// Event APIs disagree on whether ids are numbers or strings
pub(crate) fn id_string(id: &serde_json::Value) -> String {
    match id {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Decode a JSON response body, reporting failures as parse errors
pub(crate) fn read_json<T: DeserializeOwned>(response: ureq::Response) -> Result<T> {
    let url = response.get_url().to_string();
    response
        .into_json::<T>()
        .map_err(|e| Error::Parse(format!("{url}: {e}")))
}
