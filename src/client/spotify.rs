use super::{CatalogLookup, PlaylistHandle, PlaylistSink, Visibility, read_json};
use crate::config::SpotifyConfig;
use crate::error::{Error, Result};
use crate::models::{CatalogArtist, CatalogTrack};
use log::{debug, info};
use serde::Deserialize;
use serde_json::{Value, json};
use ureq::Agent;
use urlencoding::encode;

const SPOTIFY_API: &str = "https://api.spotify.com/v1";
const MAX_POPULARITY: u32 = 100;
/// Spotify accepts at most this many URIs per add-tracks request
const ADD_TRACKS_CHUNK: usize = 100;

/// Spotify Web API client covering artist search, top tracks and playlists
pub struct SpotifyClient {
    agent: Agent,
    base_url: String,
    access_token: String,
    username: Option<String>,
    market: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    artists: Option<ArtistPage>,
}

#[derive(Debug, Deserialize)]
struct ArtistPage {
    #[serde(default)]
    items: Vec<RawArtist>,
}

#[derive(Debug, Deserialize)]
struct RawArtist {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct TopTracksResponse {
    #[serde(default)]
    tracks: Vec<RawTrack>,
}

#[derive(Debug, Deserialize)]
struct RawTrack {
    id: String,
    uri: String,
    name: String,
    #[serde(default)]
    popularity: Value,
}

#[derive(Debug, Deserialize)]
struct CreatedPlaylist {
    id: String,
    name: String,
    external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Deserialize)]
struct ExternalUrls {
    spotify: Option<String>,
}

/// Popularity as reported by the catalog, clamped to 0..=100.
/// Missing, negative or non-numeric values become 0.
pub(crate) fn coerce_popularity(raw: &Value) -> u32 {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(p) if p.is_finite() && p >= 0.0 => (p as u32).min(MAX_POPULARITY),
        _ => {
            debug!("Coercing malformed track popularity {raw} to 0");
            0
        }
    }
}

/// Requests needed to append `track_uris`, in playlist order
fn track_batches(track_uris: &[String]) -> std::slice::Chunks<'_, String> {
    track_uris.chunks(ADD_TRACKS_CHUNK)
}

impl SpotifyClient {
    pub fn new(config: SpotifyConfig) -> Self {
        SpotifyClient {
            agent: Agent::new(),
            base_url: SPOTIFY_API.to_string(),
            access_token: config.access_token,
            username: config.username,
            market: config.market,
        }
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    fn parse_tracks(response: TopTracksResponse, max_count: usize) -> Vec<CatalogTrack> {
        response
            .tracks
            .into_iter()
            .take(max_count)
            .map(|track| CatalogTrack {
                popularity: coerce_popularity(&track.popularity),
                id: track.id,
                uri: track.uri,
                name: track.name,
            })
            .collect()
    }
}

impl CatalogLookup for SpotifyClient {
    fn find_artist(&self, name: &str) -> Result<Option<CatalogArtist>> {
        let response = self
            .agent
            .get(&format!("{}/search", self.base_url))
            .set("Authorization", &self.bearer())
            .query("q", name)
            .query("type", "artist")
            .query("limit", "1")
            .call()?;

        let parsed: SearchResponse = read_json(response)?;
        Ok(parsed
            .artists
            .and_then(|page| page.items.into_iter().next())
            .map(|artist| CatalogArtist {
                id: artist.id,
                name: artist.name,
            }))
    }

    fn top_tracks(&self, artist: &CatalogArtist, max_count: usize) -> Result<Vec<CatalogTrack>> {
        let response = self
            .agent
            .get(&format!(
                "{}/artists/{}/top-tracks",
                self.base_url,
                encode(&artist.id)
            ))
            .set("Authorization", &self.bearer())
            .query("market", &self.market)
            .call()?;

        let parsed: TopTracksResponse = read_json(response)?;
        Ok(Self::parse_tracks(parsed, max_count))
    }
}

impl PlaylistSink for SpotifyClient {
    fn create_playlist(&self, name: &str, visibility: Visibility) -> Result<PlaylistHandle> {
        let username = self
            .username
            .as_deref()
            .ok_or_else(|| Error::MissingCredential("SPOTIFY_USERNAME".to_string()))?;

        let response = self
            .agent
            .post(&format!("{}/users/{}/playlists", self.base_url, encode(username)))
            .set("Authorization", &self.bearer())
            .send_json(json!({
                "name": name,
                "public": visibility == Visibility::Public,
            }))?;

        let created: CreatedPlaylist = read_json(response)?;
        info!("Created Spotify playlist '{}' (ID: {})", created.name, created.id);

        Ok(PlaylistHandle {
            id: created.id,
            name: created.name,
            url: created.external_urls.and_then(|urls| urls.spotify),
        })
    }

    fn add_tracks(&self, playlist: &PlaylistHandle, track_uris: &[String]) -> Result<()> {
        let url = format!("{}/playlists/{}/tracks", self.base_url, encode(&playlist.id));

        for (i, chunk) in track_batches(track_uris).enumerate() {
            debug!(
                "Adding batch {} ({} tracks) to playlist {}",
                i + 1,
                chunk.len(),
                playlist.id
            );
            self.agent
                .post(&url)
                .set("Authorization", &self.bearer())
                .send_json(json!({ "uris": chunk }))?;
        }

        Ok(())
    }
}
