use super::candidates::CandidateBuilder;
use super::filters::filter_events;
use super::pacing::{AbortHandle, RateLimiter};
use super::performers::group_by_performer;
use super::sampler;
use super::utils::PlaylistNaming;
use super::{Playlist, PlaylistConfig, PlaylistMetadata};
use crate::client::{CatalogLookup, EventSource, PlaylistHandle, PlaylistSink, Visibility};
use crate::error::Result;
use crate::models::Event;
use log::{debug, info};
use rand::Rng;

/// Main playlist generator
pub struct PlaylistGenerator {
    config: PlaylistConfig,
}

impl PlaylistGenerator {
    pub fn new(config: PlaylistConfig) -> Self {
        Self { config }
    }

    /// Fetch events from `source` and turn them into a playlist
    pub fn generate_playlist<R: Rng + ?Sized>(
        &self,
        source: &dyn EventSource,
        lookup: &dyn CatalogLookup,
        limiter: &RateLimiter,
        abort: &AbortHandle,
        rng: &mut R,
    ) -> Result<Playlist> {
        self.config.validate()?;

        let events = source.fetch_events(&self.config.event_query())?;
        info!("{}: fetched {} events", source.name(), events.len());

        let mut playlist = self.playlist_from_events(&events, lookup, limiter, abort, rng)?;
        playlist.metadata.source = source.name().to_string();
        Ok(playlist)
    }

    /// Filter, group, resolve and sample an already fetched event list
    pub fn playlist_from_events<R: Rng + ?Sized>(
        &self,
        events: &[Event],
        lookup: &dyn CatalogLookup,
        limiter: &RateLimiter,
        abort: &AbortHandle,
        rng: &mut R,
    ) -> Result<Playlist> {
        let criteria = self.config.effective_criteria();
        if criteria.is_empty() {
            debug!("No event filters configured, keeping every event");
        }
        let mut metadata = PlaylistMetadata {
            source: self.config.source.to_string(),
            events_fetched: events.len(),
            ..PlaylistMetadata::default()
        };

        let kept: Vec<&Event> = filter_events(events, &criteria).collect();
        metadata.events_kept = kept.len();
        debug!("{} of {} events passed the filters", kept.len(), events.len());

        let performers = group_by_performer(kept);
        metadata.performers = performers.len();

        let pool = CandidateBuilder::new(lookup, limiter).build(
            &performers,
            self.config.max_tracks_per_performer,
            abort,
        )?;
        metadata.performers_resolved = pool.performers_resolved;
        metadata.performers_missed = pool.performers_missed;
        metadata.candidates = pool.candidates.len();
        metadata.aborted = pool.aborted;

        let tracks = sampler::select(
            pool.candidates,
            self.config.max_tracks,
            None,
            self.config.offset_popularity,
            rng,
        );
        metadata.record_selection(&tracks);
        info!(
            "Selected {} of {} candidate tracks from {} performers",
            metadata.selected, metadata.candidates, metadata.performers
        );

        Ok(Playlist {
            name: PlaylistNaming::playlist_name(&self.config),
            tracks,
            public: self.config.public,
            metadata,
        })
    }
}

/// Create the playlist on the streaming service and fill it in order
pub fn publish(sink: &dyn PlaylistSink, playlist: &Playlist) -> Result<PlaylistHandle> {
    let handle = sink.create_playlist(&playlist.name, Visibility::from(playlist.public))?;
    sink.add_tracks(&handle, &playlist.track_uris())?;
    info!(
        "Added {} tracks to playlist '{}' ({})",
        playlist.tracks.len(),
        handle.name,
        handle.id
    );
    Ok(handle)
}
