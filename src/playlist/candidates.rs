use super::pacing::{AbortHandle, RateLimiter};
use super::performers::PerformerEvents;
use crate::client::CatalogLookup;
use crate::error::Result;
use crate::models::TrackCandidate;
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashSet};

/// Candidates gathered from the catalog, plus whether the lookup loop stopped early
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidatePool {
    pub candidates: Vec<TrackCandidate>,
    pub performers_resolved: usize,
    pub performers_missed: usize,
    pub aborted: bool,
}

/// Resolves performers to catalog tracks, one paced lookup per performer
pub struct CandidateBuilder<'a> {
    lookup: &'a dyn CatalogLookup,
    limiter: &'a RateLimiter,
}

/// Drop repeated candidates, keeping the first occurrence of each
pub fn deduplicate(candidates: Vec<TrackCandidate>) -> Vec<TrackCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|candidate| seen.insert(candidate.clone()))
        .collect()
}

impl<'a> CandidateBuilder<'a> {
    pub fn new(lookup: &'a dyn CatalogLookup, limiter: &'a RateLimiter) -> Self {
        Self { lookup, limiter }
    }

    /// Look up top tracks for every performer, in name order.
    ///
    /// Performers the catalog cannot find are skipped. When `abort` fires, the
    /// candidates collected so far are returned with `aborted` set. Lookup
    /// errors propagate.
    pub fn build(
        &self,
        performers: &BTreeMap<String, PerformerEvents>,
        max_tracks_per_performer: usize,
        abort: &AbortHandle,
    ) -> Result<CandidatePool> {
        let mut pool = CandidatePool::default();
        let mut raw = Vec::new();

        for (i, name) in performers.keys().enumerate() {
            if !abort.is_aborted() {
                self.limiter.wait();
            }
            // Checked after the wait too, the deadline may pass while sleeping
            if abort.is_aborted() {
                warn!(
                    "Stopping catalog lookups early: {} of {} performers checked",
                    i,
                    performers.len()
                );
                pool.aborted = true;
                break;
            }

            let Some(artist) = self.lookup.find_artist(name)? else {
                info!("No catalog match for performer '{name}', skipping");
                pool.performers_missed += 1;
                continue;
            };
            pool.performers_resolved += 1;

            if max_tracks_per_performer == 0 {
                continue;
            }

            let tracks = self.lookup.top_tracks(&artist, max_tracks_per_performer)?;
            debug!(
                "Performer '{}' resolved to artist {} with {} top tracks",
                name,
                artist.id,
                tracks.len()
            );

            raw.extend(
                tracks
                    .into_iter()
                    .take(max_tracks_per_performer)
                    .map(|track| TrackCandidate::new(name, &artist, track)),
            );
        }

        let raw_count = raw.len();
        pool.candidates = deduplicate(raw);
        if pool.candidates.len() < raw_count {
            debug!(
                "Removed {} duplicate candidates",
                raw_count - pool.candidates.len()
            );
        }

        Ok(pool)
    }
}
