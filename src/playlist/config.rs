use super::filters::FilterCriteria;
use crate::client::EventQuery;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Which event-discovery API a playlist pulls concerts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSourceKind {
    SeatGeek,
    OhMyRockness,
}

impl fmt::Display for EventSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventSourceKind::SeatGeek => write!(f, "SeatGeek"),
            EventSourceKind::OhMyRockness => write!(f, "OhMyRockness"),
        }
    }
}

/// One playlist to build: where the events come from, how they are filtered,
/// and how many tracks end up in it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistConfig {
    #[serde(default)]
    pub name: Option<String>, // Generated from source and dates when absent
    pub source: EventSourceKind,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub filters: FilterCriteria,
    #[serde(default = "default_max_tracks")]
    pub max_tracks: usize,
    #[serde(default = "default_max_tracks_per_performer")]
    pub max_tracks_per_performer: usize,
    #[serde(default = "default_offset_popularity")]
    pub offset_popularity: f64, // Sampling weight floor
    #[serde(default)]
    pub public: bool,
    #[serde(default = "default_event_limit")]
    pub event_limit: usize,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default)]
    pub max_price: Option<f64>,
}

fn default_max_tracks() -> usize {
    30
}

fn default_max_tracks_per_performer() -> usize {
    3
}

fn default_offset_popularity() -> f64 {
    3.0
}

fn default_event_limit() -> usize {
    250
}

fn default_per_page() -> u32 {
    50
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            name: None,
            source: EventSourceKind::SeatGeek,
            city: None,
            start_date: None,
            end_date: None,
            filters: FilterCriteria::default(),
            max_tracks: default_max_tracks(),
            max_tracks_per_performer: default_max_tracks_per_performer(),
            offset_popularity: default_offset_popularity(),
            public: false,
            event_limit: default_event_limit(),
            per_page: default_per_page(),
            max_price: None,
        }
    }
}

impl PlaylistConfig {
    /// Parse a JSON array of playlist configurations and validate each one
    pub fn load_all_from_str(content: &str) -> Result<Vec<PlaylistConfig>> {
        let configs: Vec<PlaylistConfig> = serde_json::from_str(content)?;
        for (i, config) in configs.iter().enumerate() {
            config
                .validate()
                .map_err(|e| Error::Config(format!("playlist #{}: {}", i + 1, e)))?;
        }
        Ok(configs)
    }

    /// Load playlist configurations directly from a JSON array file
    pub fn load_all_from_file(path: &str) -> Result<Vec<PlaylistConfig>> {
        let content = std::fs::read_to_string(path)?;
        Self::load_all_from_str(&content)
    }

    /// Reject settings that would make the run meaningless before any request goes out
    pub fn validate(&self) -> Result<()> {
        if self.max_tracks_per_performer == 0 {
            return Err(Error::Config(
                "max_tracks_per_performer must be at least 1".to_string(),
            ));
        }
        if self.event_limit == 0 {
            return Err(Error::Config("event_limit must be at least 1".to_string()));
        }
        if self.per_page == 0 {
            return Err(Error::Config("per_page must be at least 1".to_string()));
        }
        if !self.offset_popularity.is_finite() || self.offset_popularity < 0.0 {
            return Err(Error::Config(format!(
                "offset_popularity must be a non-negative number, got {}",
                self.offset_popularity
            )));
        }
        if self.offset_popularity == 0.0 {
            warn!("offset_popularity is 0, tracks with popularity 0 will only be picked once the rest run out");
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(Error::Config(format!(
                    "end_date {end} is before start_date {start}"
                )));
            }
        }
        if let Some(price) = self.max_price {
            if !price.is_finite() || price < 0.0 {
                return Err(Error::Config(format!(
                    "max_price must be a non-negative number, got {price}"
                )));
            }
        }
        Ok(())
    }

    /// Query sent to the event source
    pub fn event_query(&self) -> EventQuery {
        EventQuery {
            city: self.city.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            max_price: self.max_price,
            limit: self.event_limit,
            per_page: self.per_page,
        }
    }

    /// Filters applied locally. The configured city doubles as an include-city
    /// filter unless one is already set, since not every source filters by city.
    pub fn effective_criteria(&self) -> FilterCriteria {
        let mut criteria = self.filters.clone();
        if let Some(city) = &self.city {
            if criteria.city.include.is_none() {
                criteria.city.include = Some(HashSet::from([city.clone()]));
            }
        }
        criteria
    }
}
