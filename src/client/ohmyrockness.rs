use super::{EventQuery, EventSource, id_string, read_json};
use crate::config::OhMyRocknessConfig;
use crate::error::Result;
use crate::models::{Event, Performer, Venue};
use chrono::{DateTime, NaiveDateTime};
use log::warn;
use serde::Deserialize;
use serde_json::Value;
use ureq::Agent;

const OHMYROCKNESS_API: &str = "https://www.ohmyrockness.com/api";
const SOURCE: &str = "OhMyRockness";
const DATE_FORMAT: &str = "%m-%d-%Y"; // This API takes US style date ranges

/// Client for the OhMyRockness show listings API
pub struct OhMyRocknessClient {
    agent: Agent,
    base_url: String,
    token: String,
    user_agent: String,
}

#[derive(Debug, Deserialize)]
struct RawShow {
    id: Value,
    starts_at: String,
    venue: RawVenue,
    #[serde(default)]
    cached_bands: Vec<RawBand>,
}

#[derive(Debug, Deserialize)]
struct RawVenue {
    id: Value,
    name: String,
    #[serde(default)]
    full_address: String,
}

#[derive(Debug, Deserialize)]
struct RawBand {
    id: Value,
    name: String,
}

/// Local start time with the trailing UTC offset dropped
fn parse_starts_at(starts_at: &str) -> Option<NaiveDateTime> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(starts_at) {
        return Some(with_offset.naive_local());
    }
    let without_offset = starts_at.get(..19)?;
    NaiveDateTime::parse_from_str(without_offset, "%Y-%m-%dT%H:%M:%S").ok()
}

/// City is the text before the first comma on the last address line
fn city_from_address(full_address: &str) -> String {
    full_address
        .lines()
        .last()
        .and_then(|line| line.split(',').next())
        .unwrap_or_default()
        .trim()
        .to_string()
}

impl OhMyRocknessClient {
    pub fn new(config: OhMyRocknessConfig) -> Self {
        OhMyRocknessClient {
            agent: Agent::new(),
            base_url: OHMYROCKNESS_API.to_string(),
            token: config.token,
            user_agent: config.user_agent,
        }
    }

    fn query_params(query: &EventQuery, page: u32, per_page: u32) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(start) = query.start_date {
            params.push(("daterange[from]", start.format(DATE_FORMAT).to_string()));
        }
        if let Some(end) = query.end_date {
            params.push(("daterange[until]", end.format(DATE_FORMAT).to_string()));
        }
        params.push(("index", "true".to_string()));
        params.push(("page", page.to_string()));
        params.push(("per", per_page.to_string()));
        params.push(("regioned", "1".to_string()));
        params
    }

    fn parse_show(raw: RawShow) -> Option<Event> {
        let Some(start_time) = parse_starts_at(&raw.starts_at) else {
            warn!(
                "Skipping OhMyRockness show {} with unreadable starts_at '{}'",
                id_string(&raw.id),
                raw.starts_at
            );
            return None;
        };

        let name = raw
            .cached_bands
            .iter()
            .map(|band| band.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let performers = raw
            .cached_bands
            .into_iter()
            .map(|band| Performer {
                source: SOURCE.to_string(),
                source_id: id_string(&band.id),
                name: band.name,
                genres: Vec::new(),
            })
            .collect();

        Some(Event {
            source: SOURCE.to_string(),
            source_id: id_string(&raw.id),
            name,
            start_time,
            venue: Venue {
                source: SOURCE.to_string(),
                source_id: id_string(&raw.venue.id),
                city: city_from_address(&raw.venue.full_address),
                name: raw.venue.name,
                address: raw.venue.full_address,
            },
            performers,
        })
    }
}

impl EventSource for OhMyRocknessClient {
    fn name(&self) -> &str {
        SOURCE
    }

    fn fetch_page(&self, query: &EventQuery, page: u32, per_page: u32) -> Result<Vec<Event>> {
        let mut request = self
            .agent
            .get(&format!("{}/shows.json", self.base_url))
            .set("user-agent", &self.user_agent)
            .set("authorization", &format!("Token token=\"{}\"", self.token));
        for (key, value) in Self::query_params(query, page, per_page) {
            request = request.query(key, &value);
        }

        let response = request.call()?;
        let shows: Vec<RawShow> = read_json(response)?;
        Ok(shows.into_iter().filter_map(Self::parse_show).collect())
    }
}
